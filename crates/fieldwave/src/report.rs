// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Stored-series read-back.
//!
//! Runs once at the end of a bounded run and once on interrupt: fetch every
//! stored point of the series and render it for stdout. Rows are shown as
//! the engine returns them, tag column included.

use crate::store::{SampleStore, SeriesEntries, StoreError};
use colored::Colorize;
use tabled::builder::Builder;

/// All stored points of the series, in engine order.
pub fn get_entries<S: SampleStore>(
    store: &mut S,
    measurement: &str,
) -> Result<Vec<SeriesEntries>, StoreError> {
    store.select_all(measurement)
}

/// Render the read-back as a header line plus one table per series.
///
/// The column set is decided by the engine, so the table is built
/// dynamically instead of from a derived row type.
pub fn render_entries(entries: &[SeriesEntries]) -> String {
    if entries.is_empty() {
        return format!("{}", "(no points stored)".yellow());
    }

    let mut out = String::new();
    for series in entries {
        out.push_str(&format!(
            "{} ({} points)\n",
            series.name.cyan().bold(),
            series.values.len()
        ));

        let mut builder = Builder::default();
        builder.push_record(series.columns.iter().cloned());
        for row in &series.values {
            builder.push_record(row.iter().map(format_cell));
        }
        out.push_str(&builder.build().to_string());
        out.push('\n');
    }
    out
}

fn format_cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "-".to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_entries() -> Vec<SeriesEntries> {
        vec![SeriesEntries {
            name: "sinewave".to_string(),
            columns: vec![
                "time".to_string(),
                "input".to_string(),
                "value".to_string(),
            ],
            values: vec![
                vec![json!("2026-01-01T00:00:00Z"), json!("0"), json!(0.0)],
                vec![json!("2026-01-01T00:00:01Z"), json!("0.1"), json!(0.0998)],
            ],
        }]
    }

    #[test]
    fn test_render_includes_header_and_rows() {
        colored::control::set_override(false);
        let text = render_entries(&sample_entries());

        assert!(text.contains("sinewave (2 points)"));
        assert!(text.contains("input"));
        assert!(text.contains("2026-01-01T00:00:01Z"));
        assert!(text.contains("0.0998"));
    }

    #[test]
    fn test_render_keeps_tag_column() {
        colored::control::set_override(false);
        let text = render_entries(&sample_entries());
        // The input tag is read back untouched, not projected out.
        assert!(text.contains("0.1"));
    }

    #[test]
    fn test_render_empty_listing() {
        colored::control::set_override(false);
        assert_eq!(render_entries(&[]), "(no points stored)");
    }

    #[test]
    fn test_null_cells_render_as_dash() {
        colored::control::set_override(false);
        let entries = vec![SeriesEntries {
            name: "sinewave".to_string(),
            columns: vec!["time".to_string(), "value".to_string()],
            values: vec![vec![json!("2026-01-01T00:00:00Z"), json!(null)]],
        }];

        let text = render_entries(&entries);
        assert!(text.contains('-'));
    }
}
