// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Storage engine abstraction.
//!
//! The feed only needs six operations from the time-series engine; they are
//! captured in `SampleStore` so the connector, feed loop and reporter can be
//! driven against an in-memory fake in tests. `InfluxClient` is the one real
//! implementation.

use crate::sample::Sample;
use serde::Deserialize;
use thiserror::Error;

/// Errors surfaced by a storage backend.
///
/// Only the initial reachability probe has a retry policy; every error here
/// is treated as fatal by callers.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport-level failure talking to the server.
    #[error("{operation} failed: {source}")]
    Transport {
        /// The storage operation that was attempted.
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success HTTP status.
    #[error("{operation} failed: HTTP {status}: {body}")]
    Status {
        /// The storage operation that was attempted.
        operation: &'static str,
        /// HTTP status code returned.
        status: u16,
        /// Response body text, as returned by the server.
        body: String,
    },

    /// The server executed the request but reported a statement error.
    #[error("{operation} failed: {message}")]
    Server {
        /// The storage operation that was attempted.
        operation: &'static str,
        /// Error text from the response payload.
        message: String,
    },

    /// A write or query was issued before a database was selected.
    #[error("{operation} failed: no database selected")]
    NoDatabase {
        /// The storage operation that was attempted.
        operation: &'static str,
    },
}

/// Rows returned for one series by a select-all query.
///
/// Column names and row values are passed through exactly as the engine
/// returns them; in particular the tag column is not projected out.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeriesEntries {
    /// Series (measurement) name.
    pub name: String,
    /// Column names, `time` first.
    pub columns: Vec<String>,
    /// Row values, one inner vector per stored point.
    #[serde(default)]
    pub values: Vec<Vec<serde_json::Value>>,
}

/// The storage operations the feed exercises.
pub trait SampleStore {
    /// Names of all databases present on the server.
    fn list_databases(&mut self) -> Result<Vec<String>, StoreError>;

    /// Create a database. The server treats creation as idempotent.
    fn create_database(&mut self, name: &str) -> Result<(), StoreError>;

    /// Select the database applied to subsequent writes and queries.
    fn use_database(&mut self, name: &str);

    /// Delete every point of the named series.
    fn drop_series(&mut self, measurement: &str) -> Result<(), StoreError>;

    /// Write one sample as a point of the named series.
    fn write_sample(&mut self, measurement: &str, sample: &Sample) -> Result<(), StoreError>;

    /// All stored points of the named series, in engine order.
    fn select_all(&mut self, measurement: &str) -> Result<Vec<SeriesEntries>, StoreError>;
}
