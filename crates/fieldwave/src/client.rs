// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! InfluxDB v1 HTTP client.
//!
//! Drives the three v1 endpoints the feed needs:
//!
//! - `GET  /query`  - `SHOW DATABASES`, `SELECT * FROM <measurement>`
//! - `POST /query`  - `CREATE DATABASE`, `DROP SERIES FROM <measurement>`
//! - `POST /write`  - Line Protocol points, nanosecond precision
//!
//! Query responses arrive in the v1 JSON envelope:
//! ```json
//! {"results":[{"statement_id":0,"series":[{"name":"...","columns":[...],"values":[...]}]}]}
//! ```
//! Statement errors are reported inside the envelope with a 200 status, so
//! both the HTTP status and the payload are checked.

use crate::sample::Sample;
use crate::store::{SampleStore, SeriesEntries, StoreError};
use log::debug;
use serde::Deserialize;
use std::time::Duration;

/// Per-request timeout. The server is expected to be local or near-local;
/// anything slower than this is treated as a failure.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Blocking InfluxDB v1 client.
///
/// Holds the selected database the way the v1 protocol expects: as a `db`
/// query parameter attached to writes and queries after `use_database`.
pub struct InfluxClient {
    http: reqwest::blocking::Client,
    base_url: String,
    database: Option<String>,
    credentials: Option<(String, String)>,
}

impl InfluxClient {
    /// Create a client for `http://<host>:<port>`.
    pub fn new(host: &str, port: u16) -> Result<Self, StoreError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| StoreError::Transport {
                operation: "client setup",
                source,
            })?;

        Ok(Self {
            http,
            base_url: format!("http://{}:{}", host, port),
            database: None,
            credentials: None,
        })
    }

    /// Attach credentials forwarded as the v1 `u`/`p` parameters.
    ///
    /// The credentials are passed through verbatim; this client does not
    /// interpret them.
    pub fn with_credentials(mut self, user: &str, password: &str) -> Self {
        self.credentials = Some((user.to_string(), password.to_string()));
        self
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn selected_db(&self, operation: &'static str) -> Result<&str, StoreError> {
        self.database
            .as_deref()
            .ok_or(StoreError::NoDatabase { operation })
    }

    fn push_credentials(&self, params: &mut Vec<(&'static str, String)>) {
        if let Some((user, password)) = &self.credentials {
            params.push(("u", user.clone()));
            params.push(("p", password.clone()));
        }
    }

    /// Run a statement against `/query`.
    ///
    /// Reads (`SHOW`, `SELECT`) go out as GET, schema changes (`CREATE`,
    /// `DROP`) as POST, per the v1 API rules.
    fn run_statement(
        &self,
        statement: &str,
        with_db: bool,
        post: bool,
        operation: &'static str,
    ) -> Result<QueryResponse, StoreError> {
        let url = format!("{}/query", self.base_url);
        let mut params: Vec<(&'static str, String)> = Vec::new();
        if with_db {
            params.push(("db", self.selected_db(operation)?.to_string()));
        }
        self.push_credentials(&mut params);
        params.push(("q", statement.to_string()));

        debug!("{}: {}", operation, statement);

        let request = if post {
            self.http.post(&url).form(&params)
        } else {
            self.http.get(&url).query(&params)
        };

        let response = request.send().map_err(|source| StoreError::Transport {
            operation,
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(StoreError::Status {
                operation,
                status: status.as_u16(),
                body,
            });
        }

        let payload: QueryResponse =
            response.json().map_err(|source| StoreError::Transport {
                operation,
                source,
            })?;

        if let Some(message) = payload.first_error() {
            return Err(StoreError::Server { operation, message });
        }

        Ok(payload)
    }
}

impl SampleStore for InfluxClient {
    fn list_databases(&mut self) -> Result<Vec<String>, StoreError> {
        let payload = self.run_statement("SHOW DATABASES", false, false, "list databases")?;
        Ok(database_names(payload))
    }

    fn create_database(&mut self, name: &str) -> Result<(), StoreError> {
        let statement = format!("CREATE DATABASE {}", quote_ident(name));
        self.run_statement(&statement, false, true, "create database")?;
        Ok(())
    }

    fn use_database(&mut self, name: &str) {
        debug!("switching to database '{}'", name);
        self.database = Some(name.to_string());
    }

    fn drop_series(&mut self, measurement: &str) -> Result<(), StoreError> {
        let statement = format!("DROP SERIES FROM {}", quote_ident(measurement));
        self.run_statement(&statement, true, true, "drop series")?;
        Ok(())
    }

    fn write_sample(&mut self, measurement: &str, sample: &Sample) -> Result<(), StoreError> {
        let operation = "write point";
        let url = format!("{}/write", self.base_url);
        let mut params: Vec<(&'static str, String)> = vec![
            ("db", self.selected_db(operation)?.to_string()),
            ("precision", "ns".to_string()),
        ];
        self.push_credentials(&mut params);

        let line = sample.to_line_protocol(measurement);
        debug!("{}: {}", operation, line);

        let response = self
            .http
            .post(&url)
            .query(&params)
            .body(line)
            .send()
            .map_err(|source| StoreError::Transport { operation, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(StoreError::Status {
                operation,
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    fn select_all(&mut self, measurement: &str) -> Result<Vec<SeriesEntries>, StoreError> {
        let statement = format!("SELECT * FROM {}", quote_ident(measurement));
        let payload = self.run_statement(&statement, true, false, "select entries")?;
        Ok(payload.into_series())
    }
}

/// Double-quote an identifier for InfluxQL, escaping embedded quotes.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\\\""))
}

/// v1 `/query` response envelope.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<StatementResult>,
    /// Top-level error (e.g. authentication failure).
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    #[serde(default)]
    series: Vec<SeriesEntries>,
    error: Option<String>,
}

impl QueryResponse {
    fn first_error(&self) -> Option<String> {
        self.error
            .clone()
            .or_else(|| self.results.iter().find_map(|r| r.error.clone()))
    }

    fn into_series(self) -> Vec<SeriesEntries> {
        self.results.into_iter().flat_map(|r| r.series).collect()
    }
}

/// Extract database names from a `SHOW DATABASES` payload.
///
/// The names arrive as single-element rows of the `databases` series.
fn database_names(payload: QueryResponse) -> Vec<String> {
    payload
        .into_series()
        .into_iter()
        .flat_map(|series| series.values)
        .filter_map(|row| row.into_iter().next())
        .filter_map(|value| value.as_str().map(str::to_string))
        .collect()
}
