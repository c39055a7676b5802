// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Connection establishment.
//!
//! Three startup steps, run once and in order: probe the server with bounded
//! retry/backoff, create the target database if it is absent, and clear the
//! series when a reset was requested against a pre-existing database.
//!
//! The probe is the only operation in the whole program with a retry policy.

use crate::store::{SampleStore, StoreError};
use log::{info, warn};
use std::thread;
use std::time::Duration;

/// Probe attempts before giving up on the server.
pub const DEFAULT_PROBE_ATTEMPTS: u32 = 5;

/// Initial probe backoff; doubles after each failed attempt.
pub const DEFAULT_PROBE_DELAY: Duration = Duration::from_secs(1);

/// Timeout for a single probe request.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection establishment errors. All fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// The server never answered within the attempt budget.
    #[error("cannot connect to {url} ({attempts} attempts)")]
    Unreachable {
        /// Endpoint that was probed.
        url: String,
        /// Number of attempts made.
        attempts: u32,
    },

    /// The HTTP client itself could not be constructed.
    #[error("probe client setup failed: {0}")]
    Setup(#[from] reqwest::Error),
}

/// The doubling backoff schedule: `base, 2*base, 4*base, ...`, one entry
/// per attempt.
pub fn backoff_delays(base: Duration, attempts: u32) -> Vec<Duration> {
    (0..attempts)
        .scan(base, |delay, _| {
            let current = *delay;
            *delay = delay.saturating_mul(2);
            Some(current)
        })
        .collect()
}

/// Retry `op` up to `attempts` times, sleeping the backoff schedule between
/// failures. Returns `Unreachable` once the budget is spent.
///
/// Split out from [`probe_server`] so the retry behavior is testable
/// without a network endpoint.
pub fn probe_with<F>(
    mut op: F,
    attempts: u32,
    base_delay: Duration,
    url: &str,
) -> Result<(), ConnectError>
where
    F: FnMut() -> bool,
{
    for delay in backoff_delays(base_delay, attempts) {
        if op() {
            return Ok(());
        }
        warn!("waiting for {}", url);
        thread::sleep(delay);
    }
    Err(ConnectError::Unreachable {
        url: url.to_string(),
        attempts,
    })
}

/// Wait for the storage server to come online.
///
/// Issues a bare GET against the server root; any HTTP response counts as
/// reachable (a 404 still proves the listener is up). Only transport-level
/// errors count as failed attempts.
pub fn probe_server(
    host: &str,
    port: u16,
    attempts: u32,
    base_delay: Duration,
) -> Result<(), ConnectError> {
    let url = format!("http://{}:{}", host, port);
    let http = reqwest::blocking::Client::builder()
        .timeout(PROBE_TIMEOUT)
        .build()?;

    probe_with(|| http.get(&url).send().is_ok(), attempts, base_delay, &url)
}

/// Make sure the target database exists.
///
/// Returns `true` when this call created it, `false` when it was already
/// present. The caller needs that distinction for reset semantics.
pub fn ensure_database<S: SampleStore>(store: &mut S, name: &str) -> Result<bool, StoreError> {
    let existing = store.list_databases()?;
    if existing.iter().any(|db| db == name) {
        info!("database '{}' already exists", name);
        return Ok(false);
    }

    info!("creating database '{}'", name);
    store.create_database(name)?;
    Ok(true)
}

/// Clear the series when the caller asked for a reset.
///
/// A freshly created database has nothing to clear, so the drop only runs
/// when the database pre-existed and `reset` is set. Returns whether a
/// drop happened.
pub fn reset_if_requested<S: SampleStore>(
    store: &mut S,
    measurement: &str,
    created: bool,
    reset: bool,
) -> Result<bool, StoreError> {
    if created || !reset {
        return Ok(false);
    }

    info!("clearing series '{}'", measurement);
    store.drop_series(measurement)?;
    Ok(true)
}
