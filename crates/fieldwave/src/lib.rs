// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fieldwave core library.
//!
//! Simulates a field sensor: a sine signal sampled at a fixed rate, written
//! point by point into an InfluxDB v1 server, and read back in full on
//! shutdown.
//!
//! This crate provides:
//! - InfluxDB v1 Line Protocol encoding
//! - A blocking HTTP client for the v1 `/query` and `/write` endpoints
//! - Connection establishment with bounded retry/backoff and
//!   create-if-absent database initialization
//! - The sine sample source and the paced write loop
//! - Series read-back and table rendering
//!
//! # Overview
//!
//! Everything that talks to storage goes through the [`store::SampleStore`]
//! trait, so the connector, feed loop and reporter run against in-memory
//! fakes in tests:
//!
//! ```text
//! SineWave --> Sample --> SampleStore::write_sample --> InfluxDB /write
//!                              (read back) <--  SampleStore::select_all
//! ```

pub mod client;
pub mod config;
pub mod connect;
pub mod feed;
pub mod point;
pub mod report;
pub mod sample;
pub mod signal;
pub mod store;

pub use client::InfluxClient;
pub use config::{ConfigError, FeedConfig};
pub use connect::{ensure_database, probe_server, reset_if_requested, ConnectError};
pub use feed::{run_feed, FeedOptions};
pub use report::{get_entries, render_entries};
pub use sample::Sample;
pub use signal::SineWave;
pub use store::{SampleStore, SeriesEntries, StoreError};
