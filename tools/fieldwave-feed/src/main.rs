// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! fieldwave-feed - Simulated field-sensor feed for InfluxDB
//!
//! Connects to the server (with bounded retry), creates the database if it
//! is absent, optionally clears the series, then writes one sine sample per
//! second until the bound is reached or Ctrl+C arrives. Either way it ends
//! by printing everything stored in the series.
//!
//! # Usage
//!
//! ```bash
//! # Run until interrupted
//! FIELDWAVE_DB=fieldsim fieldwave-feed localhost 8086
//!
//! # Three samples, clearing any prior data first
//! FIELDWAVE_DB=fieldsim fieldwave-feed --reset --count 3 localhost 8086
//! ```

use clap::Parser;
use colored::Colorize;
use fieldwave::connect::{DEFAULT_PROBE_ATTEMPTS, DEFAULT_PROBE_DELAY};
use fieldwave::{
    ensure_database, get_entries, probe_server, render_entries, reset_if_requested, run_feed,
    FeedConfig, FeedOptions, InfluxClient, SampleStore,
};
use log::info;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Series all samples are written to.
const MEASUREMENT: &str = "sinewave";

/// Write a simulated sine signal into InfluxDB
#[derive(Parser, Debug)]
#[command(name = "fieldwave-feed")]
#[command(about = "Write a simulated sine signal into InfluxDB")]
#[command(version)]
struct Args {
    /// Storage server host
    host: String,

    /// Storage server HTTP port
    port: u16,

    /// Clear the series if the database already exists
    #[arg(short, long)]
    reset: bool,

    /// Number of samples to generate (0 = run until interrupted)
    #[arg(short = 'n', long, default_value = "0")]
    count: u64,
}

fn main() {
    env_logger::init();

    // Usage errors exit with status 1, not clap's default 2.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            process::exit(1);
        }
    };

    // Config is read before any network action so a missing database name
    // fails fast.
    let config = match FeedConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}: {}", "Error".red().bold(), err);
            process::exit(1);
        }
    };

    if let Err(err) = run(&args, &config) {
        eprintln!("{}: {}", "Error".red().bold(), err);
        process::exit(1);
    }
}

fn run(args: &Args, config: &FeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "{} connecting to {}:{}",
        ">>>".green().bold(),
        args.host,
        args.port
    );
    probe_server(&args.host, args.port, DEFAULT_PROBE_ATTEMPTS, DEFAULT_PROBE_DELAY)?;

    let mut client = InfluxClient::new(&args.host, args.port)?;
    if let Some((user, password)) = &config.credentials {
        client = client.with_credentials(user, password);
    }

    let created = ensure_database(&mut client, &config.database)?;
    if created {
        println!(
            "{} created database '{}'",
            ">>>".green().bold(),
            config.database
        );
    } else {
        println!(
            "{} database '{}' already exists",
            ">>>".green().bold(),
            config.database
        );
    }
    client.use_database(&config.database);

    if reset_if_requested(&mut client, MEASUREMENT, created, args.reset)? {
        println!("{} cleared series '{}'", ">>>".green().bold(), MEASUREMENT);
    }

    // The handler only sets a flag; reporting and shutdown happen on the
    // main thread once the loop observes it.
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    })?;

    let limit = (args.count > 0).then_some(args.count);
    let options = FeedOptions::new(MEASUREMENT, limit);
    println!("{}", "Press Ctrl+C to stop".dimmed());

    let emitted = run_feed(&mut client, &options, &cancel)?;
    if cancel.load(Ordering::SeqCst) {
        println!();
        println!("{} stopping", ">>>".green().bold());
    }
    info!("emitted {} samples", emitted);

    let entries = get_entries(&mut client, MEASUREMENT)?;
    println!("{}", render_entries(&entries));

    Ok(())
}
