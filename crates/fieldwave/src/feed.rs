// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The main write loop.
//!
//! One sample per interval: write it through the store, echo it to stdout,
//! sleep. The cancel flag (set from the Ctrl+C handler) is observed both at
//! the top of each iteration and inside the sleep, so an interrupt never
//! waits out a full interval and never emits a further sample.

use crate::signal::SineWave;
use crate::store::{SampleStore, StoreError};
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Granularity of cancel checks inside the inter-sample sleep.
const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// Feed loop parameters.
#[derive(Debug, Clone)]
pub struct FeedOptions {
    /// Series the samples are written to.
    pub measurement: String,
    /// Emission bound; `None` runs until cancelled.
    pub limit: Option<u64>,
    /// Pause between samples. One second models a sensor polled at 1 Hz.
    pub interval: Duration,
}

impl FeedOptions {
    /// Production options: 1 Hz pacing for the given series.
    pub fn new(measurement: &str, limit: Option<u64>) -> Self {
        Self {
            measurement: measurement.to_string(),
            limit,
            interval: Duration::from_secs(1),
        }
    }
}

/// Generate and store samples until the bound is reached or `cancel` is
/// set. Returns the number of samples emitted.
///
/// Each emitted sample is echoed to stdout; storage failures abort the
/// loop immediately (no retry policy exists for writes).
pub fn run_feed<S: SampleStore>(
    store: &mut S,
    options: &FeedOptions,
    cancel: &AtomicBool,
) -> Result<u64, StoreError> {
    let mut wave = SineWave::new(options.limit);
    let mut emitted = 0u64;

    while !cancel.load(Ordering::SeqCst) {
        let Some(sample) = wave.next() else {
            debug!("emission bound reached after {} samples", emitted);
            break;
        };

        store.write_sample(&options.measurement, &sample)?;
        println!("{} {}", options.measurement, sample);
        emitted += 1;

        sleep_observing(cancel, options.interval);
    }

    Ok(emitted)
}

/// Sleep for `total`, returning early as soon as `cancel` is set.
fn sleep_observing(cancel: &AtomicBool, total: Duration) {
    let deadline = Instant::now() + total;
    loop {
        if cancel.load(Ordering::SeqCst) {
            return;
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return;
        }
        std::thread::sleep(remaining.min(SLEEP_SLICE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::Sample;
    use crate::store::SeriesEntries;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    #[derive(Default)]
    struct RecordingStore {
        written: Vec<(String, Sample)>,
    }

    impl SampleStore for RecordingStore {
        fn list_databases(&mut self) -> Result<Vec<String>, StoreError> {
            Ok(Vec::new())
        }

        fn create_database(&mut self, _name: &str) -> Result<(), StoreError> {
            Ok(())
        }

        fn use_database(&mut self, _name: &str) {}

        fn drop_series(&mut self, _measurement: &str) -> Result<(), StoreError> {
            Ok(())
        }

        fn write_sample(&mut self, measurement: &str, sample: &Sample) -> Result<(), StoreError> {
            self.written.push((measurement.to_string(), sample.clone()));
            Ok(())
        }

        fn select_all(&mut self, _m: &str) -> Result<Vec<SeriesEntries>, StoreError> {
            Ok(Vec::new())
        }
    }

    fn fast_options(limit: Option<u64>) -> FeedOptions {
        FeedOptions {
            measurement: "sinewave".to_string(),
            limit,
            interval: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_bounded_feed_emits_exactly_n() {
        let mut store = RecordingStore::default();
        let cancel = AtomicBool::new(false);

        let emitted = run_feed(&mut store, &fast_options(Some(3)), &cancel).expect("feed");

        assert_eq!(emitted, 3);
        assert_eq!(store.written.len(), 3);
        for (i, (measurement, sample)) in store.written.iter().enumerate() {
            assert_eq!(measurement, "sinewave");
            assert_eq!(sample.index, i as u64);
        }
    }

    #[test]
    fn test_feed_timestamps_increase() {
        let mut store = RecordingStore::default();
        let cancel = AtomicBool::new(false);

        run_feed(&mut store, &fast_options(Some(4)), &cancel).expect("feed");

        let stamps: Vec<u64> = store.written.iter().map(|(_, s)| s.timestamp_ns()).collect();
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_cancel_stops_unbounded_feed() {
        let mut store = RecordingStore::default();
        let cancel = Arc::new(AtomicBool::new(false));

        let trigger = Arc::clone(&cancel);
        let setter = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            trigger.store(true, Ordering::SeqCst);
        });

        let emitted = run_feed(&mut store, &fast_options(None), &cancel).expect("feed");
        setter.join().expect("join");

        // Some samples were emitted before the flag, none after.
        assert!(emitted > 0);
        assert_eq!(emitted as usize, store.written.len());
    }

    #[test]
    fn test_pre_set_cancel_emits_nothing() {
        let mut store = RecordingStore::default();
        let cancel = AtomicBool::new(true);

        let emitted = run_feed(&mut store, &fast_options(None), &cancel).expect("feed");

        assert_eq!(emitted, 0);
        assert!(store.written.is_empty());
    }

    #[test]
    fn test_write_failure_aborts_feed() {
        struct FailingStore;

        impl SampleStore for FailingStore {
            fn list_databases(&mut self) -> Result<Vec<String>, StoreError> {
                Ok(Vec::new())
            }
            fn create_database(&mut self, _name: &str) -> Result<(), StoreError> {
                Ok(())
            }
            fn use_database(&mut self, _name: &str) {}
            fn drop_series(&mut self, _m: &str) -> Result<(), StoreError> {
                Ok(())
            }
            fn write_sample(&mut self, _m: &str, _s: &Sample) -> Result<(), StoreError> {
                Err(StoreError::Server {
                    operation: "write point",
                    message: "partition full".to_string(),
                })
            }
            fn select_all(&mut self, _m: &str) -> Result<Vec<SeriesEntries>, StoreError> {
                Ok(Vec::new())
            }
        }

        let cancel = AtomicBool::new(false);
        let result = run_feed(&mut FailingStore, &fast_options(Some(3)), &cancel);
        assert!(result.is_err());
    }

    #[test]
    fn test_sleep_observing_returns_early_on_cancel() {
        let cancel = Arc::new(AtomicBool::new(false));
        let trigger = Arc::clone(&cancel);
        let setter = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(10));
            trigger.store(true, Ordering::SeqCst);
        });

        let start = Instant::now();
        sleep_observing(&cancel, Duration::from_secs(5));
        setter.join().expect("join");

        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
