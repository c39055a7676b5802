// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Simulated sensor sample.
//!
//! A sample is one reading of the synthetic signal: the scaled sample index
//! is stored as an indexed tag, the sine output as the measured field.

use crate::point::{encode_point, FieldValue};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Tag key carrying the signal input (`index / 10`).
pub const TAG_INPUT: &str = "input";

/// Field key carrying the signal output (`sin(input)`).
pub const FIELD_VALUE: &str = "value";

/// Divisor applied to the sample index to obtain the signal input.
const INPUT_SCALE: f64 = 10.0;

/// One timestamped reading of the simulated sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Zero-based emission index.
    pub index: u64,
    /// Signal input, `index / 10`.
    pub input: f64,
    /// Signal output, `sin(input)`.
    pub value: f64,
    /// Wall-clock time at emission.
    pub timestamp: SystemTime,
}

impl Sample {
    /// Build the sample for a given emission index, stamped with the
    /// current wall-clock time.
    pub fn at(index: u64) -> Self {
        let input = index as f64 / INPUT_SCALE;
        Self {
            index,
            input,
            value: input.sin(),
            timestamp: SystemTime::now(),
        }
    }

    /// Timestamp as nanoseconds since the Unix epoch.
    pub fn timestamp_ns(&self) -> u64 {
        self.timestamp
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }

    /// Encode this sample as one Line Protocol point under `measurement`.
    pub fn to_line_protocol(&self, measurement: &str) -> String {
        let input = format!("{}", self.input);
        encode_point(
            measurement,
            &[(TAG_INPUT, &input)],
            &[(FIELD_VALUE, FieldValue::Float(self.value))],
            self.timestamp_ns(),
        )
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} input={} value={} ts={}ns",
            self.index,
            self.input,
            self.value,
            self.timestamp_ns()
        )
    }
}
