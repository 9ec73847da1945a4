//! telemetry/counters.rs
//! Mutable counters kept by encoders and decoders.
//!
//! Summary: frame counts plus payload and framing-overhead byte counts.
//! Converted into an immutable `TelemetrySnapshot` when reported.

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub frames_encoded: u64,
    pub frames_decoded: u64,
    pub bytes_payload: u64,
    pub bytes_overhead: u64,
}

impl TelemetryCounters {
    /// Record one encoded frame or stream object.
    ///
    /// - `payload_len`: codec payload bytes
    /// - `overhead_len`: markers, tag and length fields around the payload
    pub fn add_encoded(&mut self, payload_len: usize, overhead_len: usize) {
        self.frames_encoded += 1;
        self.bytes_payload += payload_len as u64;
        self.bytes_overhead += overhead_len as u64;
    }

    /// Record one decoded frame or stream object.
    pub fn add_decoded(&mut self, payload_len: usize, overhead_len: usize) {
        self.frames_decoded += 1;
        self.bytes_payload += payload_len as u64;
        self.bytes_overhead += overhead_len as u64;
    }

    /// Framing bytes not attributable to a single object (stream begin,
    /// count and end markers).
    pub fn add_overhead(&mut self, len: usize) {
        self.bytes_overhead += len as u64;
    }

    pub fn total_bytes(&self) -> u64 {
        self.bytes_payload + self.bytes_overhead
    }

    // Per-instance counters are merged at the end instead of shared.
    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.frames_encoded += other.frames_encoded;
        self.frames_decoded += other.frames_decoded;
        self.bytes_payload += other.bytes_payload;
        self.bytes_overhead += other.bytes_overhead;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
