//! telemetry/snapshot.rs
//! Immutable view of a set of counters, with derived ratios.

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub frames_encoded: u64,
    pub frames_decoded: u64,
    pub bytes_payload: u64,
    pub bytes_overhead: u64,
    /// `bytes_overhead / (bytes_payload + bytes_overhead)`, 0.0 when nothing
    /// was counted.
    pub overhead_ratio: f64,
}

impl TelemetrySnapshot {
    pub fn from_counters(counters: &TelemetryCounters) -> Self {
        let total = counters.total_bytes();
        let overhead_ratio = if total > 0 {
            counters.bytes_overhead as f64 / total as f64
        } else {
            0.0
        };

        Self {
            frames_encoded: counters.frames_encoded,
            frames_decoded: counters.frames_decoded,
            bytes_payload: counters.bytes_payload,
            bytes_overhead: counters.bytes_overhead,
            overhead_ratio,
        }
    }

    pub fn frames_total(&self) -> u64 {
        self.frames_encoded + self.frames_decoded
    }

    pub fn sanity_check(&self) -> bool {
        (0.0..=1.0).contains(&self.overhead_ratio)
            && (self.frames_total() > 0 || self.bytes_payload == 0)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<&TelemetryCounters> for TelemetrySnapshot {
    fn from(counters: &TelemetryCounters) -> Self {
        Self::from_counters(counters)
    }
}
