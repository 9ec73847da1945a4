//! telemetry/mod.rs
//! Counters kept by encoders/decoders, and immutable snapshots of them.
//!
//! Notes:
//! - Each encoder/decoder owns its counters; no locks or atomics. Merge
//!   them afterwards when several instances ran in parallel.
//! - Snapshots serialize with serde for logging or export.

pub mod counters;
pub mod snapshot;

pub use counters::*;
pub use snapshot::*;
