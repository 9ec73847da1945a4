//! Counted multi-object stream container.
//!
//! Responsibilities:
//! - Write a begin marker, object count, objects and an end marker
//! - Read exactly the announced number of objects, then check the end marker
//!
//! The object count is authoritative: no peeking ahead for an end sentinel.

pub mod types;
pub mod encode;
pub mod decode;

pub use encode::StreamEncoder;
pub use decode::StreamDecoder;
