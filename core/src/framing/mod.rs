//! Single-object framing.
//!
//! Responsibilities:
//! - Wrap one codec payload in begin/end markers with its tag and length
//! - Read frames back from a byte source with strict validation
//!
//! Non-responsibilities:
//! - Transport (callers supply `Read`/`Write`)
//! - Multi-object containers (see `stream`)

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{FrameHeader, FrameView, FRAME_OVERHEAD};
pub use encode::Encoder;
pub use decode::{decode_frame, parse_frame, Decoder};
