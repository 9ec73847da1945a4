//! stream/types.rs
//! Counted stream container layout.
//!
//! ```text
//! "CRYB" | count u32 | object * count | "CRYE"
//! object: len-of-len u8 (2|4) | len | tag u8 | codec payload | "CRYO"
//! ```

use crate::constants::{STREAM_BEGIN, STREAM_END, STREAM_OBJECT_END};

/// Begin marker, object count and end marker.
pub const STREAM_FIXED_OVERHEAD: usize = STREAM_BEGIN.len() + 4 + STREAM_END.len();

/// Object length widths accepted in a stream.
pub const SHORT_LEN: u8 = 2;
pub const LONG_LEN: u8 = 4;

/// Length-of-length used for an object body of `len` bytes.
pub const fn len_of_len_for(len: usize) -> u8 {
    if len <= u16::MAX as usize {
        SHORT_LEN
    } else {
        LONG_LEN
    }
}

/// Framing bytes around one object body.
pub const fn object_overhead(len_of_len: u8) -> usize {
    1 + len_of_len as usize + STREAM_OBJECT_END.len()
}
