//! framing/types.rs
//! Frame header and borrowed frame view.
//!
//! ```text
//! 0xAB | tag u8 | len-of-len u8 | len (len-of-len bytes, BE) | payload | 0xCD
//! ```

use crate::constants::{Tag, LEN_OF_LEN};

/// Overhead of a frame written by the encoder (len-of-len = 2).
pub const FRAME_OVERHEAD: usize = FrameHeader::overhead_for(LEN_OF_LEN);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub tag: Tag,
    pub len_of_len: u8,
    pub payload_len: usize,
}

impl FrameHeader {
    /// Begin marker, tag, len-of-len, length field and end marker.
    pub const fn overhead_for(len_of_len: u8) -> usize {
        1 + 1 + 1 + len_of_len as usize + 1
    }

    pub const fn overhead(&self) -> usize {
        Self::overhead_for(self.len_of_len)
    }

    pub const fn frame_len(&self) -> usize {
        self.overhead() + self.payload_len
    }
}

/// A frame parsed out of a byte slice without copying its payload.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub header: FrameHeader,
    pub payload: &'a [u8],
}
