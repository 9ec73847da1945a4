//! constants.rs
//! Wire markers, reserved tag numbers and tag-space bounds.
//!
//! Every value here is part of the wire contract; changing one breaks
//! compatibility with previously written frames and streams.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Wire tag naming a codec/type in the registry.
pub type Tag = u8;

/// Begin-of-frame marker.
pub const FRAME_BEGIN: u8 = 0xAB;
/// End-of-frame marker.
pub const FRAME_END: u8 = 0xCD;

/// Length-of-length written by the encoder for frames and struct fields.
pub const LEN_OF_LEN: u8 = 2;
/// Largest length-of-length accepted on decode.
pub const MAX_LEN_OF_LEN: u8 = 4;

/// Stream container markers (counted mode).
pub const STREAM_BEGIN: [u8; 4] = *b"CRYB";
pub const STREAM_OBJECT_END: [u8; 4] = *b"CRYO";
pub const STREAM_END: [u8; 4] = *b"CRYE";

/// Reserved range for primitives and well-known wrappers.
pub const RESERVED_TAG_MIN: Tag = 1;
pub const RESERVED_TAG_MAX: Tag = 20;

/// Deepest composite nesting encoded or decoded. Bounds recursion on
/// hostile input (a pointer chain costs two levels per struct).
pub const MAX_NESTING_DEPTH: usize = 256;

/// Auto-assigned composite tags start here and are never reused.
pub const FIRST_COMPOSITE_TAG: Tag = 200;
pub const LAST_COMPOSITE_TAG: Tag = 255;

/// Reserved tags (stable across processes).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
pub enum PrimitiveTag {
    I32        = 1,
    I64        = 2,
    I8         = 3,
    I16        = 4,
    U8         = 5,
    U16        = 6,
    U32        = 7,
    U64        = 8,
    F32        = 9,
    F64        = 10,
    Bool       = 11,
    String     = 12,
    Complex64  = 13,
    Complex128 = 14,
    Any        = 15,
    DynMap     = 16,
    Zone       = 17,
}

impl PrimitiveTag {
    #[inline]
    pub const fn tag(self) -> Tag {
        self as Tag
    }

    /// True if `tag` lies in the reserved primitive range.
    #[inline]
    pub const fn is_reserved(tag: Tag) -> bool {
        tag >= RESERVED_TAG_MIN && tag <= RESERVED_TAG_MAX
    }
}
