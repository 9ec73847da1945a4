//! codec/composite/mod.rs
//! Codecs composed from other codecs (by tag).

pub mod struct_codec;
pub mod sequence;
pub mod map;
pub mod pointer;
pub mod any;
pub mod marshaler;

pub use struct_codec::{StructCodec, StructField};
pub use sequence::{ArrayCodec, SliceCodec};
pub use map::MapCodec;
pub use pointer::PointerCodec;
pub use any::AnyCodec;
pub use marshaler::MarshalerCodec;
