use std::fmt;
use num_enum::TryFromPrimitive;

use crate::constants::{PrimitiveTag, Tag};

pub fn enum_name_or_hex<T>(raw: T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Debug,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(raw) {
        Ok(variant) => format!("{:?}", variant),
        Err(_) => format!("0x{:x}", raw),
    }
}

/// Render a tag as its reserved name (`I32`, `Any`, ...) or as hex.
pub fn fmt_tag(tag: &Tag) -> String {
    enum_name_or_hex::<PrimitiveTag>(*tag)
}

pub fn fmt_bytes(b: &[u8]) -> String {
    if !b.is_empty() && b.iter().all(|&c| c.is_ascii_graphic() || c == b' ') {
        format!("b\"{}\"", String::from_utf8_lossy(b))
    } else {
        format!("0x{}", hex::encode(b))
    }
}
