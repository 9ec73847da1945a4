//! codec/composite/sequence.rs
//! Variable-length slices and fixed-length arrays.
//!
//! ```text
//! slice: [ count u32 ][ len u32 | elem ] x count
//! array:              [ len u32 | elem ] x N      (N is part of the type)
//! ```

use crate::codec::wire::{put_count, put_u32_prefixed, ByteReader};
use crate::codec::Codec;
use crate::constants::Tag;
use crate::registry::Registry;
use crate::schema::Value;
use crate::types::{CodecError, Result};

/// Smallest encoded element: its u32 length prefix.
const MIN_ELEMENT_LEN: usize = 4;

fn encode_elements(
    registry: &Registry,
    elem: Tag,
    items: &[Value],
    out: &mut Vec<u8>,
    depth: usize,
) -> Result<()> {
    for (i, item) in items.iter().enumerate() {
        put_u32_prefixed(out, "element", |out| registry.encode_nested(elem, item, out, depth + 1))
            .map_err(|e| e.at_index(i))?;
    }
    Ok(())
}

fn decode_elements(
    registry: &Registry,
    elem: Tag,
    r: &mut ByteReader<'_>,
    count: usize,
    depth: usize,
) -> Result<Vec<Value>> {
    // A hostile count must not drive the allocation.
    let mut items = Vec::with_capacity(count.min(r.remaining() / MIN_ELEMENT_LEN));
    for i in 0..count {
        let item = r
            .read_u32("element length")
            .and_then(|len| r.take(len as usize, "element value"))
            .and_then(|payload| registry.decode_nested(elem, payload, depth + 1))
            .map_err(|e| e.at_index(i))?;
        items.push(item);
    }
    Ok(items)
}

#[derive(Debug, Clone, Copy)]
pub struct SliceCodec {
    elem: Tag,
}

impl SliceCodec {
    pub fn new(elem: Tag) -> Self {
        Self { elem }
    }
}

impl Codec for SliceCodec {
    fn name(&self) -> &'static str {
        "slice"
    }

    fn encode(
        &self,
        registry: &Registry,
        value: &Value,
        out: &mut Vec<u8>,
        depth: usize,
    ) -> Result<()> {
        let items = match value {
            Value::Slice(items) => items,
            other => return Err(CodecError::type_mismatch("slice", other.kind())),
        };
        put_count(out, items.len(), "slice")?;
        encode_elements(registry, self.elem, items, out, depth)
    }

    fn decode(&self, registry: &Registry, data: &[u8], depth: usize) -> Result<Value> {
        let mut r = ByteReader::new(data);
        let count = r.read_u32("slice count")? as usize;
        let items = decode_elements(registry, self.elem, &mut r, count, depth)?;
        r.finish("slice payload")?;
        Ok(Value::Slice(items))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ArrayCodec {
    elem: Tag,
    len: usize,
}

impl ArrayCodec {
    pub fn new(elem: Tag, len: usize) -> Self {
        Self { elem, len }
    }
}

impl Codec for ArrayCodec {
    fn name(&self) -> &'static str {
        "array"
    }

    fn encode(
        &self,
        registry: &Registry,
        value: &Value,
        out: &mut Vec<u8>,
        depth: usize,
    ) -> Result<()> {
        let items = match value {
            Value::Array(items) => items,
            other => return Err(CodecError::type_mismatch("array", other.kind())),
        };
        if items.len() != self.len {
            return Err(CodecError::ArrayLength { expected: self.len, actual: items.len() });
        }
        encode_elements(registry, self.elem, items, out, depth)
    }

    fn decode(&self, registry: &Registry, data: &[u8], depth: usize) -> Result<Value> {
        let mut r = ByteReader::new(data);
        let items = decode_elements(registry, self.elem, &mut r, self.len, depth)?;
        r.finish("array payload")?;
        Ok(Value::Array(items))
    }
}
