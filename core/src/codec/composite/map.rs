//! codec/composite/map.rs
//! Key/value mapping.
//!
//! ```text
//! [ count u32 ][ len u32 | key ][ len u32 | value ] x count
//! ```
//!
//! Entry order follows the source map's iteration order and is not stable
//! across encodes of equal maps; only the decoded entries are.

use crate::codec::wire::{put_count, put_u32_prefixed, ByteReader};
use crate::codec::Codec;
use crate::constants::Tag;
use crate::registry::Registry;
use crate::schema::{key_label, Value};
use crate::types::{CodecError, Result};

/// Smallest encoded entry: two u32 length prefixes.
const MIN_ENTRY_LEN: usize = 8;

#[derive(Debug, Clone, Copy)]
pub struct MapCodec {
    key: Tag,
    value: Tag,
}

impl MapCodec {
    pub fn new(key: Tag, value: Tag) -> Self {
        Self { key, value }
    }
}

impl Codec for MapCodec {
    fn name(&self) -> &'static str {
        "map"
    }

    fn encode(
        &self,
        registry: &Registry,
        value: &Value,
        out: &mut Vec<u8>,
        depth: usize,
    ) -> Result<()> {
        let entries = match value {
            Value::Map(entries) => entries,
            other => return Err(CodecError::type_mismatch("map", other.kind())),
        };

        put_count(out, entries.len(), "map")?;
        for (k, v) in entries {
            put_u32_prefixed(out, "map key", |out| {
                registry.encode_nested(self.key, k, out, depth + 1)
            })
            .and_then(|_| {
                put_u32_prefixed(out, "map value", |out| {
                    registry.encode_nested(self.value, v, out, depth + 1)
                })
            })
            .map_err(|e| e.at_key(key_label(k)))?;
        }
        Ok(())
    }

    fn decode(&self, registry: &Registry, data: &[u8], depth: usize) -> Result<Value> {
        let mut r = ByteReader::new(data);
        let count = r.read_u32("map count")? as usize;
        let mut entries = Vec::with_capacity(count.min(r.remaining() / MIN_ENTRY_LEN));

        for i in 0..count {
            let key = r
                .read_u32("map key length")
                .and_then(|len| r.take(len as usize, "map key"))
                .and_then(|payload| registry.decode_nested(self.key, payload, depth + 1))
                .map_err(|e| e.at_index(i))?;
            let value = r
                .read_u32("map value length")
                .and_then(|len| r.take(len as usize, "map value"))
                .and_then(|payload| registry.decode_nested(self.value, payload, depth + 1))
                .map_err(|e| e.at_key(key_label(&key)))?;
            entries.push((key, value));
        }

        r.finish("map payload")?;
        Ok(Value::Map(entries))
    }
}
