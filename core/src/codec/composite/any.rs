//! codec/composite/any.rs
//! "Any" values: the concrete type's tag travels with the payload.
//!
//! ```text
//! [ tag u8 ][ len u16 ][ value (len) ]      or zero bytes for nil
//! ```

use bytes::BufMut;

use crate::codec::wire::{put_u16_prefixed, ByteReader};
use crate::codec::Codec;
use crate::registry::Registry;
use crate::schema::{Dynamic, Value};
use crate::types::{CodecError, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct AnyCodec;

impl Codec for AnyCodec {
    fn name(&self) -> &'static str {
        "any"
    }

    fn encode(
        &self,
        registry: &Registry,
        value: &Value,
        out: &mut Vec<u8>,
        depth: usize,
    ) -> Result<()> {
        let dynamic = match value {
            Value::Dynamic(d) => d,
            other => return Err(CodecError::type_mismatch("any", other.kind())),
        };

        let (desc, inner) = match (dynamic.type_desc(), dynamic.value()) {
            (Some(desc), Some(inner)) => (desc, inner),
            _ => return Ok(()),
        };

        let tag = registry.lookup_tag(desc)?;
        out.put_u8(tag);
        put_u16_prefixed(out, "any value", |out| {
            registry.encode_nested(tag, inner, out, depth + 1)
        })?;
        Ok(())
    }

    fn decode(&self, registry: &Registry, data: &[u8], depth: usize) -> Result<Value> {
        if data.is_empty() {
            return Ok(Value::Dynamic(Dynamic::nil()));
        }

        let mut r = ByteReader::new(data);
        let tag = r.read_u8("any tag")?;
        let len = r.read_u16("any length")? as usize;
        let payload = r.take(len, "any value")?;
        r.finish("any payload")?;

        let desc = registry.desc(tag)?.clone();
        let inner = registry.decode_nested(tag, payload, depth + 1)?;
        Ok(Value::Dynamic(Dynamic::from_parts(desc, inner)))
    }
}
