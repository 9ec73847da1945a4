//! codec/composite/marshaler.rs
//! Opaque types: `[ len u16 ][ marshal_binary() bytes ]`.

use crate::codec::wire::{put_u16_prefixed, ByteReader};
use crate::codec::Codec;
use crate::registry::Registry;
use crate::schema::{OpaqueDesc, Value};
use crate::types::{CodecError, Result};

#[derive(Debug, Clone, Copy)]
pub struct MarshalerCodec {
    desc: OpaqueDesc,
}

impl MarshalerCodec {
    pub fn new(desc: OpaqueDesc) -> Self {
        Self { desc }
    }
}

impl Codec for MarshalerCodec {
    fn name(&self) -> &'static str {
        "marshaler"
    }

    fn encode(
        &self,
        _registry: &Registry,
        value: &Value,
        out: &mut Vec<u8>,
        _depth: usize,
    ) -> Result<()> {
        let obj = match value {
            Value::Opaque(obj) if obj.type_name() == self.desc.name => obj,
            other => return Err(CodecError::type_mismatch(self.desc.name, other.kind())),
        };
        let bytes = obj.marshal()?;
        put_u16_prefixed(out, "marshaled value", |out| {
            out.extend_from_slice(&bytes);
            Ok(())
        })?;
        Ok(())
    }

    fn decode(&self, _registry: &Registry, data: &[u8], _depth: usize) -> Result<Value> {
        let mut r = ByteReader::new(data);
        let len = r.read_u16("marshaled length")? as usize;
        let payload = r.take(len, "marshaled value")?;
        r.finish("marshaled payload")?;
        Ok(Value::Opaque((self.desc.unmarshal)(payload)?))
    }
}
