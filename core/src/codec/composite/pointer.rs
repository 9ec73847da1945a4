//! codec/composite/pointer.rs
//! Optional reference: `[ sentinel u8 (0 absent | 1 present) ][ inner payload ]`.

use bytes::BufMut;

use crate::codec::Codec;
use crate::constants::Tag;
use crate::registry::Registry;
use crate::schema::Value;
use crate::types::{CodecError, Result};

const ABSENT: u8 = 0;
const PRESENT: u8 = 1;

#[derive(Debug, Clone, Copy)]
pub struct PointerCodec {
    inner: Tag,
}

impl PointerCodec {
    pub fn new(inner: Tag) -> Self {
        Self { inner }
    }
}

impl Codec for PointerCodec {
    fn name(&self) -> &'static str {
        "pointer"
    }

    fn encode(
        &self,
        registry: &Registry,
        value: &Value,
        out: &mut Vec<u8>,
        depth: usize,
    ) -> Result<()> {
        match value {
            Value::Pointer(None) => {
                out.put_u8(ABSENT);
                Ok(())
            }
            Value::Pointer(Some(inner)) => {
                out.put_u8(PRESENT);
                registry.encode_nested(self.inner, inner, out, depth + 1)
            }
            other => Err(CodecError::type_mismatch("pointer", other.kind())),
        }
    }

    fn decode(&self, registry: &Registry, data: &[u8], depth: usize) -> Result<Value> {
        let (&sentinel, rest) = data.split_first().ok_or(CodecError::Truncated {
            context: "pointer sentinel",
            needed: 1,
            available: 0,
        })?;

        match sentinel {
            ABSENT if rest.is_empty() => Ok(Value::Pointer(None)),
            ABSENT => Err(CodecError::LengthMismatch {
                context: "absent pointer",
                expected: 1,
                actual: data.len(),
            }),
            PRESENT => {
                let inner = registry.decode_nested(self.inner, rest, depth + 1)?;
                Ok(Value::Pointer(Some(Box::new(inner))))
            }
            other => Err(CodecError::malformed(
                "pointer sentinel",
                format!("0x{:02x} is neither 0 nor 1", other),
            )),
        }
    }
}
