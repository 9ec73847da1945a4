//! codec/composite/struct_codec.rs
//! Struct payload: one nested TLV per field, in descriptor order.
//!
//! ```text
//! [ field tag (1) ][ len-of-len = 2 (1) ][ len (2) ][ value (len) ]  x fields
//! ```
//!
//! The field tag is the tag of the field's *type*, so two fields of the same
//! type share a tag. Strict decoding therefore matches by position; lenient
//! decoding assigns a tag to the first still-empty field carrying it.

use bytes::BufMut;
use serde::Serialize;

use crate::codec::wire::{put_u16_prefixed, ByteReader};
use crate::codec::Codec;
use crate::constants::{Tag, LEN_OF_LEN};
use crate::registry::{FieldOrder, Registry};
use crate::schema::{StructValue, Value};
use crate::types::{CodecError, Result};
use crate::utils::fmt_tag;

/// One entry of a struct descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StructField {
    pub name: &'static str,
    pub tag: Tag,
}

#[derive(Debug, Clone)]
pub struct StructCodec {
    name: &'static str,
    fields: Vec<StructField>,
    order: FieldOrder,
}

impl StructCodec {
    pub fn new(name: &'static str, fields: Vec<StructField>, order: FieldOrder) -> Self {
        Self { name, fields, order }
    }

    pub fn fields(&self) -> &[StructField] {
        &self.fields
    }

    fn decode_strict(
        &self,
        registry: &Registry,
        r: &mut ByteReader<'_>,
        depth: usize,
    ) -> Result<StructValue> {
        let mut out = StructValue::new(self.name);
        out.fields.reserve(self.fields.len());

        for field in &self.fields {
            let (tag, payload) = read_field(r).map_err(|e| e.in_field(field.name))?;
            if tag != field.tag {
                return Err(CodecError::FieldOrder {
                    struct_name: self.name,
                    field: field.name,
                    expected: field.tag,
                    found: tag,
                });
            }
            let value = registry
                .decode_nested(tag, payload, depth + 1)
                .map_err(|e| e.in_field(field.name))?;
            out.fields.push((field.name, value));
        }

        r.finish("struct payload")?;
        Ok(out)
    }

    fn decode_lenient(
        &self,
        registry: &Registry,
        r: &mut ByteReader<'_>,
        depth: usize,
    ) -> Result<StructValue> {
        let mut slots: Vec<Option<Value>> = vec![None; self.fields.len()];

        while !r.is_empty() {
            let (tag, payload) = read_field(r)?;
            let slot = self
                .fields
                .iter()
                .zip(slots.iter())
                .position(|(f, s)| f.tag == tag && s.is_none());

            match slot {
                Some(i) => {
                    let field = self.fields[i];
                    let value = registry
                        .decode_nested(tag, payload, depth + 1)
                        .map_err(|e| e.in_field(field.name))?;
                    slots[i] = Some(value);
                }
                None => {
                    log::debug!(
                        "{}: skipping field with unexpected tag {}",
                        self.name,
                        fmt_tag(&tag)
                    );
                }
            }
        }

        let mut out = StructValue::new(self.name);
        for (field, slot) in self.fields.iter().zip(slots) {
            let value = match slot {
                Some(v) => v,
                None => Value::zero_of(registry.desc(field.tag)?)
                    .map_err(|e| e.in_field(field.name))?,
            };
            out.fields.push((field.name, value));
        }
        Ok(out)
    }
}

fn read_field<'a>(r: &mut ByteReader<'a>) -> Result<(Tag, &'a [u8])> {
    let tag = r.read_u8("field tag")?;
    let len_of_len = r.read_u8("field length-of-length")?;
    let len = r.read_len(len_of_len, "field length")?;
    let payload = r.take(len, "field value")?;
    Ok((tag, payload))
}

impl Codec for StructCodec {
    fn name(&self) -> &'static str {
        "struct"
    }

    fn encode(
        &self,
        registry: &Registry,
        value: &Value,
        out: &mut Vec<u8>,
        depth: usize,
    ) -> Result<()> {
        let sv = match value {
            Value::Struct(s) if s.type_name == self.name => s,
            other => return Err(CodecError::type_mismatch(self.name, other.kind())),
        };

        for (i, field) in self.fields.iter().enumerate() {
            let fv = sv.field_at(i, field.name).ok_or(CodecError::MissingField {
                struct_name: self.name,
                field: field.name,
            })?;

            out.put_u8(field.tag);
            out.put_u8(LEN_OF_LEN);
            put_u16_prefixed(out, "struct field", |out| {
                registry.encode_nested(field.tag, fv, out, depth + 1)
            })
            .map_err(|e| e.in_field(field.name))?;
        }
        Ok(())
    }

    fn decode(&self, registry: &Registry, data: &[u8], depth: usize) -> Result<Value> {
        let mut r = ByteReader::new(data);
        let sv = match self.order {
            FieldOrder::Strict => self.decode_strict(registry, &mut r, depth)?,
            FieldOrder::Lenient => self.decode_lenient(registry, &mut r, depth)?,
        };
        Ok(Value::Struct(sv))
    }
}
