//! framing/encode.rs
//! Single-frame encoder.

use std::io::Write;

use bytes::BufMut;

use crate::codec::wire::put_u16_prefixed;
use crate::constants::{FRAME_BEGIN, FRAME_END, LEN_OF_LEN};
use crate::framing::types::FRAME_OVERHEAD;
use crate::registry::{Registry, RegistryAccess};
use crate::schema::{Dynamic, TypeDesc, Typed, Value};
use crate::telemetry::TelemetryCounters;

use crate::types::Result;

/// Frames one value per call.
///
/// The internal buffer is cleared at the start of every call and a fresh
/// copy is returned, so nothing from a previous (possibly failed) call is
/// observable.
pub struct Encoder<'r> {
    registry: RegistryAccess<'r>,
    buf: Vec<u8>,
    counters: TelemetryCounters,
}

impl<'r> Encoder<'r> {
    /// Lookup-only encoder: every type must already be registered.
    pub fn new(registry: &'r Registry) -> Self {
        Self::with_access(RegistryAccess::Shared(registry))
    }

    /// Encoder that registers unseen types on first use.
    pub fn resolving(registry: &'r mut Registry) -> Self {
        Self::with_access(RegistryAccess::Resolving(registry))
    }

    fn with_access(registry: RegistryAccess<'r>) -> Self {
        Self { registry, buf: Vec::new(), counters: TelemetryCounters::default() }
    }

    pub fn encode<T: Typed>(&mut self, value: &T) -> Result<Vec<u8>> {
        self.encode_value(&T::type_desc(), &value.to_value())
    }

    /// Frame the concrete value held by `value`. A nil value is framed as
    /// an empty "any" payload.
    pub fn encode_dynamic(&mut self, value: &Dynamic) -> Result<Vec<u8>> {
        match (value.type_desc(), value.value()) {
            (Some(desc), Some(inner)) => self.encode_value(desc, inner),
            _ => self.encode_value(&TypeDesc::Any, &Value::Dynamic(Dynamic::nil())),
        }
    }

    pub fn encode_value(&mut self, desc: &TypeDesc, value: &Value) -> Result<Vec<u8>> {
        let tag = self.registry.tag_for(desc, value)?;
        let registry = self.registry.get();

        self.buf.clear();
        self.buf.put_u8(FRAME_BEGIN);
        self.buf.put_u8(tag);
        self.buf.put_u8(LEN_OF_LEN);
        let payload_len = put_u16_prefixed(&mut self.buf, "frame payload", |out| {
            registry.encode_payload(tag, value, out)
        })?;
        self.buf.put_u8(FRAME_END);

        self.counters.add_encoded(payload_len, FRAME_OVERHEAD);
        Ok(self.buf.clone())
    }

    /// Encode and write one frame; returns the frame length.
    pub fn encode_to<T: Typed, W: Write>(&mut self, value: &T, sink: &mut W) -> Result<usize> {
        let frame = self.encode(value)?;
        sink.write_all(&frame)?;
        Ok(frame.len())
    }

    pub fn counters(&self) -> &TelemetryCounters {
        &self.counters
    }
}
