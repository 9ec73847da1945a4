//! stream/encode.rs
//! Buffers objects and writes them as one counted stream.

use std::io::Write;

use bytes::BufMut;

use crate::codec::wire::put_count;
use crate::constants::{STREAM_BEGIN, STREAM_END, STREAM_OBJECT_END};
use crate::registry::{Registry, RegistryAccess};
use crate::schema::{Dynamic, TypeDesc, Typed, Value};
use crate::stream::types::{len_of_len_for, object_overhead, LONG_LEN, STREAM_FIXED_OVERHEAD};
use crate::telemetry::TelemetryCounters;
use crate::types::{CodecError, Result};

pub struct StreamEncoder<'r> {
    registry: RegistryAccess<'r>,
    /// Object bodies (`tag | codec payload`), in push order.
    objects: Vec<Vec<u8>>,
    counters: TelemetryCounters,
}

impl<'r> StreamEncoder<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self::with_access(RegistryAccess::Shared(registry))
    }

    pub fn resolving(registry: &'r mut Registry) -> Self {
        Self::with_access(RegistryAccess::Resolving(registry))
    }

    fn with_access(registry: RegistryAccess<'r>) -> Self {
        Self { registry, objects: Vec::new(), counters: TelemetryCounters::default() }
    }

    pub fn push<T: Typed>(&mut self, value: &T) -> Result<()> {
        self.push_value(&T::type_desc(), &value.to_value())
    }

    pub fn push_dynamic(&mut self, value: &Dynamic) -> Result<()> {
        match (value.type_desc(), value.value()) {
            (Some(desc), Some(inner)) => self.push_value(desc, inner),
            _ => self.push_value(&TypeDesc::Any, &Value::Dynamic(Dynamic::nil())),
        }
    }

    pub fn push_value(&mut self, desc: &TypeDesc, value: &Value) -> Result<()> {
        let tag = self.registry.tag_for(desc, value)?;
        let mut body = vec![tag];
        self.registry.get().encode_payload(tag, value, &mut body)?;

        if body.len() > u32::MAX as usize {
            return Err(CodecError::Overflow {
                context: "stream object",
                len: body.len(),
                max: u32::MAX as usize,
            });
        }
        self.objects.push(body);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Emit the whole stream and reset the encoder.
    pub fn finish(&mut self) -> Result<Vec<u8>> {
        let objects = std::mem::take(&mut self.objects);
        let body_len: usize = objects.iter().map(|o| o.len() + object_overhead(LONG_LEN)).sum();

        let mut out = Vec::with_capacity(STREAM_FIXED_OVERHEAD + body_len);
        out.put_slice(&STREAM_BEGIN);
        put_count(&mut out, objects.len(), "stream object count")?;

        for body in &objects {
            let len_of_len = len_of_len_for(body.len());
            out.put_u8(len_of_len);
            match len_of_len {
                LONG_LEN => out.put_u32(body.len() as u32),
                _ => out.put_u16(body.len() as u16),
            }
            out.put_slice(body);
            out.put_slice(&STREAM_OBJECT_END);

            // The tag byte counts as framing.
            self.counters.add_encoded(body.len() - 1, object_overhead(len_of_len) + 1);
        }

        out.put_slice(&STREAM_END);
        self.counters.add_overhead(STREAM_FIXED_OVERHEAD);
        log::debug!("stream: wrote {} objects, {} bytes", objects.len(), out.len());
        Ok(out)
    }

    /// `finish` straight into a sink; returns the number of bytes written.
    pub fn write_to<W: Write>(&mut self, sink: &mut W) -> Result<usize> {
        let bytes = self.finish()?;
        sink.write_all(&bytes)?;
        Ok(bytes.len())
    }

    pub fn counters(&self) -> &TelemetryCounters {
        &self.counters
    }
}
