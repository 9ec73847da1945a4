//! stream/decode.rs
//! Reads a counted stream object by object.

use std::io::Read;

use byteorder::{BigEndian, ByteOrder};

use crate::codec::wire::{read_full, read_marker, read_payload};
use crate::constants::{STREAM_BEGIN, STREAM_END, STREAM_OBJECT_END};
use crate::framing::decode::downcast;
use crate::registry::Registry;
use crate::schema::{Dynamic, Typed};
use crate::stream::types::{object_overhead, LONG_LEN, SHORT_LEN, STREAM_FIXED_OVERHEAD};
use crate::telemetry::TelemetryCounters;
use crate::types::{CodecError, Result};

pub struct StreamDecoder<'r, R> {
    registry: &'r Registry,
    reader: R,
    count: u32,
    read: u32,
    /// End marker validated, or an error ended iteration.
    done: bool,
    counters: TelemetryCounters,
}

impl<'r, R: Read> StreamDecoder<'r, R> {
    /// Read the begin marker and object count.
    pub fn open(registry: &'r Registry, mut reader: R) -> Result<Self> {
        read_marker(&mut reader, &STREAM_BEGIN, "stream begin")?;
        let mut count = [0u8; 4];
        read_full(&mut reader, &mut count, "stream object count")?;
        let count = BigEndian::read_u32(&count);

        log::debug!("stream: opened, {} objects", count);
        Ok(Self {
            registry,
            reader,
            count,
            read: 0,
            done: false,
            counters: TelemetryCounters::default(),
        })
    }

    /// Object count announced by the stream header.
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn remaining(&self) -> u32 {
        self.count - self.read
    }

    /// Next object, or `None` once `count` objects were read and the end
    /// marker checked.
    pub fn next_object(&mut self) -> Result<Option<Dynamic>> {
        if self.read == self.count {
            if !self.done {
                read_marker(&mut self.reader, &STREAM_END, "stream end")?;
                self.counters.add_overhead(STREAM_FIXED_OVERHEAD);
                self.done = true;
            }
            return Ok(None);
        }

        let mut len_of_len = [0u8; 1];
        read_full(&mut self.reader, &mut len_of_len, "object length-of-length")?;
        let len_of_len = len_of_len[0];
        if len_of_len != SHORT_LEN && len_of_len != LONG_LEN {
            return Err(CodecError::malformed(
                "object length-of-length",
                format!("{} is neither {} nor {}", len_of_len, SHORT_LEN, LONG_LEN),
            ));
        }

        let mut len_buf = [0u8; 4];
        let len_bytes = &mut len_buf[..len_of_len as usize];
        read_full(&mut self.reader, len_bytes, "object length")?;
        let len = BigEndian::read_uint(len_bytes, len_of_len as usize) as usize;

        let body = read_payload(&mut self.reader, len, "object body")?;
        read_marker(&mut self.reader, &STREAM_OBJECT_END, "object end")?;

        let (&tag, payload) = body.split_first().ok_or(CodecError::Truncated {
            context: "object tag",
            needed: 1,
            available: 0,
        })?;
        let value = self.registry.decode_dynamic(tag, payload)?;

        self.read += 1;
        self.counters.add_decoded(payload.len(), object_overhead(len_of_len) + 1);
        Ok(Some(value))
    }

    /// Next object converted to `T`.
    pub fn next_as<T: Typed>(&mut self) -> Result<Option<T>> {
        self.next_object()?.map(downcast::<T>).transpose()
    }

    pub fn counters(&self) -> &TelemetryCounters {
        &self.counters
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<'r, R: Read> Iterator for StreamDecoder<'r, R> {
    type Item = Result<Dynamic>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_object() {
            Ok(Some(value)) => Some(Ok(value)),
            Ok(None) => None,
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
