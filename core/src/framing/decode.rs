//! framing/decode.rs
//! Single-frame decoder over a byte source, plus a slice parser.

use std::io::Read;

use byteorder::{BigEndian, ByteOrder};

use crate::codec::wire::{check_len_of_len, read_full, read_marker, read_payload, ByteReader};
use crate::constants::{FRAME_BEGIN, FRAME_END};
use crate::framing::types::{FrameHeader, FrameView};
use crate::registry::Registry;
use crate::schema::{Dynamic, Typed, Value};
use crate::telemetry::TelemetryCounters;
use crate::types::{CodecError, Result};

/// Reads frames one at a time from `reader`.
///
/// A short read surfaces as `Truncated`. When not a single byte of the next
/// begin marker arrived, `CodecError::is_end_of_stream` is true; iteration
/// stops there without yielding an error.
pub struct Decoder<'r, R> {
    registry: &'r Registry,
    reader: R,
    counters: TelemetryCounters,
    done: bool,
}

impl<'r, R: Read> Decoder<'r, R> {
    pub fn new(registry: &'r Registry, reader: R) -> Self {
        Self { registry, reader, counters: TelemetryCounters::default(), done: false }
    }

    pub fn decode(&mut self) -> Result<Dynamic> {
        let header = read_header(&mut self.reader)?;
        let payload = read_payload(&mut self.reader, header.payload_len, "frame payload")?;
        let value = self.registry.decode_dynamic(header.tag, &payload)?;
        read_marker(&mut self.reader, &[FRAME_END], "end marker")?;

        self.counters.add_decoded(header.payload_len, header.overhead());
        Ok(value)
    }

    /// Decode one frame and convert it to `T`.
    pub fn decode_as<T: Typed>(&mut self) -> Result<T> {
        downcast(self.decode()?)
    }

    pub fn counters(&self) -> &TelemetryCounters {
        &self.counters
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<'r, R: Read> Iterator for Decoder<'r, R> {
    type Item = Result<Dynamic>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.decode() {
            Ok(value) => Some(Ok(value)),
            Err(e) if e.is_end_of_stream() => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// `T` from a decoded value; "any" targets take the value as-is.
pub(crate) fn downcast<T: Typed>(value: Dynamic) -> Result<T> {
    if T::type_desc() == crate::schema::TypeDesc::Any {
        return T::from_value(Value::Dynamic(value));
    }
    value.downcast()
}

fn read_header<R: Read>(reader: &mut R) -> Result<FrameHeader> {
    read_marker(reader, &[FRAME_BEGIN], "begin marker")?;

    let mut fixed = [0u8; 2];
    read_full(reader, &mut fixed, "frame header")?;
    let [tag, len_of_len] = fixed;
    check_len_of_len(len_of_len, "frame length-of-length")?;

    let mut len_buf = [0u8; 4];
    let len_bytes = &mut len_buf[..len_of_len as usize];
    read_full(reader, len_bytes, "frame length")?;
    let payload_len = BigEndian::read_uint(len_bytes, len_of_len as usize) as usize;

    Ok(FrameHeader { tag, len_of_len, payload_len })
}

/// Parse exactly one frame from `wire`. Trailing bytes are an error.
pub fn parse_frame(wire: &[u8]) -> Result<FrameView<'_>> {
    let mut r = ByteReader::new(wire);
    let begin = r.read_u8("begin marker")?;
    if begin != FRAME_BEGIN {
        return Err(framing_error("begin marker", FRAME_BEGIN, begin));
    }
    let tag = r.read_u8("frame tag")?;
    let len_of_len = r.read_u8("frame length-of-length")?;
    let payload_len = r.read_len(len_of_len, "frame length")?;
    let payload = r.take(payload_len, "frame payload")?;
    let end = r.read_u8("end marker")?;
    if end != FRAME_END {
        return Err(framing_error("end marker", FRAME_END, end));
    }
    r.finish("frame")?;

    Ok(FrameView { header: FrameHeader { tag, len_of_len, payload_len }, payload })
}

/// Decode one in-memory frame.
pub fn decode_frame(registry: &Registry, wire: &[u8]) -> Result<Dynamic> {
    let frame = parse_frame(wire)?;
    registry.decode_dynamic(frame.header.tag, frame.payload)
}

fn framing_error(marker: &'static str, expected: u8, found: u8) -> CodecError {
    CodecError::Framing {
        marker,
        expected: format!("0x{:02x}", expected),
        found: format!("0x{:02x}", found),
    }
}
