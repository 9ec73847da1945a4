//! codec/wire.rs
//! Bounds-checked big-endian reads and length-prefixed writes.
//!
//! Every read goes through `ByteReader`, which reports `Truncated` instead of
//! slicing past the end of the input.

use std::io::{self, Read};

use byteorder::{BigEndian, ByteOrder};
use bytes::BufMut;

use crate::constants::MAX_LEN_OF_LEN;
use crate::types::{CodecError, Result};

/// Cursor over a borrowed payload.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn take(&mut self, n: usize, context: &'static str) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(CodecError::Truncated { context, needed: n, available: self.remaining() });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_u8(&mut self, context: &'static str) -> Result<u8> {
        Ok(self.take(1, context)?[0])
    }

    pub fn read_u16(&mut self, context: &'static str) -> Result<u16> {
        Ok(BigEndian::read_u16(self.take(2, context)?))
    }

    pub fn read_u32(&mut self, context: &'static str) -> Result<u32> {
        Ok(BigEndian::read_u32(self.take(4, context)?))
    }

    /// Read a `len_of_len`-byte big-endian length.
    pub fn read_len(&mut self, len_of_len: u8, context: &'static str) -> Result<usize> {
        check_len_of_len(len_of_len, context)?;
        let bytes = self.take(len_of_len as usize, context)?;
        Ok(BigEndian::read_uint(bytes, bytes.len()) as usize)
    }

    /// Reject trailing bytes once a payload has been fully parsed.
    pub fn finish(&self, context: &'static str) -> Result<()> {
        if !self.is_empty() {
            return Err(CodecError::LengthMismatch {
                context,
                expected: self.pos,
                actual: self.buf.len(),
            });
        }
        Ok(())
    }
}

pub fn check_len_of_len(len_of_len: u8, context: &'static str) -> Result<()> {
    if len_of_len == 0 || len_of_len > MAX_LEN_OF_LEN {
        return Err(CodecError::malformed(
            context,
            format!("length-of-length {} not in 1..={}", len_of_len, MAX_LEN_OF_LEN),
        ));
    }
    Ok(())
}

/// Exact-width check used by every fixed-width codec.
#[inline]
pub fn expect_width(data: &[u8], width: usize, context: &'static str) -> Result<()> {
    if data.len() != width {
        return Err(CodecError::LengthMismatch { context, expected: width, actual: data.len() });
    }
    Ok(())
}

/// Write a u16 length placeholder, run `body`, then patch the length in.
pub fn put_u16_prefixed<F>(out: &mut Vec<u8>, context: &'static str, body: F) -> Result<usize>
where
    F: FnOnce(&mut Vec<u8>) -> Result<()>,
{
    let at = out.len();
    out.put_u16(0);
    body(out)?;
    let len = out.len() - at - 2;
    let wire_len = u16::try_from(len)
        .map_err(|_| CodecError::Overflow { context, len, max: u16::MAX as usize })?;
    BigEndian::write_u16(&mut out[at..at + 2], wire_len);
    Ok(len)
}

/// Write a u32 length placeholder, run `body`, then patch the length in.
pub fn put_u32_prefixed<F>(out: &mut Vec<u8>, context: &'static str, body: F) -> Result<usize>
where
    F: FnOnce(&mut Vec<u8>) -> Result<()>,
{
    let at = out.len();
    out.put_u32(0);
    body(out)?;
    let len = out.len() - at - 4;
    let wire_len = u32::try_from(len)
        .map_err(|_| CodecError::Overflow { context, len, max: u32::MAX as usize })?;
    BigEndian::write_u32(&mut out[at..at + 4], wire_len);
    Ok(len)
}

/// Element/entry count as a u32.
pub fn put_count(out: &mut Vec<u8>, count: usize, context: &'static str) -> Result<()> {
    let wire = u32::try_from(count)
        .map_err(|_| CodecError::Overflow { context, len: count, max: u32::MAX as usize })?;
    out.put_u32(wire);
    Ok(())
}

/// Fill `buf` from `reader`, reporting how many bytes arrived on a short read.
pub fn read_full<R: Read>(reader: &mut R, buf: &mut [u8], context: &'static str) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(CodecError::Truncated { context, needed: buf.len(), available: filled })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Read exactly `len` bytes without trusting `len` for the allocation size.
pub fn read_payload<R: Read>(reader: &mut R, len: usize, context: &'static str) -> Result<Vec<u8>> {
    let mut payload = Vec::new();
    reader.take(len as u64).read_to_end(&mut payload)?;
    if payload.len() != len {
        return Err(CodecError::Truncated { context, needed: len, available: payload.len() });
    }
    Ok(payload)
}

/// Read a fixed marker and compare it.
pub fn read_marker<R: Read, const N: usize>(
    reader: &mut R,
    expected: &[u8; N],
    marker: &'static str,
) -> Result<()> {
    let mut found = [0u8; N];
    read_full(reader, &mut found, marker)?;
    if &found != expected {
        return Err(CodecError::Framing {
            marker,
            expected: crate::utils::fmt_bytes(expected),
            found: crate::utils::fmt_bytes(&found),
        });
    }
    Ok(())
}
