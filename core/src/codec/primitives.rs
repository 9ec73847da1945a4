//! codec/primitives.rs
//! Fixed-width scalar codecs (big-endian) plus bool, string and complex.
//!
//! Decode enforces the exact width of the type; the enclosing TLV length is
//! the only length on the wire.

use byteorder::{BigEndian, ByteOrder};
use bytes::BufMut;

use crate::codec::wire::expect_width;
use crate::codec::Codec;
use crate::registry::Registry;
use crate::schema::{Complex128, Complex64, Value};
use crate::types::{CodecError, Result};

macro_rules! fixed_width_codec {
    ($($codec:ident => $variant:ident, $name:literal, $width:expr, $put:ident, $read:expr;)*) => {
        $(
            #[derive(Debug, Clone, Copy, Default)]
            pub struct $codec;

            impl Codec for $codec {
                fn name(&self) -> &'static str {
                    $name
                }

                fn encode(
                    &self,
                    _registry: &Registry,
                    value: &Value,
                    out: &mut Vec<u8>,
                    _depth: usize,
                ) -> Result<()> {
                    match value {
                        Value::$variant(v) => {
                            out.$put(*v);
                            Ok(())
                        }
                        other => Err(CodecError::type_mismatch($name, other.kind())),
                    }
                }

                fn decode(
                    &self,
                    _registry: &Registry,
                    data: &[u8],
                    _depth: usize,
                ) -> Result<Value> {
                    expect_width(data, $width, $name)?;
                    Ok(Value::$variant(($read)(data)))
                }
            }
        )*
    };
}

fixed_width_codec! {
    I8Codec  => I8,  "i8",  1, put_i8,  |b: &[u8]| b[0] as i8;
    I16Codec => I16, "i16", 2, put_i16, BigEndian::read_i16;
    I32Codec => I32, "i32", 4, put_i32, BigEndian::read_i32;
    I64Codec => I64, "i64", 8, put_i64, BigEndian::read_i64;
    U8Codec  => U8,  "u8",  1, put_u8,  |b: &[u8]| b[0];
    U16Codec => U16, "u16", 2, put_u16, BigEndian::read_u16;
    U32Codec => U32, "u32", 4, put_u32, BigEndian::read_u32;
    U64Codec => U64, "u64", 8, put_u64, BigEndian::read_u64;
    F32Codec => F32, "f32", 4, put_f32, BigEndian::read_f32;
    F64Codec => F64, "f64", 8, put_f64, BigEndian::read_f64;
}

/// One byte: 0 is false, 1 is true, anything else is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolCodec;

impl Codec for BoolCodec {
    fn name(&self) -> &'static str {
        "bool"
    }

    fn encode(
        &self,
        _registry: &Registry,
        value: &Value,
        out: &mut Vec<u8>,
        _depth: usize,
    ) -> Result<()> {
        match value {
            Value::Bool(b) => {
                out.put_u8(u8::from(*b));
                Ok(())
            }
            other => Err(CodecError::type_mismatch("bool", other.kind())),
        }
    }

    fn decode(&self, _registry: &Registry, data: &[u8], _depth: usize) -> Result<Value> {
        expect_width(data, 1, "bool")?;
        match data[0] {
            0 => Ok(Value::Bool(false)),
            1 => Ok(Value::Bool(true)),
            other => Err(CodecError::malformed(
                "bool",
                format!("byte 0x{:02x} is neither 0 nor 1", other),
            )),
        }
    }
}

/// Raw UTF-8 bytes, no inner length prefix.
///
/// Decode never fails: invalid UTF-8 sequences become U+FFFD.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringCodec;

impl Codec for StringCodec {
    fn name(&self) -> &'static str {
        "string"
    }

    fn encode(
        &self,
        _registry: &Registry,
        value: &Value,
        out: &mut Vec<u8>,
        _depth: usize,
    ) -> Result<()> {
        match value {
            Value::String(s) => {
                out.extend_from_slice(s.as_bytes());
                Ok(())
            }
            other => Err(CodecError::type_mismatch("string", other.kind())),
        }
    }

    fn decode(&self, _registry: &Registry, data: &[u8], _depth: usize) -> Result<Value> {
        Ok(Value::String(String::from_utf8_lossy(data).into_owned()))
    }
}

/// Real part then imaginary part, two f32.
#[derive(Debug, Clone, Copy, Default)]
pub struct Complex64Codec;

impl Codec for Complex64Codec {
    fn name(&self) -> &'static str {
        "complex64"
    }

    fn encode(
        &self,
        _registry: &Registry,
        value: &Value,
        out: &mut Vec<u8>,
        _depth: usize,
    ) -> Result<()> {
        match value {
            Value::Complex64(c) => {
                out.put_f32(c.re);
                out.put_f32(c.im);
                Ok(())
            }
            other => Err(CodecError::type_mismatch("complex64", other.kind())),
        }
    }

    fn decode(&self, _registry: &Registry, data: &[u8], _depth: usize) -> Result<Value> {
        expect_width(data, 8, "complex64")?;
        Ok(Value::Complex64(Complex64::new(
            BigEndian::read_f32(&data[0..4]),
            BigEndian::read_f32(&data[4..8]),
        )))
    }
}

/// Real part then imaginary part, two f64.
#[derive(Debug, Clone, Copy, Default)]
pub struct Complex128Codec;

impl Codec for Complex128Codec {
    fn name(&self) -> &'static str {
        "complex128"
    }

    fn encode(
        &self,
        _registry: &Registry,
        value: &Value,
        out: &mut Vec<u8>,
        _depth: usize,
    ) -> Result<()> {
        match value {
            Value::Complex128(c) => {
                out.put_f64(c.re);
                out.put_f64(c.im);
                Ok(())
            }
            other => Err(CodecError::type_mismatch("complex128", other.kind())),
        }
    }

    fn decode(&self, _registry: &Registry, data: &[u8], _depth: usize) -> Result<Value> {
        expect_width(data, 16, "complex128")?;
        Ok(Value::Complex128(Complex128::new(
            BigEndian::read_f64(&data[0..8]),
            BigEndian::read_f64(&data[8..16]),
        )))
    }
}
