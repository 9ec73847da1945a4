//! codec/zone.rs
//! Built-in opaque type bound at the reserved `Zone` tag: a named
//! fixed-offset timezone.
//!
//! Wire form (inside the marshaler's u16 length prefix):
//!
//! ```text
//! [ offset seconds east of UTC: i32 BE ][ name: UTF-8, rest of payload ]
//! ```

use byteorder::{BigEndian, ByteOrder};
use bytes::BufMut;

use crate::schema::Marshaler;
use crate::typed_opaque;
use crate::types::{CodecError, Result};

/// Offsets must stay strictly inside one day.
const MAX_OFFSET_SECONDS: i32 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Zone {
    name: String,
    offset_seconds: i32,
}

impl Zone {
    pub fn utc() -> Self {
        Self { name: "UTC".to_string(), offset_seconds: 0 }
    }

    pub fn fixed(name: impl Into<String>, offset_seconds: i32) -> Result<Self> {
        check_offset(offset_seconds)?;
        Ok(Self { name: name.into(), offset_seconds })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn offset_seconds(&self) -> i32 {
        self.offset_seconds
    }
}

impl Default for Zone {
    fn default() -> Self {
        Self::utc()
    }
}

fn check_offset(offset_seconds: i32) -> Result<()> {
    if offset_seconds.unsigned_abs() >= MAX_OFFSET_SECONDS.unsigned_abs() {
        return Err(CodecError::Marshal {
            type_name: Zone::TYPE_NAME,
            detail: format!("offset {}s out of range", offset_seconds),
        });
    }
    Ok(())
}

impl Marshaler for Zone {
    const TYPE_NAME: &'static str = "cryo::Zone";

    fn marshal_binary(&self) -> Result<Vec<u8>> {
        check_offset(self.offset_seconds)?;
        let mut out = Vec::with_capacity(4 + self.name.len());
        out.put_i32(self.offset_seconds);
        out.put_slice(self.name.as_bytes());
        Ok(out)
    }

    fn unmarshal_binary(data: &[u8]) -> Result<Self> {
        if data.len() < 4 {
            return Err(CodecError::Marshal {
                type_name: Self::TYPE_NAME,
                detail: format!("need at least 4 bytes, got {}", data.len()),
            });
        }
        let offset_seconds = BigEndian::read_i32(&data[..4]);
        check_offset(offset_seconds)?;
        let name = std::str::from_utf8(&data[4..]).map_err(|e| CodecError::Marshal {
            type_name: Self::TYPE_NAME,
            detail: format!("zone name: {}", e),
        })?;
        Ok(Self { name: name.to_string(), offset_seconds })
    }
}

typed_opaque!(Zone);
