//! codec/mod.rs
//! Codec contract plus primitive and composite implementations.
//!
//! Notes:
//! - A codec appends its payload to a caller-owned buffer; the enclosing TLV
//!   (frame, struct field, element) owns the length prefix.
//! - Composite codecs store child tags, not child codecs, and look children
//!   up in the registry on every call. Recursive types resolve to tag cycles,
//!   never to ownership cycles.
//! - Nesting is capped at `MAX_NESTING_DEPTH`; deeper input is an error,
//!   not unbounded recursion.

pub mod wire;
pub mod primitives;
pub mod composite;
pub mod zone;

pub use primitives::*;
pub use composite::*;
pub use zone::Zone;

use crate::registry::Registry;
use crate::schema::Value;
use crate::types::Result;

// Require Send + Sync so a frozen registry can be shared across threads.
//
// `depth` is the nesting level of the value being handled. Composite codecs
// hand `depth + 1` to `Registry::encode_nested` / `decode_nested` for their
// children; leaf codecs ignore it.
pub trait Codec: Send + Sync {
    /// Short codec name for diagnostics and the schema dump.
    fn name(&self) -> &'static str;

    /// Append the encoding of `value` to `out`.
    fn encode(&self, registry: &Registry, value: &Value, out: &mut Vec<u8>, depth: usize)
        -> Result<()>;

    /// Decode exactly `data` (the enclosing length is authoritative).
    fn decode(&self, registry: &Registry, data: &[u8], depth: usize) -> Result<Value>;
}
