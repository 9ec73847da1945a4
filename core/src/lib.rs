//! cryo-core
//!
//! Self-describing TLV binary serialization with a type registry.
//! Pure Rust, transport-agnostic (callers supply `Read`/`Write`).

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;

// Types and codecs
pub mod schema;
pub mod codec;
pub mod registry;

// Wire layers
pub mod framing;
pub mod stream;
pub mod telemetry;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::codec::{Codec, Zone};
    pub use crate::constants::{PrimitiveTag, Tag};
    pub use crate::framing::{decode_frame, Decoder, Encoder};
    pub use crate::registry::{FieldOrder, Registry, RegistryConfig, SharedRegistry};
    pub use crate::schema::{
        Complex128, Complex64, Dynamic, Marshaler, StructValue, TypeDesc, Typed, Value,
    };
    pub use crate::stream::{StreamDecoder, StreamEncoder};
    pub use crate::telemetry::{TelemetryCounters, TelemetrySnapshot};
    pub use crate::types::{CodecError, Result};
    pub use crate::{typed_opaque, typed_struct};
}
