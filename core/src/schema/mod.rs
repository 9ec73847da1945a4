//! schema/mod.rs
//! Type descriptors, runtime values and the `Typed` bridge.
//!
//! Notes:
//! - Descriptors are built by explicit per-type code (`typed_struct!`,
//!   `typed_opaque!`, blanket impls), never by runtime introspection.
//! - Values are a closed tagged union; "any" values carry their descriptor.

pub mod desc;
pub mod value;
pub mod typed;

pub use desc::*;
pub use value::*;
pub use typed::*;
