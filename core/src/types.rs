use std::io;
use thiserror::Error;

use crate::constants::Tag;
use crate::utils::fmt_tag;

/// Unified codec error covering registry, codec, framing and stream failures.
/// - Every codec operation returns it; nothing in the crate aborts on bad input.
/// - Composite codecs wrap inner failures in `Field`/`Element`/`MapEntry`
///   so the original cause stays reachable through `source()`.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Value handed to a codec is not of the codec's type.
    #[error("type mismatch: expected {expected}, got {found}")]
    TypeMismatch { expected: String, found: String },

    /// Tag absent from the registry.
    #[error("unknown tag: {}", fmt_tag(.0))]
    UnknownTag(Tag),

    /// No resolution rule applies to the type.
    #[error("unresolvable type: {0}")]
    UnresolvableType(String),

    /// Type unseen by a registry that cannot resolve (shared / read-only access).
    #[error("type not registered: {0}")]
    NotRegistered(String),

    /// Begin/end/object-end marker mismatch.
    #[error("invalid {marker} marker: expected {expected}, got {found}")]
    Framing { marker: &'static str, expected: String, found: String },

    /// Declared length disagrees with the fixed width or the bytes present.
    #[error("length mismatch in {context}: expected {expected}, got {actual}")]
    LengthMismatch { context: &'static str, expected: usize, actual: usize },

    /// Fewer bytes available than required.
    #[error("truncated {context}: need {needed} bytes, have {available}")]
    Truncated { context: &'static str, needed: usize, available: usize },

    /// A length does not fit its wire field.
    #[error("{context} too large: {len} > {max}")]
    Overflow { context: &'static str, len: usize, max: usize },

    /// Bytes present but not a valid encoding.
    #[error("malformed {context}: {detail}")]
    Malformed { context: &'static str, detail: String },

    /// Struct value lacks a field its descriptor names.
    #[error("struct {struct_name} has no field `{field}`")]
    MissingField { struct_name: &'static str, field: &'static str },

    /// Strict decode found a field tag out of registered order.
    #[error(
        "struct {struct_name}: field `{field}` expects tag {}, found {}",
        fmt_tag(.expected),
        fmt_tag(.found)
    )]
    FieldOrder { struct_name: &'static str, field: &'static str, expected: Tag, found: Tag },

    /// Fixed-length sequence with the wrong number of elements.
    #[error("array length mismatch: expected {expected}, got {actual}")]
    ArrayLength { expected: usize, actual: usize },

    /// All composite tags (200..=255) are in use.
    #[error("composite tag space exhausted")]
    TagSpaceExhausted,

    /// Opaque marshal/unmarshal capability failed.
    #[error("marshal {type_name}: {detail}")]
    Marshal { type_name: &'static str, detail: String },

    /// Byte sink/source error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("field `{field}`: {source}")]
    Field { field: &'static str, #[source] source: Box<CodecError> },

    #[error("element {index}: {source}")]
    Element { index: usize, #[source] source: Box<CodecError> },

    #[error("map entry {key}: {source}")]
    MapEntry { key: String, #[source] source: Box<CodecError> },
}

pub type Result<T> = std::result::Result<T, CodecError>;

impl CodecError {
    pub fn type_mismatch(expected: impl ToString, found: impl ToString) -> Self {
        CodecError::TypeMismatch { expected: expected.to_string(), found: found.to_string() }
    }

    pub fn malformed(context: &'static str, detail: impl Into<String>) -> Self {
        CodecError::Malformed { context, detail: detail.into() }
    }

    pub(crate) fn in_field(self, field: &'static str) -> Self {
        CodecError::Field { field, source: Box::new(self) }
    }

    pub(crate) fn at_index(self, index: usize) -> Self {
        CodecError::Element { index, source: Box::new(self) }
    }

    pub(crate) fn at_key(self, key: String) -> Self {
        CodecError::MapEntry { key, source: Box::new(self) }
    }

    /// Innermost error, with every context wrapper peeled off.
    pub fn root_cause(&self) -> &CodecError {
        match self {
            CodecError::Field { source, .. }
            | CodecError::Element { source, .. }
            | CodecError::MapEntry { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// True for a short read of zero bytes where a frame would begin.
    /// On a continuous stream this is the normal "no more objects" signal.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(
            self,
            CodecError::Truncated { context: "begin marker", available: 0, .. }
        )
    }

    /// True for any short read or short buffer.
    pub fn is_truncated(&self) -> bool {
        matches!(self.root_cause(), CodecError::Truncated { .. })
    }
}
