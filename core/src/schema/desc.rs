//! schema/desc.rs
//! Registration-time type descriptors.
//!
//! A `TypeDesc` is the registry's type key. Struct and opaque descriptors are
//! identified by name only; a struct's field list is produced on demand, so a
//! type that refers to itself never builds an infinite descriptor.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::schema::value::OpaqueObject;
use crate::types::Result;

/// One named field of a struct descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldDesc {
    pub name: &'static str,
    pub ty: TypeDesc,
}

impl FieldDesc {
    pub fn new(name: &'static str, ty: TypeDesc) -> Self {
        Self { name, ty }
    }
}

/// Struct-like record: a name plus an ordered field list.
#[derive(Clone, Copy)]
pub struct StructDesc {
    pub name: &'static str,
    fields: fn() -> Vec<FieldDesc>,
}

impl StructDesc {
    pub const fn new(name: &'static str, fields: fn() -> Vec<FieldDesc>) -> Self {
        Self { name, fields }
    }

    /// Fields in declaration order. This order is the wire order.
    pub fn fields(&self) -> Vec<FieldDesc> {
        (self.fields)()
    }
}

impl PartialEq for StructDesc {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for StructDesc {}

impl Hash for StructDesc {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Debug for StructDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StructDesc({})", self.name)
    }
}

/// Type serialized only through a binary marshal/unmarshal capability.
#[derive(Clone, Copy)]
pub struct OpaqueDesc {
    pub name: &'static str,
    pub unmarshal: fn(&[u8]) -> Result<OpaqueObject>,
}

impl OpaqueDesc {
    pub const fn new(name: &'static str, unmarshal: fn(&[u8]) -> Result<OpaqueObject>) -> Self {
        Self { name, unmarshal }
    }
}

impl PartialEq for OpaqueDesc {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for OpaqueDesc {}

impl Hash for OpaqueDesc {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Debug for OpaqueDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpaqueDesc({})", self.name)
    }
}

/// Closed set of type shapes the resolver understands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeDesc {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Bool,
    String,
    /// Two f32 (real, imaginary).
    Complex64,
    /// Two f64 (real, imaginary).
    Complex128,
    /// Any registered concrete type, chosen at runtime.
    Any,
    Pointer(Box<TypeDesc>),
    Slice(Box<TypeDesc>),
    Array(Box<TypeDesc>, usize),
    Map(Box<TypeDesc>, Box<TypeDesc>),
    Opaque(OpaqueDesc),
    Struct(StructDesc),
}

impl TypeDesc {
    pub fn pointer(inner: TypeDesc) -> Self {
        TypeDesc::Pointer(Box::new(inner))
    }

    pub fn slice(elem: TypeDesc) -> Self {
        TypeDesc::Slice(Box::new(elem))
    }

    pub fn array(elem: TypeDesc, len: usize) -> Self {
        TypeDesc::Array(Box::new(elem), len)
    }

    pub fn map(key: TypeDesc, value: TypeDesc) -> Self {
        TypeDesc::Map(Box::new(key), Box::new(value))
    }

    /// True for fixed-tag kinds that are bound, never synthesized.
    pub fn is_scalar(&self) -> bool {
        !matches!(
            self,
            TypeDesc::Any
                | TypeDesc::Pointer(_)
                | TypeDesc::Slice(_)
                | TypeDesc::Array(..)
                | TypeDesc::Map(..)
                | TypeDesc::Opaque(_)
                | TypeDesc::Struct(_)
        )
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TypeDesc::*;
        match self {
            I8 => write!(f, "i8"),
            I16 => write!(f, "i16"),
            I32 => write!(f, "i32"),
            I64 => write!(f, "i64"),
            U8 => write!(f, "u8"),
            U16 => write!(f, "u16"),
            U32 => write!(f, "u32"),
            U64 => write!(f, "u64"),
            F32 => write!(f, "f32"),
            F64 => write!(f, "f64"),
            Bool => write!(f, "bool"),
            String => write!(f, "string"),
            Complex64 => write!(f, "complex64"),
            Complex128 => write!(f, "complex128"),
            Any => write!(f, "any"),
            Pointer(inner) => write!(f, "ptr<{}>", inner),
            Slice(elem) => write!(f, "slice<{}>", elem),
            Array(elem, len) => write!(f, "array<{}; {}>", elem, len),
            Map(k, v) => write!(f, "map<{}, {}>", k, v),
            Opaque(o) => write!(f, "{}", o.name),
            Struct(s) => write!(f, "{}", s.name),
        }
    }
}
