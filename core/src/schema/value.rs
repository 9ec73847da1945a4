//! schema/value.rs
//! Runtime values handled by codecs.
//!
//! `Value` is the tagged union every codec consumes and produces. `Dynamic`
//! is the "any" value: a concrete value paired with its descriptor, whose
//! registry tag becomes the wire discriminant.

use std::any::Any as StdAny;
use std::fmt;
use std::sync::Arc;

use crate::constants::MAX_NESTING_DEPTH;
use crate::schema::desc::TypeDesc;
use crate::schema::typed::Typed;
use crate::types::{CodecError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Complex64 {
    pub re: f32,
    pub im: f32,
}

impl Complex64 {
    pub const fn new(re: f32, im: f32) -> Self {
        Self { re, im }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Complex128 {
    pub re: f64,
    pub im: f64,
}

impl Complex128 {
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

/// Object-safe marshal capability held inside `Value::Opaque`.
///
/// Implemented for every `Marshaler` type; callers normally never implement
/// it by hand.
pub trait OpaqueValue: fmt::Debug + Send + Sync + 'static {
    fn type_name(&self) -> &'static str;
    fn marshal(&self) -> Result<Vec<u8>>;
    fn as_any(&self) -> &dyn StdAny;
    fn eq_dyn(&self, other: &dyn OpaqueValue) -> bool;
}

pub type OpaqueObject = Arc<dyn OpaqueValue>;

impl PartialEq for dyn OpaqueValue {
    fn eq(&self, other: &Self) -> bool {
        self.eq_dyn(other)
    }
}

/// Struct instance: type name plus named field values.
#[derive(Clone, Debug, PartialEq)]
pub struct StructValue {
    pub type_name: &'static str,
    pub fields: Vec<(&'static str, Value)>,
}

impl StructValue {
    pub fn new(type_name: &'static str) -> Self {
        Self { type_name, fields: Vec::new() }
    }

    pub fn with(mut self, name: &'static str, value: Value) -> Self {
        self.fields.push((name, value));
        self
    }

    /// Unwrap a `Value::Struct` named `type_name`.
    pub fn expect(value: Value, type_name: &'static str) -> Result<Self> {
        match value {
            Value::Struct(s) if s.type_name == type_name => Ok(s),
            Value::Struct(s) => Err(CodecError::type_mismatch(type_name, s.type_name)),
            other => Err(CodecError::type_mismatch(type_name, other.kind())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Field by position, falling back to a name search when the
    /// value was assembled in a different order.
    pub(crate) fn field_at(&self, index: usize, name: &str) -> Option<&Value> {
        match self.fields.get(index) {
            Some((n, v)) if *n == name => Some(v),
            _ => self.get(name),
        }
    }

    /// Remove a field and convert it to `T`.
    pub fn take<T: Typed>(&mut self, name: &'static str) -> Result<T> {
        let pos = self
            .fields
            .iter()
            .position(|(n, _)| *n == name)
            .ok_or(CodecError::MissingField { struct_name: self.type_name, field: name })?;
        let (_, value) = self.fields.remove(pos);
        T::from_value(value).map_err(|e| e.in_field(name))
    }
}

/// "Any" value: nil, or a concrete value with its descriptor.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Dynamic {
    inner: Option<(TypeDesc, Box<Value>)>,
}

impl Dynamic {
    pub fn nil() -> Self {
        Self { inner: None }
    }

    pub fn new<T: Typed>(value: &T) -> Self {
        Self::from_parts(T::type_desc(), value.to_value())
    }

    pub fn from_parts(desc: TypeDesc, value: Value) -> Self {
        Self { inner: Some((desc, Box::new(value))) }
    }

    pub fn is_nil(&self) -> bool {
        self.inner.is_none()
    }

    pub fn type_desc(&self) -> Option<&TypeDesc> {
        self.inner.as_ref().map(|(d, _)| d)
    }

    pub fn value(&self) -> Option<&Value> {
        self.inner.as_ref().map(|(_, v)| v.as_ref())
    }

    pub fn into_parts(self) -> Option<(TypeDesc, Value)> {
        self.inner.map(|(d, v)| (d, *v))
    }

    /// Convert to `T` if the held value is exactly of type `T`.
    pub fn downcast<T: Typed>(&self) -> Result<T> {
        let want = T::type_desc();
        match &self.inner {
            None => Err(CodecError::type_mismatch(&want, "nil")),
            Some((desc, value)) if *desc == want => T::from_value((**value).clone()),
            Some((desc, _)) => Err(CodecError::type_mismatch(&want, desc)),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Bool(bool),
    String(String),
    Complex64(Complex64),
    Complex128(Complex128),
    Pointer(Option<Box<Value>>),
    Slice(Vec<Value>),
    Array(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Dynamic(Dynamic),
    Struct(StructValue),
    Opaque(OpaqueObject),
}

impl Value {
    /// Short kind name used in type-mismatch errors.
    pub fn kind(&self) -> &'static str {
        use Value::*;
        match self {
            I8(_) => "i8",
            I16(_) => "i16",
            I32(_) => "i32",
            I64(_) => "i64",
            U8(_) => "u8",
            U16(_) => "u16",
            U32(_) => "u32",
            U64(_) => "u64",
            F32(_) => "f32",
            F64(_) => "f64",
            Bool(_) => "bool",
            String(_) => "string",
            Complex64(_) => "complex64",
            Complex128(_) => "complex128",
            Pointer(_) => "pointer",
            Slice(_) => "slice",
            Array(_) => "array",
            Map(_) => "map",
            Dynamic(_) => "any",
            Struct(s) => s.type_name,
            Opaque(o) => o.type_name(),
        }
    }

    /// Zero value of a type; used to fill fields a lenient decode did not see.
    pub fn zero_of(desc: &TypeDesc) -> Result<Value> {
        Value::zero_at(desc, 0)
    }

    fn zero_at(desc: &TypeDesc, depth: usize) -> Result<Value> {
        if depth > MAX_NESTING_DEPTH {
            return Err(CodecError::malformed(
                "nesting depth",
                format!("zero value of {} nests too deep", desc),
            ));
        }
        Ok(match desc {
            TypeDesc::I8 => Value::I8(0),
            TypeDesc::I16 => Value::I16(0),
            TypeDesc::I32 => Value::I32(0),
            TypeDesc::I64 => Value::I64(0),
            TypeDesc::U8 => Value::U8(0),
            TypeDesc::U16 => Value::U16(0),
            TypeDesc::U32 => Value::U32(0),
            TypeDesc::U64 => Value::U64(0),
            TypeDesc::F32 => Value::F32(0.0),
            TypeDesc::F64 => Value::F64(0.0),
            TypeDesc::Bool => Value::Bool(false),
            TypeDesc::String => Value::String(String::new()),
            TypeDesc::Complex64 => Value::Complex64(Complex64::default()),
            TypeDesc::Complex128 => Value::Complex128(Complex128::default()),
            TypeDesc::Any => Value::Dynamic(Dynamic::nil()),
            TypeDesc::Pointer(_) => Value::Pointer(None),
            TypeDesc::Slice(_) => Value::Slice(Vec::new()),
            TypeDesc::Map(..) => Value::Map(Vec::new()),
            TypeDesc::Array(elem, len) => {
                let zero = Value::zero_at(elem, depth + 1)?;
                Value::Array(vec![zero; *len])
            }
            TypeDesc::Struct(s) => {
                let mut out = StructValue::new(s.name);
                for field in s.fields() {
                    let zero = Value::zero_at(&field.ty, depth + 1)
                        .map_err(|e| e.in_field(field.name))?;
                    out.fields.push((field.name, zero));
                }
                Value::Struct(out)
            }
            TypeDesc::Opaque(o) => {
                return Err(CodecError::Marshal {
                    type_name: o.name,
                    detail: "opaque types have no zero value".into(),
                })
            }
        })
    }

    /// Descriptors of every non-nil `Dynamic` reachable from this value,
    /// so an encoder can resolve them before encoding.
    pub fn dynamic_types(&self, out: &mut Vec<TypeDesc>) {
        match self {
            Value::Pointer(Some(inner)) => inner.dynamic_types(out),
            Value::Slice(items) | Value::Array(items) => {
                items.iter().for_each(|v| v.dynamic_types(out))
            }
            Value::Map(entries) => entries.iter().for_each(|(k, v)| {
                k.dynamic_types(out);
                v.dynamic_types(out);
            }),
            Value::Struct(s) => s.fields.iter().for_each(|(_, v)| v.dynamic_types(out)),
            Value::Dynamic(d) => {
                if let Some((desc, value)) = &d.inner {
                    if !out.contains(desc) {
                        out.push(desc.clone());
                    }
                    value.dynamic_types(out);
                }
            }
            _ => {}
        }
    }
}
