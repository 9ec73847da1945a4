//! schema/typed.rs
//! Bridge between Rust types and the descriptor/value layer.
//!
//! `Typed` replaces runtime reflection: each type states its descriptor and
//! how to convert to and from `Value`. Structs get theirs from
//! `typed_struct!`, opaque types from `typed_opaque!`.

use std::any::Any as StdAny;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::schema::desc::TypeDesc;
use crate::schema::value::{Complex128, Complex64, Dynamic, OpaqueObject, OpaqueValue, Value};
use crate::types::{CodecError, Result};

pub trait Typed: Sized {
    fn type_desc() -> TypeDesc;
    fn to_value(&self) -> Value;
    fn from_value(value: Value) -> Result<Self>;
}

/// Binary marshal/unmarshal capability for types that are not decomposed
/// field by field.
pub trait Marshaler: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Registry identity; must be unique across opaque types.
    const TYPE_NAME: &'static str;

    fn marshal_binary(&self) -> Result<Vec<u8>>;
    fn unmarshal_binary(data: &[u8]) -> Result<Self>;
}

impl<T: Marshaler> OpaqueValue for T {
    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn marshal(&self) -> Result<Vec<u8>> {
        Marshaler::marshal_binary(self)
    }

    fn as_any(&self) -> &dyn StdAny {
        self
    }

    fn eq_dyn(&self, other: &dyn OpaqueValue) -> bool {
        other.as_any().downcast_ref::<T>().map_or(false, |o| o == self)
    }
}

/// `unmarshal` entry point stored in an `OpaqueDesc`.
pub fn unmarshal_object<T: Marshaler>(data: &[u8]) -> Result<OpaqueObject> {
    Ok(Arc::new(T::unmarshal_binary(data)?))
}

/// Extract `T` from an opaque value.
pub fn opaque_from_value<T: Marshaler>(value: Value) -> Result<T> {
    match value {
        Value::Opaque(obj) => obj
            .as_any()
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| CodecError::type_mismatch(T::TYPE_NAME, obj.type_name())),
        other => Err(CodecError::type_mismatch(T::TYPE_NAME, other.kind())),
    }
}

/// Descriptor of a struct field, inferred from a field accessor.
/// Used by `typed_struct!`.
pub fn field_type_of<S, F: Typed>(_accessor: impl Fn(&S) -> &F) -> TypeDesc {
    F::type_desc()
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

macro_rules! impl_typed_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Typed for $ty {
                fn type_desc() -> TypeDesc {
                    TypeDesc::$variant
                }

                fn to_value(&self) -> Value {
                    Value::$variant(self.clone())
                }

                fn from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(CodecError::type_mismatch(TypeDesc::$variant, other.kind())),
                    }
                }
            }
        )*
    };
}

impl_typed_scalar! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    bool => Bool,
    String => String,
    Complex64 => Complex64,
    Complex128 => Complex128,
}

// ---------------------------------------------------------------------------
// Composites
// ---------------------------------------------------------------------------

/// `Option<T>` is a pointer: `None` is the absent value.
impl<T: Typed> Typed for Option<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::pointer(T::type_desc())
    }

    fn to_value(&self) -> Value {
        Value::Pointer(self.as_ref().map(|v| Box::new(v.to_value())))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Pointer(None) => Ok(None),
            Value::Pointer(Some(inner)) => Ok(Some(T::from_value(*inner)?)),
            other => Err(CodecError::type_mismatch(Self::type_desc(), other.kind())),
        }
    }
}

/// `Box<T>` is transparent; it only exists to make recursive types sized.
impl<T: Typed> Typed for Box<T> {
    fn type_desc() -> TypeDesc {
        T::type_desc()
    }

    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn from_value(value: Value) -> Result<Self> {
        T::from_value(value).map(Box::new)
    }
}

impl<T: Typed> Typed for Vec<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::slice(T::type_desc())
    }

    fn to_value(&self) -> Value {
        Value::Slice(self.iter().map(Typed::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Slice(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, v)| T::from_value(v).map_err(|e| e.at_index(i)))
                .collect(),
            other => Err(CodecError::type_mismatch(Self::type_desc(), other.kind())),
        }
    }
}

impl<T: Typed, const N: usize> Typed for [T; N] {
    fn type_desc() -> TypeDesc {
        TypeDesc::array(T::type_desc(), N)
    }

    fn to_value(&self) -> Value {
        Value::Array(self.iter().map(Typed::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self> {
        let items = match value {
            Value::Array(items) => items,
            other => return Err(CodecError::type_mismatch(Self::type_desc(), other.kind())),
        };
        if items.len() != N {
            return Err(CodecError::ArrayLength { expected: N, actual: items.len() });
        }
        let decoded = items
            .into_iter()
            .enumerate()
            .map(|(i, v)| T::from_value(v).map_err(|e| e.at_index(i)))
            .collect::<Result<Vec<T>>>()?;
        decoded
            .try_into()
            .map_err(|v: Vec<T>| CodecError::ArrayLength { expected: N, actual: v.len() })
    }
}

fn map_entries<K: Typed, V: Typed>(value: Value, desc: TypeDesc) -> Result<Vec<(K, V)>> {
    match value {
        Value::Map(entries) => entries
            .into_iter()
            .map(|(k, v)| {
                let label = key_label(&k);
                let key = K::from_value(k).map_err(|e| e.at_key(label.clone()))?;
                let value = V::from_value(v).map_err(|e| e.at_key(label))?;
                Ok((key, value))
            })
            .collect(),
        other => Err(CodecError::type_mismatch(desc, other.kind())),
    }
}

/// Printable form of a map key for error context.
pub(crate) fn key_label(key: &Value) -> String {
    match key {
        Value::String(s) => format!("{:?}", s),
        other => format!("{:?}", other),
    }
}

impl<K: Typed + Eq + Hash, V: Typed> Typed for HashMap<K, V> {
    fn type_desc() -> TypeDesc {
        TypeDesc::map(K::type_desc(), V::type_desc())
    }

    fn to_value(&self) -> Value {
        Value::Map(self.iter().map(|(k, v)| (k.to_value(), v.to_value())).collect())
    }

    fn from_value(value: Value) -> Result<Self> {
        Ok(map_entries(value, Self::type_desc())?.into_iter().collect())
    }
}

impl<K: Typed + Ord, V: Typed> Typed for BTreeMap<K, V> {
    fn type_desc() -> TypeDesc {
        TypeDesc::map(K::type_desc(), V::type_desc())
    }

    fn to_value(&self) -> Value {
        Value::Map(self.iter().map(|(k, v)| (k.to_value(), v.to_value())).collect())
    }

    fn from_value(value: Value) -> Result<Self> {
        Ok(map_entries(value, Self::type_desc())?.into_iter().collect())
    }
}

impl Typed for Dynamic {
    fn type_desc() -> TypeDesc {
        TypeDesc::Any
    }

    fn to_value(&self) -> Value {
        Value::Dynamic(self.clone())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Dynamic(d) => Ok(d),
            other => Err(CodecError::type_mismatch(TypeDesc::Any, other.kind())),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-type registration macros
// ---------------------------------------------------------------------------

/// Implement `Typed` for a struct by listing its fields in wire order.
///
/// ```ignore
/// struct Point { x: i32, y: i32 }
/// typed_struct!(Point { x, y });
/// ```
///
/// Every field must be listed; the generated `from_value` builds the struct
/// with a literal, so a missing field is a compile error.
#[macro_export]
macro_rules! typed_struct {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        const _: () = {
            const NAME: &str = concat!(module_path!(), "::", stringify!($ty));

            fn fields() -> ::std::vec::Vec<$crate::schema::FieldDesc> {
                ::std::vec![
                    $(
                        $crate::schema::FieldDesc::new(
                            stringify!($field),
                            $crate::schema::field_type_of(|s: &$ty| &s.$field),
                        ),
                    )*
                ]
            }

            impl $crate::schema::Typed for $ty {
                fn type_desc() -> $crate::schema::TypeDesc {
                    $crate::schema::TypeDesc::Struct($crate::schema::StructDesc::new(NAME, fields))
                }

                fn to_value(&self) -> $crate::schema::Value {
                    $crate::schema::Value::Struct($crate::schema::StructValue {
                        type_name: NAME,
                        fields: ::std::vec![
                            $(
                                (
                                    stringify!($field),
                                    $crate::schema::Typed::to_value(&self.$field),
                                ),
                            )*
                        ],
                    })
                }

                #[allow(unused_mut)]
                fn from_value(value: $crate::schema::Value) -> $crate::types::Result<Self> {
                    let mut s = $crate::schema::StructValue::expect(value, NAME)?;
                    Ok($ty {
                        $( $field: s.take(stringify!($field))?, )*
                    })
                }
            }
        };
    };
}

/// Implement `Typed` for a `Marshaler` type.
#[macro_export]
macro_rules! typed_opaque {
    ($ty:ty) => {
        impl $crate::schema::Typed for $ty {
            fn type_desc() -> $crate::schema::TypeDesc {
                $crate::schema::TypeDesc::Opaque($crate::schema::OpaqueDesc::new(
                    <$ty as $crate::schema::Marshaler>::TYPE_NAME,
                    $crate::schema::unmarshal_object::<$ty>,
                ))
            }

            fn to_value(&self) -> $crate::schema::Value {
                let object = ::std::clone::Clone::clone(self);
                $crate::schema::Value::Opaque(::std::sync::Arc::new(object))
            }

            fn from_value(value: $crate::schema::Value) -> $crate::types::Result<Self> {
                $crate::schema::opaque_from_value::<$ty>(value)
            }
        }
    };
}
