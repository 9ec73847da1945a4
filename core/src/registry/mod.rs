//! registry/mod.rs
//! Tag <-> codec <-> type bindings.
//!
//! Notes:
//! - Built once (primitives, then every application type), then frozen into a
//!   `SharedRegistry` and only read. Resolving unseen types needs `&mut`, so
//!   concurrent first-use resolution cannot compile against a frozen registry.
//! - Each tag maps to exactly one codec; each type maps to exactly one tag.
//! - Composite tags are handed out from 200 upwards and never reused.

pub mod resolve;
pub mod primitives;
pub mod schema;

pub use schema::SchemaEntry;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::codec::Codec;
use crate::constants::{Tag, FIRST_COMPOSITE_TAG, MAX_NESTING_DEPTH};
use crate::schema::{Dynamic, TypeDesc, Value};
use crate::types::{CodecError, Result};
use crate::utils::fmt_tag;

/// Read-only registry shared across encoders and decoders.
pub type SharedRegistry = Arc<Registry>;

/// How struct payloads are matched against their descriptor on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldOrder {
    /// Fields must appear in registered order; any deviation is an error.
    #[default]
    Strict,
    /// Fields are matched by tag; unknown tags are skipped and missing
    /// fields take their zero value.
    Lenient,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryConfig {
    pub field_order: FieldOrder,
}

/// One (tag, type, codec) triple.
pub struct Binding {
    pub tag: Tag,
    pub desc: TypeDesc,
    pub codec: Box<dyn Codec>,
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("tag", &fmt_tag(&self.tag))
            .field("desc", &self.desc.to_string())
            .field("codec", &self.codec.name())
            .finish()
    }
}

pub struct Registry {
    bindings: BTreeMap<Tag, Binding>,
    tags: HashMap<TypeDesc, Tag>,
    /// Next composite tag candidate; only ever grows.
    next_composite: u16,
    /// Structs whose fields are being resolved, with the tag reserved for
    /// them if a cycle reached them again.
    in_progress: HashMap<&'static str, Option<Tag>>,
    config: RegistryConfig,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("bindings", &self.bindings.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            bindings: BTreeMap::new(),
            tags: HashMap::new(),
            next_composite: FIRST_COMPOSITE_TAG as u16,
            in_progress: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> RegistryConfig {
        self.config
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Finish initialization; the result can be cloned across threads.
    pub fn freeze(self) -> SharedRegistry {
        log::debug!("registry: frozen with {} bindings", self.bindings.len());
        Arc::new(self)
    }

    /// Bind a fixed tag. Panics if the tag or the type is already bound.
    pub fn register_primitive<C>(&mut self, tag: Tag, codec: C, desc: TypeDesc)
    where
        C: Codec + 'static,
    {
        self.bind(tag, desc, Box::new(codec));
    }

    pub(crate) fn bind(&mut self, tag: Tag, desc: TypeDesc, codec: Box<dyn Codec>) {
        if let Some(existing) = self.bindings.get(&tag) {
            panic!("tag {} already bound to {}", fmt_tag(&tag), existing.desc);
        }
        if let Some(existing) = self.tags.get(&desc) {
            panic!("type {} already bound to tag {}", desc, fmt_tag(existing));
        }
        log::debug!("registry: {} -> {} ({})", fmt_tag(&tag), desc, codec.name());
        self.tags.insert(desc.clone(), tag);
        self.bindings.insert(tag, Binding { tag, desc, codec });
    }

    // -----------------------------------------------------------------------
    // Lookups (never mutate)
    // -----------------------------------------------------------------------

    pub fn tag_of(&self, desc: &TypeDesc) -> Option<Tag> {
        self.tags.get(desc).copied()
    }

    /// Tag of an already-bound type.
    pub fn lookup_tag(&self, desc: &TypeDesc) -> Result<Tag> {
        self.tag_of(desc).ok_or_else(|| CodecError::NotRegistered(desc.to_string()))
    }

    pub fn binding(&self, tag: Tag) -> Result<&Binding> {
        self.bindings.get(&tag).ok_or(CodecError::UnknownTag(tag))
    }

    pub fn codec(&self, tag: Tag) -> Result<&dyn Codec> {
        self.binding(tag).map(|b| b.codec.as_ref())
    }

    pub fn desc(&self, tag: Tag) -> Result<&TypeDesc> {
        self.binding(tag).map(|b| &b.desc)
    }

    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.values()
    }

    /// Run the codec bound at `tag` on a top-level value.
    pub fn encode_payload(&self, tag: Tag, value: &Value, out: &mut Vec<u8>) -> Result<()> {
        self.encode_nested(tag, value, out, 0)
    }

    pub fn decode_payload(&self, tag: Tag, data: &[u8]) -> Result<Value> {
        self.decode_nested(tag, data, 0)
    }

    /// Run the codec bound at `tag` on a value `depth` levels below the top.
    pub fn encode_nested(
        &self,
        tag: Tag,
        value: &Value,
        out: &mut Vec<u8>,
        depth: usize,
    ) -> Result<()> {
        check_depth(depth)?;
        self.codec(tag)?.encode(self, value, out, depth)
    }

    pub fn decode_nested(&self, tag: Tag, data: &[u8], depth: usize) -> Result<Value> {
        check_depth(depth)?;
        self.codec(tag)?.decode(self, data, depth)
    }

    /// Decode a top-level payload into a self-describing value. An "any"
    /// payload yields the value it carries rather than a nested wrapper.
    pub fn decode_dynamic(&self, tag: Tag, data: &[u8]) -> Result<Dynamic> {
        let desc = self.desc(tag)?;
        match self.decode_payload(tag, data)? {
            Value::Dynamic(inner) if *desc == TypeDesc::Any => Ok(inner),
            value => Ok(Dynamic::from_parts(desc.clone(), value)),
        }
    }
}

fn check_depth(depth: usize) -> Result<()> {
    if depth > MAX_NESTING_DEPTH {
        return Err(CodecError::malformed(
            "nesting depth",
            format!("more than {} levels", MAX_NESTING_DEPTH),
        ));
    }
    Ok(())
}

/// Registry handle held by encoders: shared (lookup only) or exclusive
/// (unseen types are resolved on first use).
pub(crate) enum RegistryAccess<'r> {
    Shared(&'r Registry),
    Resolving(&'r mut Registry),
}

impl<'r> RegistryAccess<'r> {
    pub(crate) fn get(&self) -> &Registry {
        match self {
            RegistryAccess::Shared(r) => *r,
            RegistryAccess::Resolving(r) => &**r,
        }
    }

    /// Tag for `desc`, plus every concrete type held in `value`'s "any"
    /// slots when resolving.
    pub(crate) fn tag_for(&mut self, desc: &TypeDesc, value: &Value) -> Result<Tag> {
        match self {
            RegistryAccess::Shared(r) => r.lookup_tag(desc),
            RegistryAccess::Resolving(r) => {
                let tag = r.resolve_type(desc)?;
                let mut held = Vec::new();
                value.dynamic_types(&mut held);
                for d in &held {
                    r.resolve_type(d)?;
                }
                Ok(tag)
            }
        }
    }
}
