//! registry/resolve.rs
//! Recursive type resolution: derive a codec for a composite type from the
//! codecs of its parts, binding a new composite tag for each new type.
//!
//! Composite codecs refer to their children by tag, so a self-referential
//! struct resolves to a cycle of tags. A struct met again while its own
//! fields are still being resolved gets its tag reserved on the spot; the
//! binding itself is made once the field list is complete. If the fields fail
//! to resolve, every binding made since the struct was entered is undone.

use crate::codec::{
    ArrayCodec, Codec, MapCodec, MarshalerCodec, PointerCodec, SliceCodec, StructCodec, StructField,
};
use crate::constants::{Tag, LAST_COMPOSITE_TAG};
use crate::registry::Registry;
use crate::schema::{StructDesc, TypeDesc, Typed};
use crate::types::{CodecError, Result};
use crate::utils::fmt_tag;

impl Registry {
    /// Register a struct type and everything its fields need. Idempotent.
    pub fn register_struct<T: Typed>(&mut self) -> Result<Tag> {
        match T::type_desc() {
            desc @ TypeDesc::Struct(_) => self.resolve_type(&desc),
            other => Err(CodecError::type_mismatch("struct", other)),
        }
    }

    /// Register any `Typed` type. Idempotent.
    pub fn register_type<T: Typed>(&mut self) -> Result<Tag> {
        self.resolve_type(&T::type_desc())
    }

    /// Tag for `desc`, binding it (and any unseen parts) first if needed.
    pub fn resolve_type(&mut self, desc: &TypeDesc) -> Result<Tag> {
        if let Some(tag) = self.tag_of(desc) {
            log::trace!("registry: cache hit {} -> {}", desc, fmt_tag(&tag));
            return Ok(tag);
        }

        match desc {
            TypeDesc::Pointer(inner) => {
                let inner = self.resolve_type(inner)?;
                self.bind_composite(desc, PointerCodec::new(inner))
            }
            TypeDesc::Slice(elem) => {
                let elem = self.resolve_type(elem)?;
                self.bind_composite(desc, SliceCodec::new(elem))
            }
            TypeDesc::Array(elem, len) => {
                let elem = self.resolve_type(elem)?;
                self.bind_composite(desc, ArrayCodec::new(elem, *len))
            }
            TypeDesc::Map(key, value) => {
                let key = self.resolve_type(key)?;
                let value = self.resolve_type(value)?;
                self.bind_composite(desc, MapCodec::new(key, value))
            }
            TypeDesc::Opaque(opaque) => self.bind_composite(desc, MarshalerCodec::new(*opaque)),
            TypeDesc::Struct(s) => self.resolve_struct(s),
            // Scalars and "any" are bound up front, never synthesized.
            _ => Err(CodecError::UnresolvableType(desc.to_string())),
        }
    }

    fn bind_composite<C: Codec + 'static>(&mut self, desc: &TypeDesc, codec: C) -> Result<Tag> {
        // A cycle through the children may have bound `desc` already.
        if let Some(tag) = self.tag_of(desc) {
            return Ok(tag);
        }
        let tag = self.allocate_tag()?;
        self.bind(tag, desc.clone(), Box::new(codec));
        Ok(tag)
    }

    fn resolve_struct(&mut self, s: &StructDesc) -> Result<Tag> {
        match self.in_progress.get(s.name).copied() {
            Some(Some(tag)) => return Ok(tag),
            Some(None) => {
                let tag = self.allocate_tag()?;
                log::debug!(
                    "registry: reserved {} for recursive struct {}",
                    fmt_tag(&tag),
                    s.name
                );
                self.in_progress.insert(s.name, Some(tag));
                return Ok(tag);
            }
            None => {}
        }

        let mark = self.next_composite;
        let kept = self.composite_tags_from(mark);

        self.in_progress.insert(s.name, None);
        let fields = self.resolve_fields(s);
        let reserved = self.in_progress.remove(s.name).flatten();
        let fields = match fields {
            Ok(fields) => fields,
            Err(e) => {
                // Bindings made meanwhile may point at the reserved tag,
                // which will never be bound now.
                self.unbind_since(mark, &kept);
                return Err(e);
            }
        };

        let tag = match reserved {
            Some(tag) => tag,
            None => self.allocate_tag()?,
        };
        let codec = StructCodec::new(s.name, fields, self.config.field_order);
        self.bind(tag, TypeDesc::Struct(*s), Box::new(codec));
        Ok(tag)
    }

    fn resolve_fields(&mut self, s: &StructDesc) -> Result<Vec<StructField>> {
        let descs = s.fields();
        let mut fields: Vec<StructField> = Vec::with_capacity(descs.len());
        for field in descs {
            if fields.iter().any(|f| f.name == field.name) {
                panic!("struct {} declares field `{}` twice", s.name, field.name);
            }
            let tag = self.resolve_type(&field.ty).map_err(|e| e.in_field(field.name))?;
            fields.push(StructField { name: field.name, tag });
        }
        Ok(fields)
    }

    fn composite_tags_from(&self, mark: u16) -> Vec<Tag> {
        self.bindings.keys().copied().filter(|&t| u16::from(t) >= mark).collect()
    }

    /// Drop every binding allocated at or after `mark` except `kept`. The
    /// tags stay consumed.
    fn unbind_since(&mut self, mark: u16, kept: &[Tag]) {
        let added: Vec<Tag> = self
            .composite_tags_from(mark)
            .into_iter()
            .filter(|t| !kept.contains(t))
            .collect();
        for tag in added {
            if let Some(binding) = self.bindings.remove(&tag) {
                log::debug!("registry: unbound {} ({})", fmt_tag(&tag), binding.desc);
                self.tags.remove(&binding.desc);
            }
        }
    }

    /// Next unused composite tag. Tags handed out are never handed out
    /// again, even if the type they were reserved for failed to resolve.
    fn allocate_tag(&mut self) -> Result<Tag> {
        while self.next_composite <= LAST_COMPOSITE_TAG as u16 {
            let tag = self.next_composite as Tag;
            self.next_composite += 1;
            if !self.bindings.contains_key(&tag) {
                return Ok(tag);
            }
        }
        Err(CodecError::TagSpaceExhausted)
    }
}
