//! registry/schema.rs
//! Serializable listing of every binding, for debugging and for checking
//! that two processes agree on their tag assignments.

use serde::Serialize;

use crate::codec::StructField;
use crate::constants::Tag;
use crate::registry::Registry;
use crate::schema::TypeDesc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaEntry {
    pub tag: Tag,
    pub type_name: String,
    pub codec: &'static str,
    /// Field names and tags, in wire order; empty for non-structs.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<StructField>,
}

impl Registry {
    /// One entry per binding, ordered by tag.
    pub fn schema(&self) -> Vec<SchemaEntry> {
        self.bindings()
            .map(|b| SchemaEntry {
                tag: b.tag,
                type_name: b.desc.to_string(),
                codec: b.codec.name(),
                fields: self.struct_fields(&b.desc),
            })
            .collect()
    }

    pub fn schema_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.schema())
    }

    fn struct_fields(&self, desc: &TypeDesc) -> Vec<StructField> {
        match desc {
            TypeDesc::Struct(s) => s
                .fields()
                .into_iter()
                .filter_map(|f| self.tag_of(&f.ty).map(|tag| StructField { name: f.name, tag }))
                .collect(),
            _ => Vec::new(),
        }
    }
}
