use super::{Field, KeyRole};
use indexmap::IndexMap;

/// Resolved, immutable metadata for one model type.
///
/// Built once per type by [`schema_of`], shared behind an `Arc`, and never
/// mutated afterwards.
///
/// [`schema_of`]: super::schema_of
#[derive(Debug, Clone)]
pub struct ModelSchema {
    /// Table/collection the model persists into.
    pub table_name: String,

    /// Name of the model type.
    pub model_name: String,

    /// Non-transient fields, ancestor declarations first.
    pub fields: Vec<Field>,

    /// Names of fields excluded from persistence.
    pub transient_fields: Vec<String>,

    /// Secondary indexes declared across the inheritance chain.
    pub indexes: IndexMap<String, SecondaryIndex>,
}

/// An alternate partition/sort pairing over the same records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryIndex {
    /// Field name (program-level) acting as the index partition key.
    pub partition_field: String,

    /// Field name acting as the index sort key, if any.
    pub sort_field: Option<String>,
}

impl ModelSchema {
    /// Looks up a field by program-level name or wire name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|field| field.name == name || field.wire_name == name)
    }

    pub fn partition_key(&self) -> Option<&Field> {
        self.fields
            .iter()
            .find(|field| field.key == Some(KeyRole::Partition))
    }

    pub fn sort_key(&self) -> Option<&Field> {
        self.fields
            .iter()
            .find(|field| field.key == Some(KeyRole::Sort))
    }

    pub fn index(&self, name: &str) -> Option<&SecondaryIndex> {
        self.indexes.get(name)
    }
}
