use super::{Field, KeyRole, Model, ModelDef, ModelSchema, SecondaryIndex};
use crate::{Result, SchemaError};
use indexmap::IndexMap;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

/// Process-wide schema cache, keyed by model type identity.
static CACHE: OnceLock<RwLock<HashMap<TypeId, Arc<ModelSchema>>>> = OnceLock::new();

/// Resolves the schema for `M`, building it on first access.
///
/// Resolution is idempotent: concurrent first accesses may both build the
/// schema, but only one result is kept and every caller observes the same
/// `Arc`.
pub fn schema_of<M: Model>() -> Result<Arc<ModelSchema>> {
    let cache = CACHE.get_or_init(|| RwLock::new(HashMap::new()));

    if let Some(schema) = cache.read().unwrap().get(&TypeId::of::<M>()) {
        return Ok(schema.clone());
    }

    let schema = Arc::new(resolve(M::definition())?);
    tracing::debug!(
        model = %schema.model_name,
        table = %schema.table_name,
        fields = schema.fields.len(),
        "resolved model schema"
    );

    let mut cache = cache.write().unwrap();
    let entry = cache.entry(TypeId::of::<M>()).or_insert(schema);
    Ok(entry.clone())
}

/// Walks the definition chain oldest-first and merges it into a schema.
fn resolve(def: ModelDef) -> Result<ModelSchema, SchemaError> {
    // Materialize the ancestor chain, most-derived first.
    let mut chain = vec![def];
    while let Some(parent) = chain.last().and_then(|def| def.parent) {
        chain.push(parent());
    }

    let table_name = chain[0].table_name.clone();
    let model_name = chain[0].model_name.clone();

    // Oldest-first walk. A field re-declared by name fully replaces the
    // ancestor's descriptor, keeping the ancestor's position.
    let mut merged: IndexMap<String, Field> = IndexMap::new();
    for def in chain.into_iter().rev() {
        for fd in def.fields {
            let field = Field {
                wire_name: fd.wire_name.unwrap_or_else(|| fd.name.clone()),
                name: fd.name,
                key: fd.key,
                ty: fd.ty,
                transient: fd.transient,
                codec: fd.codec,
                index_roles: fd.index_roles,
            };
            merged.insert(field.name.clone(), field);
        }
    }

    // At most one field may claim the partition-key role.
    let mut partition: Option<&Field> = None;
    for field in merged.values() {
        if field.key == Some(KeyRole::Partition) {
            if let Some(first) = partition {
                return Err(SchemaError::DuplicatePartitionKey {
                    model: model_name,
                    first: first.name.clone(),
                    second: field.name.clone(),
                });
            }
            partition = Some(field);
        }
    }
    let table_partition = partition.map(|field| field.name.clone());

    // Union of index declarations across the merged fields. Each index's
    // partition/sort slot is filled by whichever field declares that role.
    let mut slots: IndexMap<String, (Option<String>, Option<String>)> = IndexMap::new();
    for field in merged.values() {
        for (index_name, role) in &field.index_roles {
            let entry = slots.entry(index_name.clone()).or_default();
            let (slot, role_name) = match role {
                KeyRole::Partition => (&mut entry.0, "partition"),
                KeyRole::Sort => (&mut entry.1, "sort"),
            };
            if let Some(existing) = slot {
                if existing != &field.name {
                    return Err(SchemaError::MalformedIndex {
                        model: model_name,
                        index: index_name.clone(),
                        reason: format!(
                            "{role_name} key declared by both `{existing}` and `{}`",
                            field.name
                        ),
                    });
                }
            } else {
                *slot = Some(field.name.clone());
            }
        }
    }

    let mut indexes = IndexMap::new();
    for (name, (partition_field, sort_field)) in slots {
        // A sort-only declaration (LSI pattern) indexes against the table
        // partition key.
        let partition_field = match partition_field.or_else(|| table_partition.clone()) {
            Some(field) => field,
            None => {
                return Err(SchemaError::MalformedIndex {
                    model: model_name,
                    index: name,
                    reason: "index has no partition key and the model declares none".to_string(),
                })
            }
        };
        indexes.insert(
            name,
            SecondaryIndex {
                partition_field,
                sort_field,
            },
        );
    }

    let mut fields = vec![];
    let mut transient_fields = vec![];
    for (_, field) in merged {
        if field.transient {
            transient_fields.push(field.name);
        } else {
            fields.push(field);
        }
    }

    Ok(ModelSchema {
        table_name,
        model_name,
        fields,
        transient_fields,
        indexes,
    })
}
