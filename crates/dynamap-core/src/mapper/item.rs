use super::{decode_object, encode_field, encode_object};
use crate::schema::ModelSchema;
use crate::{MappingError, Value};
use aws_sdk_dynamodb::types::AttributeValue;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Marshals a full record into the store's attribute map.
///
/// Transient fields are skipped, absent non-key fields are omitted, and a key
/// field with no concrete value is a hard error: keys may never be absent or
/// null.
pub fn to_item(
    record: &IndexMap<String, Value>,
    schema: &ModelSchema,
) -> Result<HashMap<String, AttributeValue>, MappingError> {
    let item = encode_object("", record, schema)?;

    for field in schema.fields.iter().filter(|field| field.key.is_some()) {
        match item.get(&field.wire_name) {
            None | Some(AttributeValue::Null(_)) => {
                return Err(MappingError::MissingKeyValue {
                    field: field.name.clone(),
                })
            }
            Some(_) => {}
        }
    }

    Ok(item)
}

/// Unmarshals the store's attribute map into a record keyed by program names.
pub fn from_item(
    item: &HashMap<String, AttributeValue>,
    schema: &ModelSchema,
) -> Result<IndexMap<String, Value>, MappingError> {
    decode_object("", item, schema)
}

/// Builds the primary-key attribute map for a get/update/delete call.
///
/// The sort value is required exactly when the schema declares a sort key; a
/// surplus sort value is ignored, matching a schema with no sort key.
pub fn key_item(
    schema: &ModelSchema,
    partition: &Value,
    sort: Option<&Value>,
) -> Result<HashMap<String, AttributeValue>, MappingError> {
    let partition_field = schema
        .partition_key()
        .ok_or_else(|| MappingError::NoPartitionKey {
            model: schema.model_name.clone(),
        })?;

    let mut key = HashMap::new();
    match encode_field(partition_field, Some(partition))? {
        Some(attr) if !matches!(attr, AttributeValue::Null(_)) => {
            key.insert(partition_field.wire_name.clone(), attr);
        }
        _ => {
            return Err(MappingError::MissingKeyValue {
                field: partition_field.name.clone(),
            })
        }
    }

    if let Some(sort_field) = schema.sort_key() {
        let value = sort.ok_or_else(|| MappingError::MissingKeyValue {
            field: sort_field.name.clone(),
        })?;
        match encode_field(sort_field, Some(value))? {
            Some(attr) if !matches!(attr, AttributeValue::Null(_)) => {
                key.insert(sort_field.wire_name.clone(), attr);
            }
            _ => {
                return Err(MappingError::MissingKeyValue {
                    field: sort_field.name.clone(),
                })
            }
        }
    }

    Ok(key)
}
