//! Bidirectional codec between native [`Value`]s and the store's tagged
//! attribute-value representation.
//!
//! Encoding is driven by a field's [`FieldTy`]; untyped containers (plain
//! lists and maps) fall back to per-value inference. A field carrying a
//! custom [`FieldCodec`] bypasses the default path entirely.

mod codec;
pub use codec::FieldCodec;

mod item;
pub use item::{from_item, key_item, to_item};

use crate::schema::{EnumBase, Field, FieldTy, ModelSchema, Primitive};
use crate::{MappingError, Value};
use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashMap;

/// Encodes one field's value, honoring a custom codec if installed.
///
/// `None` input models an absent value and yields the absent-marker
/// (`Ok(None)`): the attribute is omitted from the encoded record. An
/// explicit [`Value::Null`] instead encodes to the dedicated null wire tag.
pub fn encode_field(
    field: &Field,
    value: Option<&Value>,
) -> Result<Option<AttributeValue>, MappingError> {
    encode_field_at(&field.name, field, value)
}

/// Decodes one field's wire value, honoring a custom codec if installed.
pub fn decode_field(field: &Field, attr: &AttributeValue) -> Result<Value, MappingError> {
    decode_field_at(&field.name, field, attr)
}

/// Encodes a concrete value as directed by a type descriptor.
pub fn encode_value(
    path: &str,
    value: &Value,
    ty: &FieldTy,
) -> Result<AttributeValue, MappingError> {
    if value.is_null() {
        return Ok(AttributeValue::Null(true));
    }

    match ty {
        FieldTy::Primitive(primitive) => encode_primitive(path, value, *primitive),
        FieldTy::Set { element, .. } => encode_set(path, value, *element),
        FieldTy::List { .. } => match value {
            Value::List(items) => {
                let mut encoded = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    let item_path = format!("{path}[{i}]");
                    encoded.push(encode_value(&item_path, item, &FieldTy::of(item))?);
                }
                Ok(AttributeValue::L(encoded))
            }
            other => Err(mismatch(path, "a list", other)),
        },
        FieldTy::Map => match value {
            Value::Map(entries) => {
                let mut encoded = HashMap::with_capacity(entries.len());
                for (key, entry) in entries {
                    let entry_path = join_path(path, key);
                    encoded.insert(
                        key.clone(),
                        encode_value(&entry_path, entry, &FieldTy::of(entry))?,
                    );
                }
                Ok(AttributeValue::M(encoded))
            }
            other => Err(mismatch(path, "a map", other)),
        },
        FieldTy::Nested(thunk) => match value {
            Value::Map(entries) => {
                let schema = resolve_nested(path, *thunk)?;
                Ok(AttributeValue::M(encode_object(path, entries, &schema)?))
            }
            other => Err(mismatch(path, "a nested object", other)),
        },
    }
}

/// Decodes a wire value as directed by a type descriptor.
pub fn decode_value(
    path: &str,
    attr: &AttributeValue,
    ty: &FieldTy,
) -> Result<Value, MappingError> {
    if matches!(attr, AttributeValue::Null(_)) {
        return Ok(Value::Null);
    }

    match ty {
        FieldTy::Primitive(primitive) => decode_primitive(path, attr, *primitive),
        FieldTy::Set { element, .. } => decode_set(path, attr, *element),
        FieldTy::List { .. } => match attr {
            AttributeValue::L(items) => {
                let mut decoded = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    let item_path = format!("{path}[{i}]");
                    decoded.push(decode_inferred(&item_path, item)?);
                }
                Ok(Value::List(decoded))
            }
            other => Err(unexpected(path, other, ty)),
        },
        FieldTy::Map => match attr {
            AttributeValue::M(entries) => {
                let mut decoded = indexmap::IndexMap::with_capacity(entries.len());
                for (key, entry) in entries {
                    let entry_path = join_path(path, key);
                    decoded.insert(key.clone(), decode_inferred(&entry_path, entry)?);
                }
                Ok(Value::Map(decoded))
            }
            other => Err(unexpected(path, other, ty)),
        },
        FieldTy::Nested(thunk) => match attr {
            AttributeValue::M(entries) => {
                let schema = resolve_nested(path, *thunk)?;
                Ok(Value::Map(decode_object(path, entries, &schema)?))
            }
            other => Err(unexpected(path, other, ty)),
        },
    }
}

/// Encodes a native map through a schema: entries resolve to their field
/// descriptors (wire names, declared types, custom codecs), transient fields
/// are skipped, undeclared entries encode by inference under their own key.
pub(crate) fn encode_object(
    path: &str,
    entries: &indexmap::IndexMap<String, Value>,
    schema: &ModelSchema,
) -> Result<HashMap<String, AttributeValue>, MappingError> {
    let mut out = HashMap::with_capacity(entries.len());
    for (key, value) in entries {
        if schema.transient_fields.iter().any(|name| name == key) {
            continue;
        }
        match schema.field(key) {
            Some(field) => {
                let field_path = join_path(path, &field.name);
                if let Some(attr) = encode_field_at(&field_path, field, Some(value))? {
                    out.insert(field.wire_name.clone(), attr);
                }
            }
            None => {
                let entry_path = join_path(path, key);
                out.insert(
                    key.clone(),
                    encode_value(&entry_path, value, &FieldTy::of(value))?,
                );
            }
        }
    }
    Ok(out)
}

/// Decodes a wire map through a schema, keying the result by program names.
pub(crate) fn decode_object(
    path: &str,
    entries: &HashMap<String, AttributeValue>,
    schema: &ModelSchema,
) -> Result<indexmap::IndexMap<String, Value>, MappingError> {
    let mut out = indexmap::IndexMap::with_capacity(entries.len());
    for (wire_key, attr) in entries {
        match schema.field(wire_key) {
            Some(field) => {
                let field_path = join_path(path, &field.name);
                out.insert(field.name.clone(), decode_field_at(&field_path, field, attr)?);
            }
            None => {
                let entry_path = join_path(path, wire_key);
                out.insert(wire_key.clone(), decode_inferred(&entry_path, attr)?);
            }
        }
    }
    Ok(out)
}

fn encode_field_at(
    path: &str,
    field: &Field,
    value: Option<&Value>,
) -> Result<Option<AttributeValue>, MappingError> {
    if let Some(codec) = &field.codec {
        return match value {
            Some(value) => codec.encode(value),
            None => Ok(None),
        };
    }
    match value {
        Some(value) => encode_value(path, value, &field.ty).map(Some),
        None => Ok(None),
    }
}

fn decode_field_at(
    path: &str,
    field: &Field,
    attr: &AttributeValue,
) -> Result<Value, MappingError> {
    if let Some(codec) = &field.codec {
        return codec.decode(attr);
    }
    decode_value(path, attr, &field.ty)
}

fn encode_primitive(
    path: &str,
    value: &Value,
    primitive: Primitive,
) -> Result<AttributeValue, MappingError> {
    match (primitive, value) {
        (Primitive::String, Value::String(v)) => Ok(AttributeValue::S(v.clone())),
        (Primitive::Bool, Value::Bool(v)) => Ok(AttributeValue::Bool(*v)),
        (Primitive::Binary, Value::Bytes(v)) => Ok(AttributeValue::B(Blob::new(v.clone()))),
        (Primitive::Date, Value::DateTime(v)) => Ok(AttributeValue::S(format_timestamp(v))),
        (Primitive::Number | Primitive::Enum(EnumBase::Number), v) => v
            .number_string()
            .map(AttributeValue::N)
            .ok_or_else(|| mismatch(path, "a number", v)),
        (Primitive::Enum(EnumBase::String), Value::String(v)) => {
            Ok(AttributeValue::S(v.clone()))
        }
        (_, other) => Err(mismatch(path, primitive.expected_tag(), other)),
    }
}

fn decode_primitive(
    path: &str,
    attr: &AttributeValue,
    primitive: Primitive,
) -> Result<Value, MappingError> {
    match (primitive, attr) {
        (Primitive::String | Primitive::Enum(EnumBase::String), AttributeValue::S(v)) => {
            Ok(Value::String(v.clone()))
        }
        (Primitive::Number | Primitive::Enum(EnumBase::Number), AttributeValue::N(v)) => {
            parse_number(path, v)
        }
        (Primitive::Bool, AttributeValue::Bool(v)) => Ok(Value::Bool(*v)),
        (Primitive::Binary, AttributeValue::B(v)) => Ok(Value::Bytes(v.clone().into_inner())),
        (Primitive::Date, AttributeValue::S(v)) => parse_timestamp(path, v),
        _ => Err(unexpected(path, attr, &FieldTy::Primitive(primitive))),
    }
}

fn encode_set(
    path: &str,
    value: &Value,
    element: Primitive,
) -> Result<AttributeValue, MappingError> {
    // Set fields accept both native sets and lists; the wire form is the same.
    let items = match value {
        Value::Set(items) | Value::List(items) => items,
        other => return Err(mismatch(path, "a set", other)),
    };
    if items.is_empty() {
        return Err(MappingError::EmptySet {
            path: path.to_string(),
        });
    }

    match element {
        Primitive::String | Primitive::Enum(EnumBase::String) | Primitive::Date => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(v) => out.push(v.clone()),
                    Value::DateTime(v) => out.push(format_timestamp(v)),
                    _ => return Err(mixed(path)),
                }
            }
            Ok(AttributeValue::Ss(out))
        }
        Primitive::Number | Primitive::Enum(EnumBase::Number) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match item.number_string() {
                    Some(v) => out.push(v),
                    None => return Err(mixed(path)),
                }
            }
            Ok(AttributeValue::Ns(out))
        }
        Primitive::Binary => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Bytes(v) => out.push(Blob::new(v.clone())),
                    _ => return Err(mixed(path)),
                }
            }
            Ok(AttributeValue::Bs(out))
        }
        Primitive::Bool => Err(MappingError::ValueMismatch {
            path: path.to_string(),
            expected: "string, number, or binary set elements".to_string(),
            found: "bool".to_string(),
        }),
    }
}

fn decode_set(
    path: &str,
    attr: &AttributeValue,
    element: Primitive,
) -> Result<Value, MappingError> {
    match (element, attr) {
        (Primitive::String | Primitive::Enum(EnumBase::String), AttributeValue::Ss(items)) => {
            Ok(Value::Set(
                items.iter().map(|v| Value::String(v.clone())).collect(),
            ))
        }
        (Primitive::Date, AttributeValue::Ss(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(parse_timestamp(path, item)?);
            }
            Ok(Value::Set(out))
        }
        (Primitive::Number | Primitive::Enum(EnumBase::Number), AttributeValue::Ns(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(parse_number(path, item)?);
            }
            Ok(Value::Set(out))
        }
        (Primitive::Binary, AttributeValue::Bs(items)) => Ok(Value::Set(
            items
                .iter()
                .map(|v| Value::Bytes(v.clone().into_inner()))
                .collect(),
        )),
        _ => Err(unexpected(
            path,
            attr,
            &FieldTy::Set {
                element,
                sorted: false,
            },
        )),
    }
}

/// Decodes a wire value with no declared type, picking the natural native
/// shape for its tag.
pub fn decode_inferred(path: &str, attr: &AttributeValue) -> Result<Value, MappingError> {
    match attr {
        AttributeValue::S(v) => Ok(Value::String(v.clone())),
        AttributeValue::N(v) => parse_number(path, v),
        AttributeValue::Bool(v) => Ok(Value::Bool(*v)),
        AttributeValue::B(v) => Ok(Value::Bytes(v.clone().into_inner())),
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::Ss(items) => Ok(Value::Set(
            items.iter().map(|v| Value::String(v.clone())).collect(),
        )),
        AttributeValue::Ns(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(parse_number(path, item)?);
            }
            Ok(Value::Set(out))
        }
        AttributeValue::Bs(items) => Ok(Value::Set(
            items
                .iter()
                .map(|v| Value::Bytes(v.clone().into_inner()))
                .collect(),
        )),
        AttributeValue::L(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let item_path = format!("{path}[{i}]");
                out.push(decode_inferred(&item_path, item)?);
            }
            Ok(Value::List(out))
        }
        AttributeValue::M(entries) => {
            let mut out = indexmap::IndexMap::with_capacity(entries.len());
            for (key, entry) in entries {
                let entry_path = join_path(path, key);
                out.insert(key.clone(), decode_inferred(&entry_path, entry)?);
            }
            Ok(Value::Map(out))
        }
        other => Err(MappingError::UnexpectedTag {
            path: path.to_string(),
            tag: tag_of(other).to_string(),
            expected: "any supported tag".to_string(),
        }),
    }
}

/// The wire tag name carried by an attribute value, for error messages.
pub fn tag_of(attr: &AttributeValue) -> &'static str {
    match attr {
        AttributeValue::B(_) => "B",
        AttributeValue::Bool(_) => "BOOL",
        AttributeValue::Bs(_) => "BS",
        AttributeValue::L(_) => "L",
        AttributeValue::M(_) => "M",
        AttributeValue::N(_) => "N",
        AttributeValue::Ns(_) => "NS",
        AttributeValue::Null(_) => "NULL",
        AttributeValue::S(_) => "S",
        AttributeValue::Ss(_) => "SS",
        _ => "unknown",
    }
}

fn resolve_nested(
    path: &str,
    thunk: crate::schema::SchemaThunk,
) -> Result<std::sync::Arc<ModelSchema>, MappingError> {
    thunk().map_err(|err| MappingError::ValueMismatch {
        path: path.to_string(),
        expected: "a resolvable nested schema".to_string(),
        found: err.to_string(),
    })
}

fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_timestamp(path: &str, text: &str) -> Result<Value, MappingError> {
    DateTime::parse_from_rfc3339(text)
        .map(|parsed| Value::DateTime(parsed.with_timezone(&Utc)))
        .map_err(|_| MappingError::InvalidTimestamp {
            path: path.to_string(),
            text: text.to_string(),
        })
}

fn parse_number(path: &str, text: &str) -> Result<Value, MappingError> {
    if let Ok(v) = text.parse::<i64>() {
        return Ok(Value::I64(v));
    }
    if let Ok(v) = text.parse::<u64>() {
        return Ok(Value::U64(v));
    }
    text.parse::<f64>()
        .map(Value::F64)
        .map_err(|_| MappingError::InvalidNumber {
            path: path.to_string(),
            text: text.to_string(),
        })
}

fn join_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{parent}.{segment}")
    }
}

fn mismatch(path: &str, expected: &str, found: &Value) -> MappingError {
    MappingError::ValueMismatch {
        path: path.to_string(),
        expected: expected.to_string(),
        found: found.kind_name().to_string(),
    }
}

fn mixed(path: &str) -> MappingError {
    MappingError::MixedSet {
        path: path.to_string(),
    }
}

fn unexpected(path: &str, attr: &AttributeValue, ty: &FieldTy) -> MappingError {
    MappingError::UnexpectedTag {
        path: path.to_string(),
        tag: tag_of(attr).to_string(),
        expected: ty.expected_tag().to_string(),
    }
}
