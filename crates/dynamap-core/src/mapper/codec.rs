use crate::{MappingError, Value};
use aws_sdk_dynamodb::types::AttributeValue;

/// Custom per-field codec, replacing the default mapper path.
///
/// Installed through [`FieldDef::codec`]; takes precedence over every
/// built-in encoding rule for that field. Returning `Ok(None)` from
/// [`encode`] yields the absent-marker: the attribute is omitted.
///
/// [`FieldDef::codec`]: crate::schema::FieldDef::codec
/// [`encode`]: FieldCodec::encode
pub trait FieldCodec: Send + Sync {
    fn encode(&self, value: &Value) -> Result<Option<AttributeValue>, MappingError>;

    fn decode(&self, attr: &AttributeValue) -> Result<Value, MappingError>;
}
