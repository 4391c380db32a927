use chrono::{DateTime, Utc};
use indexmap::IndexMap;

/// A native value as seen by application code, before wire encoding.
///
/// This is the input to [`mapper::encode_value`] and the output of
/// [`mapper::decode_value`]. Containers are plain Rust collections; the
/// set/list distinction is carried here because the store encodes them with
/// different tags.
///
/// [`mapper::encode_value`]: crate::mapper::encode_value
/// [`mapper::decode_value`]: crate::mapper::decode_value
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// String value
    String(String),

    /// Signed 64-bit integer
    I64(i64),

    /// Unsigned 64-bit integer
    U64(u64),

    /// 64-bit floating point number
    F64(f64),

    /// Raw binary payload
    Bytes(Vec<u8>),

    /// UTC timestamp
    DateTime(DateTime<Utc>),

    /// Collection of unique primitive values
    Set(Vec<Value>),

    /// Ordered list of values
    List(Vec<Value>),

    /// String-keyed map of values
    Map(IndexMap<String, Value>),

    /// Null value
    #[default]
    Null,
}

impl Value {
    /// Returns a `Value` representing null
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn is_number(&self) -> bool {
        matches!(self, Self::I64(_) | Self::U64(_) | Self::F64(_))
    }

    pub const fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Build a set value from anything convertible to `Value`.
    pub fn set(items: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Self::Set(items.into_iter().map(Into::into).collect())
    }

    /// Build a list value from anything convertible to `Value`.
    pub fn list(items: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a map value from key/value pairs.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    /// Renders a numeric value as the store's decimal string form.
    pub(crate) fn number_string(&self) -> Option<String> {
        match self {
            Self::I64(v) => Some(v.to_string()),
            Self::U64(v) => Some(v.to_string()),
            Self::F64(v) => Some(v.to_string()),
            _ => None,
        }
    }

    /// A short human-readable name for the value's shape, used in errors.
    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::String(_) => "string",
            Self::I64(_) | Self::U64(_) | Self::F64(_) => "number",
            Self::Bytes(_) => "binary",
            Self::DateTime(_) => "date",
            Self::Set(_) => "set",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Null => "null",
        }
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Self {
        Self::I64(src as i64)
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Self {
        Self::I64(src)
    }
}

impl From<u64> for Value {
    fn from(src: u64) -> Self {
        Self::U64(src)
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Self {
        Self::F64(src)
    }
}

impl From<Vec<u8>> for Value {
    fn from(src: Vec<u8>) -> Self {
        Self::Bytes(src)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(src: DateTime<Utc>) -> Self {
        Self::DateTime(src)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(src: IndexMap<String, Value>) -> Self {
        Self::Map(src)
    }
}
