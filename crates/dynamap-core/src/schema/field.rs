use super::ModelSchema;
use crate::mapper::FieldCodec;
use crate::{Result, Value};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Role a field plays in the primary key or in a secondary index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    Partition,
    Sort,
}

/// Base kind an enum field encodes as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumBase {
    Number,
    String,
}

/// Scalar wire kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Number,
    Bool,
    Binary,
    /// Encodes as a fixed ISO-8601 UTC timestamp string.
    Date,
    /// Encodes as the declared base kind.
    Enum(EnumBase),
}

/// Lazily resolves the schema of a nested model through the process cache.
pub type SchemaThunk = fn() -> Result<Arc<ModelSchema>>;

/// Per-field type descriptor, drives the attribute value mapper.
#[derive(Clone)]
pub enum FieldTy {
    Primitive(Primitive),

    /// Homogeneous set of primitives. `sorted` is a metadata hint for callers
    /// that need deterministic iteration order; it never changes the wire
    /// representation.
    Set { element: Primitive, sorted: bool },

    /// Ordered list; element types are inferred per value.
    List { sorted: bool },

    /// Free-form string-keyed map; entry types are inferred per value.
    Map,

    /// Nested object carrying its own schema.
    Nested(SchemaThunk),
}

/// Describes one declared model field.
#[derive(Clone)]
pub struct Field {
    /// Program-level identifier.
    pub name: String,

    /// Store attribute name. Defaults to `name`.
    pub wire_name: String,

    /// `Some` if the field is part of the primary key.
    pub key: Option<KeyRole>,

    /// The field type
    pub ty: FieldTy,

    /// True if the field is excluded from persistence.
    pub transient: bool,

    /// Custom codec replacing the default mapper path entirely.
    pub codec: Option<Arc<dyn FieldCodec>>,

    /// Index name to the role this field plays in that index.
    pub index_roles: IndexMap<String, KeyRole>,
}

impl Field {
    pub fn is_partition_key(&self) -> bool {
        self.key == Some(KeyRole::Partition)
    }

    pub fn is_sort_key(&self) -> bool {
        self.key == Some(KeyRole::Sort)
    }
}

impl FieldTy {
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(..))
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set { .. })
    }

    pub fn as_nested(&self) -> Option<SchemaThunk> {
        match self {
            Self::Nested(thunk) => Some(*thunk),
            _ => None,
        }
    }

    /// Infers a descriptor from a value's shape. Used for list elements and
    /// map entries that carry no declared type.
    pub fn of(value: &Value) -> FieldTy {
        match value {
            Value::Bool(_) => FieldTy::Primitive(Primitive::Bool),
            Value::String(_) | Value::Null => FieldTy::Primitive(Primitive::String),
            Value::I64(_) | Value::U64(_) | Value::F64(_) => {
                FieldTy::Primitive(Primitive::Number)
            }
            Value::Bytes(_) => FieldTy::Primitive(Primitive::Binary),
            Value::DateTime(_) => FieldTy::Primitive(Primitive::Date),
            Value::Set(items) => FieldTy::Set {
                element: items.first().map(Primitive::of).unwrap_or(Primitive::String),
                sorted: false,
            },
            Value::List(_) => FieldTy::List { sorted: false },
            Value::Map(_) => FieldTy::Map,
        }
    }

    /// The wire tag this descriptor accepts, used in error messages.
    pub(crate) fn expected_tag(&self) -> &'static str {
        match self {
            FieldTy::Primitive(p) => p.expected_tag(),
            FieldTy::Set { element, .. } => match element.expected_tag() {
                "S" => "SS",
                "N" => "NS",
                "B" => "BS",
                other => other,
            },
            FieldTy::List { .. } => "L",
            FieldTy::Map | FieldTy::Nested(_) => "M",
        }
    }
}

impl Primitive {
    /// Infers the primitive kind of a scalar value, defaulting to `String`.
    pub fn of(value: &Value) -> Primitive {
        match value {
            Value::Bool(_) => Primitive::Bool,
            Value::I64(_) | Value::U64(_) | Value::F64(_) => Primitive::Number,
            Value::Bytes(_) => Primitive::Binary,
            Value::DateTime(_) => Primitive::Date,
            _ => Primitive::String,
        }
    }

    pub(crate) fn expected_tag(&self) -> &'static str {
        match self {
            Primitive::String | Primitive::Date | Primitive::Enum(EnumBase::String) => "S",
            Primitive::Number | Primitive::Enum(EnumBase::Number) => "N",
            Primitive::Bool => "BOOL",
            Primitive::Binary => "B",
        }
    }
}

impl fmt::Debug for FieldTy {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => fmt.debug_tuple("Primitive").field(p).finish(),
            Self::Set { element, sorted } => fmt
                .debug_struct("Set")
                .field("element", element)
                .field("sorted", sorted)
                .finish(),
            Self::List { sorted } => fmt.debug_struct("List").field("sorted", sorted).finish(),
            Self::Map => fmt.write_str("Map"),
            Self::Nested(_) => fmt.write_str("Nested"),
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("Field")
            .field("name", &self.name)
            .field("wire_name", &self.wire_name)
            .field("key", &self.key)
            .field("ty", &self.ty)
            .field("transient", &self.transient)
            .field("codec", &self.codec.as_ref().map(|_| "<custom>"))
            .field("index_roles", &self.index_roles)
            .finish()
    }
}
