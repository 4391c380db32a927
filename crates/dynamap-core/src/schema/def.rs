use super::field::SchemaThunk;
use super::{EnumBase, FieldTy, KeyRole, Primitive};
use crate::mapper::FieldCodec;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// A persistable model type.
///
/// Implementations describe their shape once, declaratively; resolution into
/// a [`ModelSchema`] happens on first access through [`schema_of`] and is
/// cached for the process lifetime.
///
/// [`ModelSchema`]: super::ModelSchema
/// [`schema_of`]: super::schema_of
pub trait Model: 'static {
    fn definition() -> ModelDef;
}

/// Declarative description of one model type, before resolution.
///
/// Ancestors are an explicit chain: `parent::<Base>()` records the parent's
/// definition so resolution can walk the chain oldest-first and merge field
/// declarations by name.
#[derive(Debug)]
pub struct ModelDef {
    pub(crate) table_name: String,
    pub(crate) model_name: String,
    pub(crate) parent: Option<fn() -> ModelDef>,
    pub(crate) fields: Vec<FieldDef>,
}

impl ModelDef {
    pub fn new(table_name: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            model_name: model_name.into(),
            parent: None,
            fields: vec![],
        }
    }

    /// Declares `M` as the direct ancestor of this model.
    pub fn parent<M: Model>(mut self) -> Self {
        self.parent = Some(M::definition);
        self
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }
}

/// Declarative description of one field, built fluently.
pub struct FieldDef {
    pub(crate) name: String,
    pub(crate) wire_name: Option<String>,
    pub(crate) key: Option<KeyRole>,
    pub(crate) ty: FieldTy,
    pub(crate) transient: bool,
    pub(crate) codec: Option<Arc<dyn FieldCodec>>,
    pub(crate) index_roles: IndexMap<String, KeyRole>,
}

impl FieldDef {
    fn new(name: impl Into<String>, ty: FieldTy) -> Self {
        Self {
            name: name.into(),
            wire_name: None,
            key: None,
            ty,
            transient: false,
            codec: None,
            index_roles: IndexMap::new(),
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldTy::Primitive(Primitive::String))
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldTy::Primitive(Primitive::Number))
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldTy::Primitive(Primitive::Bool))
    }

    pub fn binary(name: impl Into<String>) -> Self {
        Self::new(name, FieldTy::Primitive(Primitive::Binary))
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldTy::Primitive(Primitive::Date))
    }

    pub fn number_enum(name: impl Into<String>) -> Self {
        Self::new(name, FieldTy::Primitive(Primitive::Enum(EnumBase::Number)))
    }

    pub fn string_enum(name: impl Into<String>) -> Self {
        Self::new(name, FieldTy::Primitive(Primitive::Enum(EnumBase::String)))
    }

    pub fn string_set(name: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldTy::Set {
                element: Primitive::String,
                sorted: false,
            },
        )
    }

    pub fn number_set(name: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldTy::Set {
                element: Primitive::Number,
                sorted: false,
            },
        )
    }

    pub fn binary_set(name: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldTy::Set {
                element: Primitive::Binary,
                sorted: false,
            },
        )
    }

    pub fn list(name: impl Into<String>) -> Self {
        Self::new(name, FieldTy::List { sorted: false })
    }

    pub fn map(name: impl Into<String>) -> Self {
        Self::new(name, FieldTy::Map)
    }

    /// A nested object carrying `M`'s own schema.
    pub fn nested<M: Model>(name: impl Into<String>) -> Self {
        let thunk: SchemaThunk = super::schema_of::<M>;
        Self::new(name, FieldTy::Nested(thunk))
    }

    /// Overrides the store attribute name.
    pub fn wire_name(mut self, wire_name: impl Into<String>) -> Self {
        self.wire_name = Some(wire_name.into());
        self
    }

    pub fn partition_key(mut self) -> Self {
        self.key = Some(KeyRole::Partition);
        self
    }

    pub fn sort_key(mut self) -> Self {
        self.key = Some(KeyRole::Sort);
        self
    }

    /// Excludes the field from persistence.
    pub fn transient(mut self) -> Self {
        self.transient = true;
        self
    }

    /// Marks a collection field as order-preserving. Metadata hint only.
    pub fn sorted(mut self) -> Self {
        match &mut self.ty {
            FieldTy::Set { sorted, .. } | FieldTy::List { sorted } => *sorted = true,
            _ => {}
        }
        self
    }

    /// Installs a custom codec replacing the default mapper path.
    pub fn codec(mut self, codec: Arc<dyn FieldCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Declares this field as the partition key of a global secondary index.
    pub fn gsi_partition_key(mut self, index: impl Into<String>) -> Self {
        self.index_roles.insert(index.into(), KeyRole::Partition);
        self
    }

    /// Declares this field as the sort key of a global secondary index.
    pub fn gsi_sort_key(mut self, index: impl Into<String>) -> Self {
        self.index_roles.insert(index.into(), KeyRole::Sort);
        self
    }

    /// Declares this field as the sort key of a local secondary index. The
    /// index partition key is the table partition key.
    pub fn lsi_sort_key(mut self, index: impl Into<String>) -> Self {
        self.index_roles.insert(index.into(), KeyRole::Sort);
        self
    }
}

impl fmt::Debug for FieldDef {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("FieldDef")
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
