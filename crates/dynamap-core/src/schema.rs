//! Per-model schema metadata: declarative definitions, resolution, caching.

mod def;
pub use def::{FieldDef, Model, ModelDef};

mod field;
pub use field::{EnumBase, Field, FieldTy, KeyRole, Primitive, SchemaThunk};

mod model;
pub use model::{ModelSchema, SecondaryIndex};

mod resolve;
pub use resolve::schema_of;
