//! Typed data-mapping layer for DynamoDB-style key/sort-key stores.
//!
//! dynamap has three tightly coupled parts:
//!
//! - [`schema`] — declarative per-model metadata: keys, secondary indexes,
//!   per-field typing, ancestor-chain merging, cached process-wide.
//! - [`mapper`] — bidirectional codec between native [`Value`]s and the
//!   store's tagged attribute values.
//! - [`expr`] — compiles condition/update/projection descriptors into the
//!   store's expression syntax plus `#name`/`:value` alias maps.
//!
//! ```
//! use dynamap::prelude::*;
//! use dynamap::expr::compile_update;
//!
//! struct Counter;
//!
//! impl Model for Counter {
//!     fn definition() -> ModelDef {
//!         ModelDef::new("counters", "Counter")
//!             .field(FieldDef::string("id").partition_key())
//!             .field(FieldDef::number("counter"))
//!     }
//! }
//!
//! let schema = schema_of::<Counter>().unwrap();
//! let compiled = compile_update(&schema, &[update("counter").increment_by(5)]).unwrap();
//! assert_eq!(compiled.statement, "SET #counter = #counter + :counter");
//! ```

pub use dynamap_core::{
    mapper, schema, value, Error, InvalidOperationError, MappingError, Result, SchemaError, Value,
};

pub use dynamap_expr as expr;

pub mod prelude {
    pub use dynamap_core::schema::{schema_of, FieldDef, Model, ModelDef};
    pub use dynamap_core::Value;
    pub use dynamap_expr::{and, attribute, not, or, update};
}
