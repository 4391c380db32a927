//! Compiles condition, update, and projection descriptors into the store's
//! expression syntax plus alias maps.
//!
//! Descriptors are ephemeral values produced by the fluent [`attribute`] and
//! [`update`] builders; the compiler resolves their field paths against a
//! [`ModelSchema`], encodes literal operands through the mapper, and renders
//! the statement text.
//!
//! [`ModelSchema`]: dynamap_core::schema::ModelSchema

mod compile;
pub use compile::{
    compile_condition, compile_condition_into, compile_projection, compile_projection_into,
    compile_update, compile_update_into, Compiled, ExprAttrs,
};

mod condition;
pub use condition::{and, attribute, not, or, AttributeBuilder, Condition};

mod operator;
pub use operator::ConditionOperator;

mod path;
pub use path::{AttributePath, PathSegment};

mod update;
pub use update::{update, ActionKeyword, ListPosition, UpdateAction, UpdateBuilder, UpdateOp};
