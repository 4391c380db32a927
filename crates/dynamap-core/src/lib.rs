mod error;
pub use error::{Error, InvalidOperationError, MappingError, SchemaError};

pub mod mapper;

pub mod schema;

pub mod value;
pub use value::Value;

/// A Result type alias that uses dynamap's [`Error`] type.
pub type Result<T, E = Error> = core::result::Result<T, E>;
