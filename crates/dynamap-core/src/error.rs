use std::fmt;

/// An error that can occur anywhere in dynamap.
///
/// Each stage of the pipeline has its own closed error taxonomy; this type
/// unifies them at the crate boundary so callers can use a single `?` chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Definition-time schema failure. Fatal, not retryable.
    Schema(SchemaError),

    /// Per-value codec failure.
    Mapping(MappingError),

    /// Per-call failure while building or compiling an expression.
    InvalidOperation(InvalidOperationError),
}

/// Raised while resolving a model definition into a [`ModelSchema`].
///
/// [`ModelSchema`]: crate::schema::ModelSchema
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// Two fields in the resolved schema declare the partition-key role.
    DuplicatePartitionKey {
        model: String,
        first: String,
        second: String,
    },

    /// A secondary index resolved to an unusable key layout.
    MalformedIndex {
        model: String,
        index: String,
        reason: String,
    },
}

/// Raised while converting a single value to or from its wire form.
#[derive(Debug, Clone, PartialEq)]
pub enum MappingError {
    /// The wire value carried a tag the field's type does not accept.
    UnexpectedTag {
        path: String,
        tag: String,
        expected: String,
    },

    /// Attempted to encode an empty set. The store forbids empty sets.
    EmptySet { path: String },

    /// A set mixed element kinds that do not share a wire set tag.
    MixedSet { path: String },

    /// A native value did not fit the field's declared type.
    ValueMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// A key field had no concrete value. Keys may not be absent or null.
    MissingKeyValue { field: String },

    /// The schema declares no partition key, so no key map can be built.
    NoPartitionKey { model: String },

    /// A literal that must produce a wire value encoded to the absent-marker.
    AbsentValue { path: String },

    /// A number attribute held text that does not parse as a number.
    InvalidNumber { path: String, text: String },

    /// A date attribute held text that does not parse as an ISO-8601 timestamp.
    InvalidTimestamp { path: String, text: String },
}

/// Raised while building or compiling a condition/update/projection.
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidOperationError {
    /// The update compiler was invoked with zero operations.
    EmptyUpdate,

    /// A path segment did not resolve against the schema it was applied to.
    UnknownField { path: String, name: String },

    /// An operator alias not present in the alias table.
    UnknownAlias { alias: String },

    /// An operator was given the wrong number of operands.
    OperandCount {
        operator: &'static str,
        expected: &'static str,
        got: usize,
    },

    /// The raw attribute path could not be parsed.
    InvalidPath { path: String, reason: String },

    /// The action cannot apply to the resolved field's type.
    UnsupportedAction {
        action: &'static str,
        path: String,
        reason: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Schema(err) => err.fmt(f),
            Error::Mapping(err) => err.fmt(f),
            Error::InvalidOperation(err) => err.fmt(f),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::DuplicatePartitionKey {
                model,
                first,
                second,
            } => write!(
                f,
                "duplicate partition key on `{model}`: `{first}` and `{second}`"
            ),
            SchemaError::MalformedIndex {
                model,
                index,
                reason,
            } => write!(f, "malformed index `{index}` on `{model}`: {reason}"),
        }
    }
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingError::UnexpectedTag {
                path,
                tag,
                expected,
            } => write!(
                f,
                "unexpected wire tag `{tag}` at `{path}`: expected `{expected}`"
            ),
            MappingError::EmptySet { path } => {
                write!(f, "cannot encode empty set at `{path}`")
            }
            MappingError::MixedSet { path } => {
                write!(f, "set at `{path}` mixes incompatible element kinds")
            }
            MappingError::ValueMismatch {
                path,
                expected,
                found,
            } => write!(
                f,
                "value at `{path}` does not fit its declared type: expected {expected}, found {found}"
            ),
            MappingError::MissingKeyValue { field } => {
                write!(f, "no concrete value for key field `{field}`")
            }
            MappingError::NoPartitionKey { model } => {
                write!(f, "model `{model}` declares no partition key")
            }
            MappingError::AbsentValue { path } => {
                write!(f, "literal at `{path}` encoded to no value")
            }
            MappingError::InvalidNumber { path, text } => {
                write!(f, "number attribute at `{path}` does not parse: `{text}`")
            }
            MappingError::InvalidTimestamp { path, text } => {
                write!(f, "date attribute at `{path}` does not parse: `{text}`")
            }
        }
    }
}

impl fmt::Display for InvalidOperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidOperationError::EmptyUpdate => {
                write!(f, "at least one update operation must be supplied")
            }
            InvalidOperationError::UnknownField { path, name } => {
                write!(f, "unknown field `{name}` in path `{path}`")
            }
            InvalidOperationError::UnknownAlias { alias } => {
                write!(f, "unknown operator alias `{alias}`")
            }
            InvalidOperationError::OperandCount {
                operator,
                expected,
                got,
            } => write!(
                f,
                "operator `{operator}` expects {expected} operand(s), got {got}"
            ),
            InvalidOperationError::InvalidPath { path, reason } => {
                write!(f, "invalid attribute path `{path}`: {reason}")
            }
            InvalidOperationError::UnsupportedAction {
                action,
                path,
                reason,
            } => write!(f, "`{action}` cannot apply to `{path}`: {reason}"),
        }
    }
}

impl std::error::Error for Error {}
impl std::error::Error for SchemaError {}
impl std::error::Error for MappingError {}
impl std::error::Error for InvalidOperationError {}

impl From<SchemaError> for Error {
    fn from(err: SchemaError) -> Error {
        Error::Schema(err)
    }
}

impl From<MappingError> for Error {
    fn from(err: MappingError) -> Error {
        Error::Mapping(err)
    }
}

impl From<InvalidOperationError> for Error {
    fn from(err: InvalidOperationError) -> Error {
        Error::InvalidOperation(err)
    }
}

impl Error {
    pub fn is_schema(&self) -> bool {
        matches!(self, Error::Schema(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Error::Mapping(_))
    }

    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, Error::InvalidOperation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_display() {
        let err = Error::from(SchemaError::DuplicatePartitionKey {
            model: "InvalidModel".to_string(),
            first: "partKeyA".to_string(),
            second: "partKeyB".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "duplicate partition key on `InvalidModel`: `partKeyA` and `partKeyB`"
        );
        assert!(err.is_schema());
    }

    #[test]
    fn mapping_error_names_path_and_tag() {
        let err = MappingError::UnexpectedTag {
            path: "user.age".to_string(),
            tag: "S".to_string(),
            expected: "N".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unexpected wire tag `S` at `user.age`: expected `N`"
        );
    }

    #[test]
    fn empty_update_display() {
        let err = Error::from(InvalidOperationError::EmptyUpdate);
        assert_eq!(
            err.to_string(),
            "at least one update operation must be supplied"
        );
        assert!(err.is_invalid_operation());
    }
}
