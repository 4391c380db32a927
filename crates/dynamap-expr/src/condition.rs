use crate::ConditionOperator;
use dynamap_core::{InvalidOperationError, Value};

/// A condition descriptor: one comparison, or a logical combination.
///
/// Built fluently via [`attribute`] plus [`and`], [`or`], [`not`]; consumed
/// once by the compiler.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Comparison {
        path: String,
        op: ConditionOperator,
        operands: Vec<Value>,
    },
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),
}

/// Starts a condition on the given attribute path.
pub fn attribute(path: impl Into<String>) -> AttributeBuilder {
    AttributeBuilder { path: path.into() }
}

/// Combines conditions with `AND`, wrapping them in parentheses.
pub fn and(conditions: impl IntoIterator<Item = Condition>) -> Condition {
    Condition::And(conditions.into_iter().collect())
}

/// Combines conditions with `OR`, wrapping them in parentheses.
pub fn or(conditions: impl IntoIterator<Item = Condition>) -> Condition {
    Condition::Or(conditions.into_iter().collect())
}

/// Negates a condition, compiling to `NOT (...)`.
pub fn not(condition: Condition) -> Condition {
    Condition::Not(Box::new(condition))
}

/// Fluent builder for a single comparison.
#[derive(Debug, Clone)]
pub struct AttributeBuilder {
    path: String,
}

impl AttributeBuilder {
    fn compare(self, op: ConditionOperator, operands: Vec<Value>) -> Condition {
        Condition::Comparison {
            path: self.path,
            op,
            operands,
        }
    }

    pub fn eq(self, value: impl Into<Value>) -> Condition {
        self.compare(ConditionOperator::Eq, vec![value.into()])
    }

    pub fn ne(self, value: impl Into<Value>) -> Condition {
        self.compare(ConditionOperator::Ne, vec![value.into()])
    }

    pub fn lt(self, value: impl Into<Value>) -> Condition {
        self.compare(ConditionOperator::Lt, vec![value.into()])
    }

    pub fn lte(self, value: impl Into<Value>) -> Condition {
        self.compare(ConditionOperator::Le, vec![value.into()])
    }

    pub fn gt(self, value: impl Into<Value>) -> Condition {
        self.compare(ConditionOperator::Gt, vec![value.into()])
    }

    pub fn gte(self, value: impl Into<Value>) -> Condition {
        self.compare(ConditionOperator::Ge, vec![value.into()])
    }

    /// `attribute_exists (#path)`
    pub fn attribute_exists(self) -> Condition {
        self.compare(ConditionOperator::AttributeExists, vec![])
    }

    /// `attribute_not_exists (#path)`
    pub fn attribute_not_exists(self) -> Condition {
        self.compare(ConditionOperator::AttributeNotExists, vec![])
    }

    /// Alias for [`attribute_not_exists`](Self::attribute_not_exists).
    pub fn null(self) -> Condition {
        self.attribute_not_exists()
    }

    /// Alias for [`attribute_exists`](Self::attribute_exists).
    pub fn not_null(self) -> Condition {
        self.attribute_exists()
    }

    /// `attribute_type (#path, :tag)` — `tag` is a wire tag name such as
    /// `"S"` or `"NS"`.
    pub fn attribute_type(self, tag: impl Into<String>) -> Condition {
        self.compare(
            ConditionOperator::AttributeType,
            vec![Value::String(tag.into())],
        )
    }

    pub fn contains(self, value: impl Into<Value>) -> Condition {
        self.compare(ConditionOperator::Contains, vec![value.into()])
    }

    pub fn begins_with(self, value: impl Into<Value>) -> Condition {
        self.compare(ConditionOperator::BeginsWith, vec![value.into()])
    }

    pub fn between(self, lower: impl Into<Value>, upper: impl Into<Value>) -> Condition {
        self.compare(
            ConditionOperator::Between,
            vec![lower.into(), upper.into()],
        )
    }

    pub fn is_in(self, values: impl IntoIterator<Item = impl Into<Value>>) -> Condition {
        self.compare(
            ConditionOperator::In,
            values.into_iter().map(Into::into).collect(),
        )
    }

    /// Dynamic entry point: builds a comparison from an operator alias.
    /// Unknown aliases and operand-count mismatches are rejected here, at
    /// build time.
    pub fn op(
        self,
        alias: &str,
        operands: impl IntoIterator<Item = Value>,
    ) -> Result<Condition, InvalidOperationError> {
        let op = ConditionOperator::from_alias(alias)?;
        let operands: Vec<Value> = operands.into_iter().collect();
        match op.operand_count() {
            Some(expected) if operands.len() != expected => {
                Err(InvalidOperationError::OperandCount {
                    operator: op.symbol(),
                    expected: match expected {
                        0 => "0",
                        1 => "1",
                        _ => "2",
                    },
                    got: operands.len(),
                })
            }
            None if operands.is_empty() => Err(InvalidOperationError::OperandCount {
                operator: op.symbol(),
                expected: "at least 1",
                got: 0,
            }),
            _ => Ok(self.compare(op, operands)),
        }
    }
}
