use dynamap_core::InvalidOperationError;

/// Condition operators supported by the store's expression language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOperator {
    Eq,
    Ne,
    Le,
    Lt,
    Ge,
    Gt,
    AttributeNotExists,
    AttributeExists,
    AttributeType,
    Contains,
    In,
    BeginsWith,
    Between,
}

impl ConditionOperator {
    pub const ALL: [ConditionOperator; 13] = [
        Self::Eq,
        Self::Ne,
        Self::Le,
        Self::Lt,
        Self::Ge,
        Self::Gt,
        Self::AttributeNotExists,
        Self::AttributeExists,
        Self::AttributeType,
        Self::Contains,
        Self::In,
        Self::BeginsWith,
        Self::Between,
    ];

    /// The operator's spelling in the compiled expression.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Le => "<=",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Gt => ">",
            Self::AttributeNotExists => "attribute_not_exists",
            Self::AttributeExists => "attribute_exists",
            Self::AttributeType => "attribute_type",
            Self::Contains => "contains",
            Self::In => "IN",
            Self::BeginsWith => "begins_with",
            Self::Between => "BETWEEN",
        }
    }

    /// Builder-facing aliases. The table is fixed and bidirectional: every
    /// alias maps back to exactly one operator.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Eq => &["equals", "eq"],
            Self::Ne => &["ne"],
            Self::Le => &["lte"],
            Self::Lt => &["lt"],
            Self::Ge => &["gte"],
            Self::Gt => &["gt"],
            Self::AttributeNotExists => &["null"],
            Self::AttributeExists => &["notNull"],
            Self::AttributeType => &["type"],
            Self::Contains => &["contains"],
            Self::In => &["in"],
            Self::BeginsWith => &["beginsWith"],
            Self::Between => &["between"],
        }
    }

    /// Looks an operator up by alias. Unknown aliases are rejected when the
    /// fluent expression is built, not when the statement is compiled.
    pub fn from_alias(alias: &str) -> Result<Self, InvalidOperationError> {
        Self::ALL
            .into_iter()
            .find(|op| op.aliases().contains(&alias))
            .ok_or_else(|| InvalidOperationError::UnknownAlias {
                alias: alias.to_string(),
            })
    }

    /// Function-style operators render as `op (#path, ...)`.
    pub(crate) fn is_function(self) -> bool {
        matches!(
            self,
            Self::AttributeNotExists
                | Self::AttributeExists
                | Self::AttributeType
                | Self::Contains
                | Self::BeginsWith
        )
    }

    /// Required operand count; `None` means variadic (at least one).
    pub(crate) fn operand_count(self) -> Option<usize> {
        match self {
            Self::AttributeNotExists | Self::AttributeExists => Some(0),
            Self::Between => Some(2),
            Self::In => None,
            _ => Some(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_table_is_bidirectional() {
        for op in ConditionOperator::ALL {
            for alias in op.aliases() {
                assert_eq!(ConditionOperator::from_alias(alias).unwrap(), op);
            }
        }
    }

    #[test]
    fn unknown_alias_is_rejected() {
        assert!(matches!(
            ConditionOperator::from_alias("definitelyNotAnAlias"),
            Err(InvalidOperationError::UnknownAlias { .. })
        ));
    }
}
