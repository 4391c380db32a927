use dynamap_core::Value;

/// Action keywords grouping update sub-operations in the compiled statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKeyword {
    Set,
    Remove,
    Add,
    Delete,
}

impl ActionKeyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Set => "SET",
            Self::Remove => "REMOVE",
            Self::Add => "ADD",
            Self::Delete => "DELETE",
        }
    }
}

/// Where `list_append` places the new elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPosition {
    Start,
    End,
}

/// One update sub-operation.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    /// `SET #p = :p`
    Set(Value),

    /// `SET #p = #p + :p`
    IncrementBy(Value),

    /// `SET #p = #p - :p`
    DecrementBy(Value),

    /// `SET #p = list_append(#p, :p)` — operands swap for [`ListPosition::Start`].
    Append { value: Value, position: ListPosition },

    /// `REMOVE #p`
    Remove,

    /// `REMOVE #p[i]` per index
    RemoveFromListAt(Vec<u32>),

    /// `ADD #p :p` — number or set field
    Add(Value),

    /// `DELETE #p :p` — set field
    DeleteFromSet(Value),
}

impl UpdateAction {
    pub fn keyword(&self) -> ActionKeyword {
        match self {
            Self::Set(_) | Self::IncrementBy(_) | Self::DecrementBy(_) | Self::Append { .. } => {
                ActionKeyword::Set
            }
            Self::Remove | Self::RemoveFromListAt(_) => ActionKeyword::Remove,
            Self::Add(_) => ActionKeyword::Add,
            Self::DeleteFromSet(_) => ActionKeyword::Delete,
        }
    }
}

/// An update operation descriptor: a field path plus an action.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOp {
    pub path: String,
    pub action: UpdateAction,
}

/// Starts an update operation on the given attribute path.
pub fn update(path: impl Into<String>) -> UpdateBuilder {
    UpdateBuilder { path: path.into() }
}

/// Fluent builder for a single update operation.
#[derive(Debug, Clone)]
pub struct UpdateBuilder {
    path: String,
}

impl UpdateBuilder {
    fn build(self, action: UpdateAction) -> UpdateOp {
        UpdateOp {
            path: self.path,
            action,
        }
    }

    pub fn set(self, value: impl Into<Value>) -> UpdateOp {
        self.build(UpdateAction::Set(value.into()))
    }

    pub fn increment_by(self, amount: impl Into<Value>) -> UpdateOp {
        self.build(UpdateAction::IncrementBy(amount.into()))
    }

    pub fn decrement_by(self, amount: impl Into<Value>) -> UpdateOp {
        self.build(UpdateAction::DecrementBy(amount.into()))
    }

    /// Appends to the end of a list.
    pub fn append_to_list(self, value: impl Into<Value>) -> UpdateOp {
        self.append_to_list_at(value, ListPosition::End)
    }

    pub fn append_to_list_at(self, value: impl Into<Value>, position: ListPosition) -> UpdateOp {
        self.build(UpdateAction::Append {
            value: value.into(),
            position,
        })
    }

    pub fn remove(self) -> UpdateOp {
        self.build(UpdateAction::Remove)
    }

    pub fn remove_from_list_at(self, indices: impl IntoIterator<Item = u32>) -> UpdateOp {
        self.build(UpdateAction::RemoveFromListAt(
            indices.into_iter().collect(),
        ))
    }

    /// Adds to a number or set field. A scalar on a set field is normalized
    /// into a one-element set; pass [`Value::set`] for multiple elements.
    pub fn add(self, value: impl Into<Value>) -> UpdateOp {
        self.build(UpdateAction::Add(value.into()))
    }

    /// Removes elements from a set field. Accepts a scalar, a set, or a list;
    /// all normalize into one wire set value.
    pub fn remove_from_set(self, value: impl Into<Value>) -> UpdateOp {
        self.build(UpdateAction::DeleteFromSet(value.into()))
    }
}
