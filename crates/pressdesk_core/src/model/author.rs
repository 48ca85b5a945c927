//! Author entity.
//!
//! # Invariants
//! - `name` is non-empty and fixed once the author exists.

use super::validation::{validate_author_name, ValidationError};
use super::{EntityId, EntityKind, ImmutableFieldError, Lifecycle};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    #[serde(rename = "id")]
    state: Lifecycle,
    name: String,
}

impl Author {
    /// Validates `name` and returns a pending author.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        validate_author_name(&name)?;
        Ok(Self {
            state: Lifecycle::Pending,
            name,
        })
    }

    /// Rebuilds a persisted author from storage fields.
    pub fn with_id(id: EntityId, name: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self::new(name)?.persisted(id))
    }

    pub(crate) fn persisted(self, id: EntityId) -> Self {
        Self {
            state: Lifecycle::Persisted(id),
            ..self
        }
    }

    pub fn id(&self) -> Option<EntityId> {
        self.state.id()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.state
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Always fails: author names cannot be changed.
    pub fn set_name(&mut self, _value: impl Into<String>) -> Result<(), ImmutableFieldError> {
        Err(ImmutableFieldError {
            entity: EntityKind::Author,
            field: "name",
        })
    }
}
