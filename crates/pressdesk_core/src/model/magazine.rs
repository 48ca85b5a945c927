//! Magazine entity.
//!
//! # Invariants
//! - `name` is 2..=16 characters, `category` is non-empty.
//! - Setters validate before assigning; a rejected value leaves the old one.

use super::validation::{validate_magazine_category, validate_magazine_name, ValidationError};
use super::{EntityId, Lifecycle};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Magazine {
    #[serde(rename = "id")]
    state: Lifecycle,
    name: String,
    category: String,
}

impl Magazine {
    /// Validates both fields and returns a pending magazine.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let category = category.into();
        validate_magazine_name(&name)?;
        validate_magazine_category(&category)?;
        Ok(Self {
            state: Lifecycle::Pending,
            name,
            category,
        })
    }

    /// Rebuilds a persisted magazine from storage fields.
    pub fn with_id(
        id: EntityId,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self::new(name, category)?.persisted(id))
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

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Replaces the in-memory name. Does not touch storage; persisted
    /// magazines should be renamed through `PublishingService`.
    pub fn set_name(&mut self, value: impl Into<String>) -> Result<(), ValidationError> {
        let value = value.into();
        validate_magazine_name(&value)?;
        self.name = value;
        Ok(())
    }

    /// Replaces the in-memory category. Same storage caveat as `set_name`.
    pub fn set_category(&mut self, value: impl Into<String>) -> Result<(), ValidationError> {
        let value = value.into();
        validate_magazine_category(&value)?;
        self.category = value;
        Ok(())
    }
}
