//! Article entity.
//!
//! # Invariants
//! - `title` is 5..=50 characters and fixed after creation.
//! - `author_id` and `magazine_id` never change.

use super::validation::{validate_article_title, ValidationError};
use super::{EntityId, EntityKind, ImmutableFieldError, Lifecycle};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    #[serde(rename = "id")]
    state: Lifecycle,
    title: String,
    author_id: EntityId,
    magazine_id: EntityId,
}

impl Article {
    /// Validates `title` and returns a pending article linking the two ids.
    ///
    /// Whether the ids resolve is checked by the service at create time.
    pub fn new(
        author_id: EntityId,
        magazine_id: EntityId,
        title: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        validate_article_title(&title)?;
        Ok(Self {
            state: Lifecycle::Pending,
            title,
            author_id,
            magazine_id,
        })
    }

    /// Rebuilds a persisted article from storage fields.
    pub fn with_id(
        id: EntityId,
        author_id: EntityId,
        magazine_id: EntityId,
        title: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self::new(author_id, magazine_id, title)?.persisted(id))
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

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author_id(&self) -> EntityId {
        self.author_id
    }

    pub fn magazine_id(&self) -> EntityId {
        self.magazine_id
    }

    /// Always fails: article titles cannot be changed.
    pub fn set_title(&mut self, _value: impl Into<String>) -> Result<(), ImmutableFieldError> {
        Err(ImmutableFieldError {
            entity: EntityKind::Article,
            field: "title",
        })
    }
}
