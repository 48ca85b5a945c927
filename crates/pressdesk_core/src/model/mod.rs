//! Publishing domain model: authors, magazines and articles.
//!
//! # Responsibility
//! - Define the validated entity records shared by repository and service.
//! - Represent the `pending -> persisted` lifecycle as an explicit state.
//!
//! # Invariants
//! - An entity value can only be built from fields that passed validation.
//! - `EntityId` is always a positive integer assigned by storage.
//! - A persisted entity never returns to `Pending`.

pub mod article;
pub mod author;
pub mod magazine;
pub mod validation;

use serde::{Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned identity of an author, magazine or article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EntityId(i64);

impl EntityId {
    /// Wraps a raw storage key. Returns `None` for zero or negative values.
    pub fn new(raw: i64) -> Option<Self> {
        (raw > 0).then_some(Self(raw))
    }

    /// Raw integer key as stored in SQLite.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three record kinds known by the publishing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Author,
    Magazine,
    Article,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Magazine => "magazine",
            Self::Article => "article",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of an entity value.
///
/// `Pending` values passed validation but have no storage identity yet and
/// are invisible to queries. The only transition is `Pending -> Persisted`,
/// performed by the create operations in the service layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    Pending,
    Persisted(EntityId),
}

impl Lifecycle {
    /// Storage identity, present only once persisted.
    pub fn id(self) -> Option<EntityId> {
        match self {
            Self::Pending => None,
            Self::Persisted(id) => Some(id),
        }
    }

    pub fn is_persisted(self) -> bool {
        matches!(self, Self::Persisted(_))
    }
}

/// Serialized as the nullable `id` field of the owning entity.
impl Serialize for Lifecycle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.id().serialize(serializer)
    }
}

/// Mutation attempt on a field that is fixed after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImmutableFieldError {
    pub entity: EntityKind,
    pub field: &'static str,
}

impl Display for ImmutableFieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{} cannot be changed after creation",
            self.entity, self.field
        )
    }
}

impl Error for ImmutableFieldError {}
