//! Persistence contract consumed by the publishing core.
//!
//! # Responsibility
//! - Define the narrow `PublishingStore` contract (insert/get/list/update).
//! - Convert between storage records and validated entities.
//!
//! # Invariants
//! - `list` returns rows in insertion order (ascending id).
//! - Read paths reject invalid persisted state instead of masking it.
//! - Stores assign ids; callers never choose them.

pub mod memory_store;
pub mod sqlite_store;

use crate::db::DbError;
use crate::model::article::Article;
use crate::model::author::Author;
use crate::model::magazine::Magazine;
use crate::model::validation::ValidationError;
use crate::model::{EntityId, EntityKind};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage-level failure reported by a `PublishingStore`.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound { kind: EntityKind, id: EntityId },
    /// Article row would point at a missing author or magazine.
    DanglingReference { kind: EntityKind, id: EntityId },
    UnsupportedFilter { kind: EntityKind, filter: ListFilter },
    InvalidData(String),
    /// Backend-specific failure that has no richer representation.
    Backend(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::DanglingReference { kind, id } => {
                write!(f, "article references missing {kind} {id}")
            }
            Self::UnsupportedFilter { kind, filter } => {
                write!(f, "filter {filter:?} is not supported for {kind} records")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Backend(message) => write!(f, "storage backend failure: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Field set of one stored row; the variant doubles as the record kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Author {
        name: String,
    },
    Magazine {
        name: String,
        category: String,
    },
    Article {
        title: String,
        author_id: EntityId,
        magazine_id: EntityId,
    },
}

impl Record {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Author { .. } => EntityKind::Author,
            Self::Magazine { .. } => EntityKind::Magazine,
            Self::Article { .. } => EntityKind::Article,
        }
    }
}

impl From<&Author> for Record {
    fn from(author: &Author) -> Self {
        Self::Author {
            name: author.name().to_string(),
        }
    }
}

impl From<&Magazine> for Record {
    fn from(magazine: &Magazine) -> Self {
        Self::Magazine {
            name: magazine.name().to_string(),
            category: magazine.category().to_string(),
        }
    }
}

impl From<&Article> for Record {
    fn from(article: &Article) -> Self {
        Self::Article {
            title: article.title().to_string(),
            author_id: article.author_id(),
            magazine_id: article.magazine_id(),
        }
    }
}

/// A record together with its storage-assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: EntityId,
    pub record: Record,
}

impl StoredRecord {
    pub fn into_author(self) -> RepoResult<Author> {
        match self.record {
            Record::Author { name } => Author::with_id(self.id, name)
                .map_err(|err| invalid_row(EntityKind::Author, self.id, err)),
            other => Err(kind_mismatch(EntityKind::Author, self.id, &other)),
        }
    }

    pub fn into_magazine(self) -> RepoResult<Magazine> {
        match self.record {
            Record::Magazine { name, category } => Magazine::with_id(self.id, name, category)
                .map_err(|err| invalid_row(EntityKind::Magazine, self.id, err)),
            other => Err(kind_mismatch(EntityKind::Magazine, self.id, &other)),
        }
    }

    pub fn into_article(self) -> RepoResult<Article> {
        match self.record {
            Record::Article {
                title,
                author_id,
                magazine_id,
            } => Article::with_id(self.id, author_id, magazine_id, title)
                .map_err(|err| invalid_row(EntityKind::Article, self.id, err)),
            other => Err(kind_mismatch(EntityKind::Article, self.id, &other)),
        }
    }
}

fn invalid_row(kind: EntityKind, id: EntityId, err: ValidationError) -> RepoError {
    RepoError::InvalidData(format!("{kind} {id}: {err}"))
}

fn kind_mismatch(expected: EntityKind, id: EntityId, found: &Record) -> RepoError {
    RepoError::InvalidData(format!(
        "expected {expected} record for id {id}, found {}",
        found.kind()
    ))
}

/// Single-column change applied by `PublishingStore::update`.
///
/// Only magazine fields are mutable after creation, and an update touches
/// exactly one column so concurrent edits to the other field survive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    MagazineName(String),
    MagazineCategory(String),
}

impl FieldUpdate {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::MagazineName(_) | Self::MagazineCategory(_) => EntityKind::Magazine,
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            Self::MagazineName(_) => "name",
            Self::MagazineCategory(_) => "category",
        }
    }
}

/// Row filter for `PublishingStore::list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFilter {
    All,
    /// Articles with `author_id = X`.
    AuthorId(EntityId),
    /// Articles with `magazine_id = X`.
    MagazineId(EntityId),
}

impl ListFilter {
    /// Foreign-key filters only apply to article rows.
    pub fn supports(self, kind: EntityKind) -> bool {
        matches!(self, Self::All) || kind == EntityKind::Article
    }
}

/// Persistence collaborator used by `PublishingService`.
///
/// Implementations must assign unique positive ids and return `list`
/// results in insertion order.
pub trait PublishingStore {
    /// Stores a new row of `record.kind()` and returns its id.
    fn insert(&self, record: &Record) -> RepoResult<EntityId>;
    fn get(&self, kind: EntityKind, id: EntityId) -> RepoResult<Option<StoredRecord>>;
    fn list(&self, kind: EntityKind, filter: ListFilter) -> RepoResult<Vec<StoredRecord>>;
    /// Rewrites one column of an existing row. `NotFound` when missing.
    fn update(&self, id: EntityId, change: &FieldUpdate) -> RepoResult<()>;
}

impl<S: PublishingStore + ?Sized> PublishingStore for &S {
    fn insert(&self, record: &Record) -> RepoResult<EntityId> {
        (**self).insert(record)
    }

    fn get(&self, kind: EntityKind, id: EntityId) -> RepoResult<Option<StoredRecord>> {
        (**self).get(kind, id)
    }

    fn list(&self, kind: EntityKind, filter: ListFilter) -> RepoResult<Vec<StoredRecord>> {
        (**self).list(kind, filter)
    }

    fn update(&self, id: EntityId, change: &FieldUpdate) -> RepoResult<()> {
        (**self).update(id, change)
    }
}
