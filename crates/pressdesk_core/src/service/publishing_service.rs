//! Entity create/load/mutate use-cases.
//!
//! # Responsibility
//! - Turn validated pending entities into persisted ones via the store.
//! - Enforce that articles only reference persisted, resolvable entities.
//!
//! # Invariants
//! - Validation happens before any store call; a failed validation never
//!   leaves a row behind.
//! - A create only returns an entity after `insert` succeeded.
//! - Magazine mutations hit the store before the caller's value changes,
//!   and only the mutated column is written.

use crate::model::article::Article;
use crate::model::author::Author;
use crate::model::magazine::Magazine;
use crate::model::validation::{validate_article_title, ValidationError};
use crate::model::{EntityId, EntityKind, ImmutableFieldError};
use crate::repo::{FieldUpdate, ListFilter, PublishingStore, Record, RepoError, StoredRecord};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Threshold used by `contributing_authors` unless overridden.
pub const DEFAULT_CONTRIBUTING_THRESHOLD: usize = 2;

pub type PublishingResult<T> = Result<T, PublishingError>;

/// An entity reference that cannot be resolved to a stored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceError {
    /// Entity is still pending and has no id.
    Unpersisted(EntityKind),
    /// Entity carries an id that the store does not know.
    Missing { kind: EntityKind, id: EntityId },
}

impl Display for ReferenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unpersisted(kind) => write!(f, "{kind} has not been persisted yet"),
            Self::Missing { kind, id } => write!(f, "referenced {kind} {id} does not exist"),
        }
    }
}

impl Error for ReferenceError {}

/// Error surface of every publishing use-case.
#[derive(Debug)]
pub enum PublishingError {
    Validation(ValidationError),
    Reference(ReferenceError),
    NotFound { kind: EntityKind, id: EntityId },
    ImmutableField(ImmutableFieldError),
    Persistence(RepoError),
}

impl Display for PublishingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Reference(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::ImmutableField(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PublishingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Reference(err) => Some(err),
            Self::ImmutableField(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::NotFound { .. } => None,
        }
    }
}

impl From<ValidationError> for PublishingError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ReferenceError> for PublishingError {
    fn from(value: ReferenceError) -> Self {
        Self::Reference(value)
    }
}

impl From<ImmutableFieldError> for PublishingError {
    fn from(value: ImmutableFieldError) -> Self {
        Self::ImmutableField(value)
    }
}

impl From<RepoError> for PublishingError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { kind, id } => Self::NotFound { kind, id },
            RepoError::DanglingReference { kind, id } => {
                Self::Reference(ReferenceError::Missing { kind, id })
            }
            other => Self::Persistence(other),
        }
    }
}

impl PublishingError {
    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::Reference(_) => "reference_unresolved",
            Self::NotFound { .. } => "not_found",
            Self::ImmutableField(_) => "immutable_field",
            Self::Persistence(_) => "persistence_failed",
        }
    }
}

/// Tunables for `PublishingService`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    /// `contributing_authors` keeps authors with strictly more articles.
    pub contributing_threshold: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            contributing_threshold: DEFAULT_CONTRIBUTING_THRESHOLD,
        }
    }
}

/// Publishing use-case facade over a `PublishingStore`.
pub struct PublishingService<S: PublishingStore> {
    pub(super) store: S,
    pub(super) config: ServiceConfig,
}

impl<S: PublishingStore> PublishingService<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, ServiceConfig::default())
    }

    pub fn with_config(store: S, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> ServiceConfig {
        self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates `name`, persists a new author and returns it.
    pub fn create_author(&self, name: impl Into<String>) -> PublishingResult<Author> {
        let pending = logged_validation(EntityKind::Author, Author::new(name))?;
        let id = self.insert(&Record::from(&pending))?;
        Ok(pending.persisted(id))
    }

    pub fn load_author(&self, id: EntityId) -> PublishingResult<Author> {
        Ok(self.fetch(EntityKind::Author, id)?.into_author()?)
    }

    pub fn list_authors(&self) -> PublishingResult<Vec<Author>> {
        self.store
            .list(EntityKind::Author, ListFilter::All)?
            .into_iter()
            .map(|stored| stored.into_author().map_err(PublishingError::from))
            .collect()
    }

    /// Validates both fields, persists a new magazine and returns it.
    pub fn create_magazine(
        &self,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> PublishingResult<Magazine> {
        let pending = logged_validation(EntityKind::Magazine, Magazine::new(name, category))?;
        let id = self.insert(&Record::from(&pending))?;
        Ok(pending.persisted(id))
    }

    pub fn load_magazine(&self, id: EntityId) -> PublishingResult<Magazine> {
        Ok(self.fetch(EntityKind::Magazine, id)?.into_magazine()?)
    }

    pub fn list_magazines(&self) -> PublishingResult<Vec<Magazine>> {
        self.store
            .list(EntityKind::Magazine, ListFilter::All)?
            .into_iter()
            .map(|stored| stored.into_magazine().map_err(PublishingError::from))
            .collect()
    }

    /// Renames `magazine`, writing through to the store when persisted.
    ///
    /// On any error `magazine` keeps its previous name.
    pub fn set_magazine_name(
        &self,
        magazine: &mut Magazine,
        value: impl Into<String>,
    ) -> PublishingResult<()> {
        let mut updated = magazine.clone();
        updated.set_name(value)?;
        let change = FieldUpdate::MagazineName(updated.name().to_string());
        self.commit_magazine(magazine, updated, &change)
    }

    /// Recategorizes `magazine`; same all-or-nothing rule as the rename.
    pub fn set_magazine_category(
        &self,
        magazine: &mut Magazine,
        value: impl Into<String>,
    ) -> PublishingResult<()> {
        let mut updated = magazine.clone();
        updated.set_category(value)?;
        let change = FieldUpdate::MagazineCategory(updated.category().to_string());
        self.commit_magazine(magazine, updated, &change)
    }

    /// Persists a new article by `author` in `magazine`.
    ///
    /// # Errors
    /// - `Validation` when the title length is out of bounds.
    /// - `Reference` when either entity is pending or no longer stored.
    pub fn create_article(
        &self,
        author: &Author,
        magazine: &Magazine,
        title: impl Into<String>,
    ) -> PublishingResult<Article> {
        let title = title.into();
        logged_validation(EntityKind::Article, validate_article_title(&title))?;

        let author_id = self.resolve(EntityKind::Author, author.id())?;
        let magazine_id = self.resolve(EntityKind::Magazine, magazine.id())?;
        let pending = Article::new(author_id, magazine_id, title)?;
        let id = self.insert(&Record::from(&pending))?;
        Ok(pending.persisted(id))
    }

    pub fn load_article(&self, id: EntityId) -> PublishingResult<Article> {
        Ok(self.fetch(EntityKind::Article, id)?.into_article()?)
    }

    /// Author who wrote `article`.
    pub fn article_author(&self, article: &Article) -> PublishingResult<Author> {
        self.load_author(article.author_id())
    }

    /// Magazine that published `article`.
    pub fn article_magazine(&self, article: &Article) -> PublishingResult<Magazine> {
        self.load_magazine(article.magazine_id())
    }

    /// Returns the id of a persisted entity that still exists in the store.
    pub(super) fn resolve(
        &self,
        kind: EntityKind,
        id: Option<EntityId>,
    ) -> PublishingResult<EntityId> {
        let id = id.ok_or(ReferenceError::Unpersisted(kind))?;
        if self.store.get(kind, id)?.is_none() {
            return Err(ReferenceError::Missing { kind, id }.into());
        }
        Ok(id)
    }

    fn fetch(&self, kind: EntityKind, id: EntityId) -> PublishingResult<StoredRecord> {
        self.store
            .get(kind, id)?
            .ok_or(PublishingError::NotFound { kind, id })
    }

    fn insert(&self, record: &Record) -> PublishingResult<EntityId> {
        let kind = record.kind();
        match self.store.insert(record) {
            Ok(id) => {
                info!("event=entity_create module=service status=ok kind={kind} id={id}");
                Ok(id)
            }
            Err(err) => {
                let err = PublishingError::from(err);
                warn!(
                    "event=entity_create module=service status=error kind={kind} error_code={} error={err}",
                    err.code()
                );
                Err(err)
            }
        }
    }

    /// Writes one changed column, then swaps in the updated value.
    ///
    /// Only the changed column is sent, so a stale handle cannot revert the
    /// other field.
    fn commit_magazine(
        &self,
        magazine: &mut Magazine,
        updated: Magazine,
        change: &FieldUpdate,
    ) -> PublishingResult<()> {
        if let Some(id) = updated.id() {
            let field = change.field();
            if let Err(err) = self.store.update(id, change) {
                let err = PublishingError::from(err);
                warn!(
                    "event=entity_update module=service status=error kind=magazine id={id} field={field} error_code={}",
                    err.code()
                );
                return Err(err);
            }
            info!("event=entity_update module=service status=ok kind=magazine id={id} field={field}");
        }
        *magazine = updated;
        Ok(())
    }
}

fn logged_validation<T>(
    kind: EntityKind,
    result: Result<T, ValidationError>,
) -> PublishingResult<T> {
    result.map_err(|err| {
        info!("event=entity_create module=service status=rejected kind={kind} error_code=validation_failed");
        PublishingError::Validation(err)
    })
}
