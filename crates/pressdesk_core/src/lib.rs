//! Core domain logic for pressdesk: authors, magazines and the articles
//! that link them.
//! This crate owns every validation rule and relationship query.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::article::Article;
pub use model::author::Author;
pub use model::magazine::Magazine;
pub use model::validation::ValidationError;
pub use model::{EntityId, EntityKind, ImmutableFieldError, Lifecycle};
pub use repo::{
    FieldUpdate, ListFilter, MemoryStore, PublishingStore, Record, RepoError, RepoResult,
    SqliteStore, StoredRecord,
};
pub use service::publishing_service::{
    PublishingError, PublishingResult, PublishingService, ReferenceError, ServiceConfig,
    DEFAULT_CONTRIBUTING_THRESHOLD,
};
pub use service::relation_queries::QueryOutcome;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
