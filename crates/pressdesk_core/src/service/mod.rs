//! Core use-case services.
//!
//! # Responsibility
//! - Validate inputs, enforce referential integrity and persist entities.
//! - Answer relationship and aggregation queries over the store contract.
//! - Keep callers decoupled from the storage backend.

pub mod publishing_service;
pub mod relation_queries;
