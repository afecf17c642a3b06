//! Core data access for geo-tagged contacts.
//! This crate is the single source of truth for contact storage invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::StoreConfig;
pub use db::{DbError, DbHandle, HandleAccess, SchemaProvider, SqliteSchemaProvider};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::contact::{
    Contact, ContactDraft, ContactId, ContactSummary, ContactValidationError,
};
pub use repo::contact_repo::{ContactRepository, RepoError, RepoResult, SqliteContactRepository};
pub use service::contact_service::ContactService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
