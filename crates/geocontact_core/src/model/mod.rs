//! Domain model for geo-tagged contacts.
//!
//! # Responsibility
//! - Define the data structures shared by repository, service and FFI layers.
//!
//! # Invariants
//! - Every persisted contact is identified by a storage-assigned `ContactId`.
//! - Deletion is a hard delete; there are no tombstones or versions.

pub mod contact;
