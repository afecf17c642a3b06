//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `ContactDraft::validate()` before persistence.
//! - Repository APIs report affected-row counts so callers can tell
//!   "matched nothing" apart from "changed one row".

pub mod contact_repo;
