//! Flutter bridge for the geo-contact core.
//!
//! Dart-facing functions live in [`api`]; they wrap `geocontact_core`
//! use-cases and translate results into plain response envelopes.

pub mod api;
