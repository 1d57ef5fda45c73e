//! Stockroom integration tests
//!
//! End-to-end behavior through the public facade: CRUD and id assignment,
//! relational queries, concurrent writers, and malformed documents.

#[path = "../common/mod.rs"]
mod common;

mod concurrency;
mod corruption;
mod crud;
mod queries;
