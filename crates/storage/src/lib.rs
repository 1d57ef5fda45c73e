//! Storage layer for stockroom
//!
//! This crate owns the on-disk document:
//! - Document: ordered in-memory tree (root, collections, records)
//! - Codec: JSON encode/decode with root validation
//! - DocumentStore: bootstrap, load, atomic replace, read/mutate units
//! - Registry: one reader/writer lock per resolved document path
//!
//! # Concurrency
//!
//! Mutations run load-modify-persist under an exclusive lock shared by every
//! store over the same path, so concurrent writers never lose updates.
//! Reads take the same lock in shared mode.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod document;
pub mod registry;
pub mod store;

pub use document::{Collection, Document, Record, ROOT_NAME};
pub use store::{DocumentStore, Outcome};
