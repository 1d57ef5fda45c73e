//! Core types for stockroom
//!
//! This crate defines the foundational types used by every layer:
//! - Error: the `StoreError` taxonomy and `StoreResult` alias
//! - Value: `Scalar` field values and their declared `FieldType`
//! - Config: `StoreConfig`, the immutable location and lock settings
//! - Cancel: `CancellationToken`, checked before any persist step

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cancel;
pub mod config;
pub mod error;
pub mod value;

pub use cancel::CancellationToken;
pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use value::{FieldType, Scalar};
