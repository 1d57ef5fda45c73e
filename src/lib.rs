//! Stockroom - document-backed inventory store
//!
//! Stockroom keeps four related collections (categories, products,
//! suppliers, orders) in one JSON document under a single `source` root and
//! answers CRUD and relational queries against it.
//!
//! # Quick Start
//!
//! ```ignore
//! use stockroom::{CancellationToken, NewCategory, Stockroom, StoreConfig};
//!
//! let stockroom = Stockroom::open(StoreConfig::new("data/stock.json"))?;
//! let tea = stockroom.categories().create(
//!     NewCategory { name: "Tea".into(), description: "Leaves".into() },
//!     &CancellationToken::new(),
//! )?;
//! ```
//!
//! # Architecture
//!
//! `stockroom-core` holds errors, values and config; `stockroom-storage`
//! owns the file, its locks and atomic replace; `stockroom-engine` maps
//! records to entities and runs queries. This crate re-exports all three.

pub use stockroom_core::{
    CancellationToken, FieldType, Scalar, StoreConfig, StoreError, StoreResult,
};
pub use stockroom_engine::*;
pub use stockroom_storage::{Document, DocumentStore, Outcome, Record, ROOT_NAME};
