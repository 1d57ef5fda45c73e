//! Stockroom: one backing document, four services
//!
//! ## Design: THIN WRAPPER
//!
//! `Stockroom` opens a single [`DocumentStore`] and hands the same handle to
//! every service, so all of them share one lock and one file. It keeps no
//! state of its own; dropping it closes nothing that needs closing.

use crate::entities::{Category, Order, Product, Supplier};
use crate::entity::Entity;
use crate::services::{CategoryService, OrderService, ProductService, SupplierService};
use std::sync::Arc;
use stockroom_core::{StoreConfig, StoreResult};
use stockroom_storage::DocumentStore;
use tracing::info;

/// Entry point: the four collection services over one document
#[derive(Clone)]
pub struct Stockroom {
    store: Arc<DocumentStore>,
    categories: CategoryService,
    products: ProductService,
    suppliers: SupplierService,
    orders: OrderService,
}

impl Stockroom {
    /// Open (creating if needed) the document at `config.path`.
    ///
    /// All four collections exist on disk when this returns, created in the
    /// order categories, products, suppliers, orders.
    ///
    /// # Errors
    ///
    /// * `CorruptDocument` - the file exists but is malformed
    /// * `StorageUnavailable` - the file or its lock cannot be acquired
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        let store = Arc::new(DocumentStore::open(config)?);
        for collection in [
            Category::COLLECTION,
            Product::COLLECTION,
            Supplier::COLLECTION,
            Order::COLLECTION,
        ] {
            store.bootstrap(collection)?;
        }
        let stockroom = Self {
            categories: CategoryService::attached(Arc::clone(&store)),
            products: ProductService::attached(Arc::clone(&store)),
            suppliers: SupplierService::attached(Arc::clone(&store)),
            orders: OrderService::attached(Arc::clone(&store)),
            store,
        };
        info!(target: "stockroom::store", path = %stockroom.store.path().display(), "Stockroom opened");
        Ok(stockroom)
    }

    /// Shared store handle.
    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }

    /// Category operations.
    pub fn categories(&self) -> &CategoryService {
        &self.categories
    }

    /// Product operations.
    pub fn products(&self) -> &ProductService {
        &self.products
    }

    /// Supplier operations.
    pub fn suppliers(&self) -> &SupplierService {
        &self.suppliers
    }

    /// Order operations.
    pub fn orders(&self) -> &OrderService {
        &self.orders
    }
}

impl std::fmt::Debug for Stockroom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stockroom").field("store", &self.store).finish()
    }
}
