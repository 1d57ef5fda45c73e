//! Shared test utilities for the integration suites.
//!
//! Import via `mod common;` from a suite's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::path::{Path, PathBuf};
use std::time::Duration;
pub use stockroom::{
    CancellationToken, Category, NewCategory, NewOrder, NewProduct, NewSupplier, Order, Product,
    SortOrder, Stockroom, StoreConfig, StoreError, Supplier,
};
use tempfile::TempDir;

/// A stockroom over a fresh temporary file.
pub struct TestStockroom {
    pub stockroom: Stockroom,
    pub dir: TempDir,
    pub cancel: CancellationToken,
}

impl TestStockroom {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let stockroom = Stockroom::open(config_for(&dir)).expect("open");
        Self {
            stockroom,
            dir,
            cancel: CancellationToken::new(),
        }
    }

    /// Path of the backing document.
    pub fn path(&self) -> PathBuf {
        self.stockroom.store().path().to_path_buf()
    }

    /// A second, independent stockroom over the same file.
    pub fn reopen(&self) -> Stockroom {
        Stockroom::open(config_for(&self.dir)).expect("reopen")
    }

    pub fn category(&self, name: &str) -> Category {
        self.stockroom
            .categories()
            .create(
                NewCategory {
                    name: name.into(),
                    description: format!("{} goods", name),
                },
                &self.cancel,
            )
            .expect("create category")
    }

    pub fn product(&self, name: &str, quantity: i64, category_id: i64) -> Product {
        self.stockroom
            .products()
            .create(
                NewProduct {
                    name: name.into(),
                    description: String::new(),
                    price: 9.99,
                    quantity,
                    category_id,
                },
                &self.cancel,
            )
            .expect("create product")
    }

    pub fn supplier(&self, name: &str) -> Supplier {
        self.stockroom
            .suppliers()
            .create(
                NewSupplier {
                    name: name.into(),
                    contact_person: format!("{} desk", name),
                    email: format!("orders@{}.example", name.to_lowercase()),
                    phone: "555-0100".into(),
                },
                &self.cancel,
            )
            .expect("create supplier")
    }

    pub fn order(&self, product_id: i64, supplier_id: i64, status: &str) -> Order {
        self.stockroom
            .orders()
            .create(
                NewOrder {
                    quantity: 2,
                    status: status.into(),
                    product_id,
                    supplier_id,
                },
                &self.cancel,
            )
            .expect("create order")
    }
}

/// Config for `stock.json` inside `dir`, with fsync off to keep tests fast.
pub fn config_for(dir: &TempDir) -> StoreConfig {
    StoreConfig::new(dir.path().join("stock.json")).with_sync_writes(false)
}

/// Config with a short lock timeout for contention tests.
pub fn impatient_config(path: &Path) -> StoreConfig {
    StoreConfig::new(path)
        .with_sync_writes(false)
        .with_lock_timeout(Duration::from_millis(50))
}
