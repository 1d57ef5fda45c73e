use super::crud;
use crate::entities::{NewSupplier, Order, Product, Supplier};
use crate::entity::{decode_all, Entity};
use crate::query::{inner_join, Filter};
use crate::repository::Repository;
use std::sync::Arc;
use stockroom_core::StoreResult;
use stockroom_storage::DocumentStore;

/// Suppliers and the queries centered on them
#[derive(Clone)]
pub struct SupplierService {
    repo: Repository<Supplier>,
}

impl SupplierService {
    /// Service over `store`; bootstraps the collections it reads.
    pub fn new(store: Arc<DocumentStore>) -> StoreResult<Self> {
        store.bootstrap(Order::COLLECTION)?;
        store.bootstrap(Product::COLLECTION)?;
        let repo = Repository::new(store)?;
        Ok(Self { repo })
    }

    /// Service over a store already bootstrapped with every collection.
    pub(crate) fn attached(store: Arc<DocumentStore>) -> Self {
        Self {
            repo: Repository::attached(store),
        }
    }

    crud!(Supplier, NewSupplier);

    /// Suppliers with an order for a product whose `quantity < max_quantity`.
    ///
    /// One row per such order: a supplier with three matching orders is
    /// listed three times.
    pub fn supplying_low_stock(&self, max_quantity: i64) -> StoreResult<Vec<Supplier>> {
        self.repo.store().read(|doc| {
            let suppliers = decode_all::<Supplier>(doc)?;
            let orders = decode_all::<Order>(doc)?;
            let low = Filter::new()
                .less_than("quantity", max_quantity)
                .apply(decode_all::<Product>(doc)?)?;

            let with_order = inner_join(
                suppliers.iter(),
                &orders,
                |s: &&Supplier| s.id,
                |o: &Order| o.supplier_id,
            );
            let with_product = inner_join(
                with_order,
                &low,
                |(_, o): &(&Supplier, &Order)| o.product_id,
                |p: &Product| p.id,
            );
            Ok(with_product
                .map(|((supplier, _), _)| supplier.clone())
                .collect())
        })
    }
}
