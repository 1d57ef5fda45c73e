use super::crud;
use crate::entities::{NewOrder, Order};
use crate::query::{paginate, Filter};
use crate::repository::Repository;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use stockroom_core::StoreResult;
use stockroom_storage::DocumentStore;

/// Orders and the queries over them
#[derive(Clone)]
pub struct OrderService {
    repo: Repository<Order>,
}

impl OrderService {
    /// Service over `store`; bootstraps the orders collection.
    pub fn new(store: Arc<DocumentStore>) -> StoreResult<Self> {
        let repo = Repository::new(store)?;
        Ok(Self { repo })
    }

    /// Service over a store already bootstrapped with every collection.
    pub(crate) fn attached(store: Arc<DocumentStore>) -> Self {
        Self {
            repo: Repository::attached(store),
        }
    }

    crud!(Order, NewOrder);

    /// Orders from one supplier with exactly this status.
    pub fn by_supplier_and_status(
        &self,
        supplier_id: i64,
        status: &str,
    ) -> StoreResult<Vec<Order>> {
        Filter::new()
            .eq("supplierId", supplier_id)
            .eq("status", status)
            .apply(self.repo.get_all()?)
    }

    /// Orders placed within `start..=end`. Empty if `start > end`.
    pub fn by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<Order>> {
        Filter::new()
            .between("orderDate", start, end)
            .apply(self.repo.get_all()?)
    }

    /// One page of orders in insertion order.
    pub fn page(&self, page: i64, page_size: i64) -> StoreResult<Vec<Order>> {
        Ok(paginate(self.repo.get_all()?, page, page_size))
    }
}
