use super::crud;
use crate::entities::{Category, CategoryWithCount, NewCategory, Product};
use crate::entity::{decode_all, Entity};
use crate::query::{group_count, inner_join};
use crate::repository::Repository;
use std::sync::Arc;
use stockroom_core::StoreResult;
use stockroom_storage::DocumentStore;

/// Categories and the queries grouped by category
#[derive(Clone)]
pub struct CategoryService {
    repo: Repository<Category>,
}

impl CategoryService {
    /// Service over `store`; bootstraps the collections it reads.
    pub fn new(store: Arc<DocumentStore>) -> StoreResult<Self> {
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

    crud!(Category, NewCategory);

    /// Categories that have at least one product, each with its product
    /// count, in category order.
    pub fn with_product_counts(&self) -> StoreResult<Vec<CategoryWithCount>> {
        self.repo.store().read(|doc| {
            let categories = decode_all::<Category>(doc)?;
            let products = decode_all::<Product>(doc)?;
            let rows = inner_join(
                categories.iter(),
                &products,
                |c: &&Category| c.id,
                |p: &Product| p.category_id,
            );
            Ok(group_count(rows, |(c, _): &(&Category, &Product)| c.id)
                .into_iter()
                .map(|((category, _), product_count)| CategoryWithCount {
                    category: category.clone(),
                    product_count,
                })
                .collect())
        })
    }
}
