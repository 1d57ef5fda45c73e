use super::crud;
use crate::entities::{
    Category, NewProduct, Order, Product, ProductDetails, ProductOrderCount, Supplier,
};
use crate::entity::{decode_all, Entity};
use crate::query::{group_count, inner_join, paginate, sort_by_field, Filter, SortOrder};
use crate::repository::Repository;
use std::sync::Arc;
use stockroom_core::StoreResult;
use stockroom_storage::{Document, DocumentStore};
use tracing::debug;

/// Products and the queries centered on them
#[derive(Clone)]
pub struct ProductService {
    repo: Repository<Product>,
}

impl ProductService {
    /// Service over `store`; bootstraps the collections it reads.
    pub fn new(store: Arc<DocumentStore>) -> StoreResult<Self> {
        store.bootstrap(Category::COLLECTION)?;
        store.bootstrap(Order::COLLECTION)?;
        store.bootstrap(Supplier::COLLECTION)?;
        let repo = Repository::new(store)?;
        Ok(Self { repo })
    }

    /// Service over a store already bootstrapped with every collection.
    pub(crate) fn attached(store: Arc<DocumentStore>) -> Self {
        Self {
            repo: Repository::attached(store),
        }
    }

    crud!(Product, NewProduct);

    /// Products of one category, sorted by the field named `sort_by`.
    ///
    /// # Errors
    ///
    /// `InvalidQueryField` if `sort_by` is not a product field.
    pub fn by_category(
        &self,
        category_id: i64,
        sort_by: &str,
        order: SortOrder,
    ) -> StoreResult<Vec<Product>> {
        let filter = Filter::new().eq("categoryId", category_id);
        let mut products = filter.apply(self.repo.get_all()?)?;
        sort_by_field(&mut products, sort_by, order)?;
        debug!(target: "stockroom::repo", category_id, sort_by, count = products.len(), "Products by category");
        Ok(products)
    }

    /// Products with `quantity < max_quantity`.
    pub fn below_quantity(&self, max_quantity: i64) -> StoreResult<Vec<Product>> {
        Filter::new()
            .less_than("quantity", max_quantity)
            .apply(self.repo.get_all()?)
    }

    /// Join rows for one product: one row per order placed for it.
    ///
    /// Empty if the product does not exist or has no orders.
    pub fn details(&self, product_id: i64) -> StoreResult<Vec<ProductDetails>> {
        self.repo.store().read(|doc| {
            let products = Filter::new()
                .eq("id", product_id)
                .apply(decode_all::<Product>(doc)?)?;
            detail_rows(&products, doc)
        })
    }

    /// One page of the join rows over every product.
    pub fn details_page(&self, page: i64, page_size: i64) -> StoreResult<Vec<ProductDetails>> {
        self.repo.store().read(|doc| {
            let products = decode_all::<Product>(doc)?;
            Ok(paginate(detail_rows(&products, doc)?, page, page_size))
        })
    }

    /// Products with at least `min_orders` orders, most ordered first.
    pub fn most_ordered(&self, min_orders: usize) -> StoreResult<Vec<ProductOrderCount>> {
        self.repo.store().read(|doc| {
            let products = decode_all::<Product>(doc)?;
            let orders = decode_all::<Order>(doc)?;
            let rows = inner_join(
                products.iter(),
                &orders,
                |p: &&Product| p.id,
                |o: &Order| o.product_id,
            );
            let mut counts: Vec<ProductOrderCount> =
                group_count(rows, |(p, _): &(&Product, &Order)| p.id)
                    .into_iter()
                    .filter(|(_, count)| *count >= min_orders)
                    .map(|((product, _), order_count)| ProductOrderCount {
                        product: product.clone(),
                        order_count,
                    })
                    .collect();
            counts.sort_by(|a, b| b.order_count.cmp(&a.order_count));
            Ok(counts)
        })
    }
}

/// product → category → order → supplier, in that order.
fn detail_rows(products: &[Product], doc: &Document) -> StoreResult<Vec<ProductDetails>> {
    let categories = decode_all::<Category>(doc)?;
    let orders = decode_all::<Order>(doc)?;
    let suppliers = decode_all::<Supplier>(doc)?;

    let with_category = inner_join(
        products.iter(),
        &categories,
        |p: &&Product| p.category_id,
        |c: &Category| c.id,
    );
    let with_order = inner_join(
        with_category,
        &orders,
        |(p, _): &(&Product, &Category)| p.id,
        |o: &Order| o.product_id,
    );
    let with_supplier = inner_join(
        with_order,
        &suppliers,
        |(_, o): &((&Product, &Category), &Order)| o.supplier_id,
        |s: &Supplier| s.id,
    );

    Ok(with_supplier
        .map(|(((product, category), _), supplier)| ProductDetails {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            quantity: product.quantity,
            category_id: category.id,
            category_name: category.name.clone(),
            category_description: category.description.clone(),
            supplier_id: supplier.id,
            supplier_name: supplier.name.clone(),
            contact_person: supplier.contact_person.clone(),
            email: supplier.email.clone(),
            phone: supplier.phone.clone(),
        })
        .collect())
}
