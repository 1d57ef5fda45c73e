//! Per-collection services
//!
//! Each service wraps a [`Repository`](crate::repository::Repository) for
//! CRUD and adds the cross-collection queries centered on its entity.
//! Queries load the document once and join over that single snapshot.

mod category;
mod order;
mod product;
mod supplier;

pub use category::CategoryService;
pub use order::OrderService;
pub use product::ProductService;
pub use supplier::SupplierService;

/// Forward the five CRUD operations to `self.repo`.
macro_rules! crud {
    ($entity:ty, $new:ty) => {
        /// Insert a new record under the next free id.
        pub fn create(
            &self,
            input: $new,
            cancel: &stockroom_core::CancellationToken,
        ) -> stockroom_core::StoreResult<$entity> {
            self.repo.create(input, cancel)
        }

        /// Every record, in insertion order.
        pub fn get_all(&self) -> stockroom_core::StoreResult<Vec<$entity>> {
            self.repo.get_all()
        }

        /// The record with `id`, if any.
        pub fn get_by_id(&self, id: i64) -> stockroom_core::StoreResult<Option<$entity>> {
            self.repo.get_by_id(id)
        }

        /// Overwrite the record with the same id; `None` if absent.
        pub fn update(
            &self,
            entity: $entity,
            cancel: &stockroom_core::CancellationToken,
        ) -> stockroom_core::StoreResult<Option<$entity>> {
            self.repo.update(entity, cancel)
        }

        /// Remove the record with `id`; `false` if absent.
        pub fn delete(
            &self,
            id: i64,
            cancel: &stockroom_core::CancellationToken,
        ) -> stockroom_core::StoreResult<bool> {
            self.repo.delete(id, cancel)
        }
    };
}

pub(crate) use crud;
