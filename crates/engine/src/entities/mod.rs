//! Entity types
//!
//! One module per collection: the stored entity, its create input, its
//! field table, and the result rows of the queries that center on it.

mod category;
mod order;
mod product;
mod supplier;

pub use category::{Category, CategoryWithCount, NewCategory};
pub use order::{NewOrder, Order};
pub use product::{NewProduct, Product, ProductDetails, ProductOrderCount};
pub use supplier::{NewSupplier, Supplier};

use stockroom_core::{StoreError, StoreResult};

fn non_negative(field: &str, value: i64) -> StoreResult<()> {
    if value < 0 {
        return Err(StoreError::validation(format!(
            "{} must not be negative (got {})",
            field, value
        )));
    }
    Ok(())
}
