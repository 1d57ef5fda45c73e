//! Query engine and services for stockroom
//!
//! This crate builds the typed layer over the storage crate:
//! - Entities: categories, products, suppliers, orders and their field tables
//! - Repository: generic CRUD with max+1 id assignment
//! - Query: filters, inner joins, group counts, dynamic sort, pagination
//! - Services: per-collection facades with the cross-collection queries
//! - Stockroom: opens one document and all four services
//!
//! The engine is the only component that knows about:
//! - Collection names and on-disk field names
//! - Which fields are engine-assigned (`id`, `orderDate`)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entities;
pub mod entity;
pub mod query;
pub mod repository;
pub mod schema;
pub mod services;
pub mod stockroom;

pub use entities::{
    Category, CategoryWithCount, NewCategory, NewOrder, NewProduct, NewSupplier, Order, Product,
    ProductDetails, ProductOrderCount, Supplier,
};
pub use entity::{Entity, Validate};
pub use query::{group_count, inner_join, paginate, sort_by_field, Filter, SortOrder};
pub use repository::Repository;
pub use schema::{Field, FieldRef};
pub use services::{CategoryService, OrderService, ProductService, SupplierService};
pub use stockroom::Stockroom;
