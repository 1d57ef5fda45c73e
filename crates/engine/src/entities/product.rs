use super::non_negative;
use crate::entity::{Entity, RecordReader, Validate};
use crate::schema::{Field, FieldRef};
use serde::{Deserialize, Serialize};
use stockroom_core::{FieldType, StoreError, StoreResult};
use stockroom_storage::Record;

/// Stocked product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Engine-assigned identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Unit price
    pub price: f64,
    /// Units in stock
    pub quantity: i64,
    /// Logical reference to `Category::id`, not enforced
    pub category_id: i64,
}

/// Input for creating a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Unit price
    pub price: f64,
    /// Units in stock
    pub quantity: i64,
    /// Logical reference to `Category::id`
    pub category_id: i64,
}

/// One row of the product → category → order → supplier join
///
/// A product appears once per order placed for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetails {
    /// Product id
    pub id: i64,
    /// Product name
    pub name: String,
    /// Product description
    pub description: String,
    /// Product unit price
    pub price: f64,
    /// Product units in stock
    pub quantity: i64,
    /// Category id
    pub category_id: i64,
    /// Category name
    pub category_name: String,
    /// Category description
    pub category_description: String,
    /// Supplier id of the order
    pub supplier_id: i64,
    /// Supplier name
    pub supplier_name: String,
    /// Supplier contact person
    pub contact_person: String,
    /// Supplier email
    pub email: String,
    /// Supplier phone
    pub phone: String,
}

/// A product together with how many orders reference it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductOrderCount {
    /// The product
    pub product: Product,
    /// Orders whose `productId` points at it
    pub order_count: usize,
}

fn check_stock(price: f64, quantity: i64) -> StoreResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(StoreError::validation(format!(
            "price must be a non-negative number (got {})",
            price
        )));
    }
    non_negative("quantity", quantity)
}

impl Validate for NewProduct {
    fn validate(&self) -> StoreResult<()> {
        check_stock(self.price, self.quantity)
    }
}

impl Validate for Product {
    fn validate(&self) -> StoreResult<()> {
        check_stock(self.price, self.quantity)
    }
}

impl Entity for Product {
    type New = NewProduct;

    const COLLECTION: &'static str = "products";

    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "id",
            ty: FieldType::Int,
            get: |p| FieldRef::Int(p.id),
        },
        Field {
            name: "name",
            ty: FieldType::Text,
            get: |p| FieldRef::Text(&p.name),
        },
        Field {
            name: "description",
            ty: FieldType::Text,
            get: |p| FieldRef::Text(&p.description),
        },
        Field {
            name: "price",
            ty: FieldType::Decimal,
            get: |p| FieldRef::Decimal(p.price),
        },
        Field {
            name: "quantity",
            ty: FieldType::Int,
            get: |p| FieldRef::Int(p.quantity),
        },
        Field {
            name: "categoryId",
            ty: FieldType::Int,
            get: |p| FieldRef::Int(p.category_id),
        },
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn assign(id: i64, input: NewProduct) -> Self {
        Product {
            id,
            name: input.name,
            description: input.description,
            price: input.price,
            quantity: input.quantity,
            category_id: input.category_id,
        }
    }

    fn from_record(record: &Record) -> StoreResult<Self> {
        let r = RecordReader::new(Self::COLLECTION, record);
        Ok(Product {
            id: r.int("id")?,
            name: r.text("name")?,
            description: r.text("description")?,
            price: r.decimal("price")?,
            quantity: r.int("quantity")?,
            category_id: r.int("categoryId")?,
        })
    }
}
