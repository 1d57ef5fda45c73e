use super::non_negative;
use crate::entity::{Entity, RecordReader, Validate};
use crate::schema::{Field, FieldRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stockroom_core::{FieldType, StoreResult};
use stockroom_storage::Record;

/// Purchase order for one product from one supplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Engine-assigned identifier
    pub id: i64,
    /// Units ordered
    pub quantity: i64,
    /// Stamped by the engine at creation; updates keep the stored value
    pub order_date: DateTime<Utc>,
    /// Free-form status, e.g. "pending"
    pub status: String,
    /// Logical reference to `Product::id`, not enforced
    pub product_id: i64,
    /// Logical reference to `Supplier::id`, not enforced
    pub supplier_id: i64,
}

/// Input for creating an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    /// Units ordered
    pub quantity: i64,
    /// Free-form status
    pub status: String,
    /// Logical reference to `Product::id`
    pub product_id: i64,
    /// Logical reference to `Supplier::id`
    pub supplier_id: i64,
}

impl Validate for NewOrder {
    fn validate(&self) -> StoreResult<()> {
        non_negative("quantity", self.quantity)
    }
}

impl Validate for Order {
    fn validate(&self) -> StoreResult<()> {
        non_negative("quantity", self.quantity)
    }
}

impl Entity for Order {
    type New = NewOrder;

    const COLLECTION: &'static str = "orders";

    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "id",
            ty: FieldType::Int,
            get: |o| FieldRef::Int(o.id),
        },
        Field {
            name: "quantity",
            ty: FieldType::Int,
            get: |o| FieldRef::Int(o.quantity),
        },
        Field {
            name: "orderDate",
            ty: FieldType::Timestamp,
            get: |o| FieldRef::Timestamp(o.order_date),
        },
        Field {
            name: "status",
            ty: FieldType::Text,
            get: |o| FieldRef::Text(&o.status),
        },
        Field {
            name: "productId",
            ty: FieldType::Int,
            get: |o| FieldRef::Int(o.product_id),
        },
        Field {
            name: "supplierId",
            ty: FieldType::Int,
            get: |o| FieldRef::Int(o.supplier_id),
        },
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn assign(id: i64, input: NewOrder) -> Self {
        Order {
            id,
            quantity: input.quantity,
            order_date: Utc::now(),
            status: input.status,
            product_id: input.product_id,
            supplier_id: input.supplier_id,
        }
    }

    fn from_record(record: &Record) -> StoreResult<Self> {
        let r = RecordReader::new(Self::COLLECTION, record);
        Ok(Order {
            id: r.int("id")?,
            quantity: r.int("quantity")?,
            order_date: r.timestamp("orderDate")?,
            status: r.text("status")?,
            product_id: r.int("productId")?,
            supplier_id: r.int("supplierId")?,
        })
    }

    fn keep_assigned(self, stored: &Self) -> Self {
        Order {
            order_date: stored.order_date,
            ..self
        }
    }
}
