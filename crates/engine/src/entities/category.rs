use crate::entity::{Entity, RecordReader, Validate};
use crate::schema::{Field, FieldRef};
use serde::{Deserialize, Serialize};
use stockroom_core::{FieldType, StoreResult};
use stockroom_storage::Record;

/// Product category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Engine-assigned identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
}

/// Input for creating a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
}

/// A category together with how many products reference it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryWithCount {
    /// The category
    pub category: Category,
    /// Products whose `categoryId` points at it (always at least 1)
    pub product_count: usize,
}

impl Validate for NewCategory {
    fn validate(&self) -> StoreResult<()> {
        Ok(())
    }
}

impl Validate for Category {
    fn validate(&self) -> StoreResult<()> {
        Ok(())
    }
}

impl Entity for Category {
    type New = NewCategory;

    const COLLECTION: &'static str = "categories";

    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "id",
            ty: FieldType::Int,
            get: |c| FieldRef::Int(c.id),
        },
        Field {
            name: "name",
            ty: FieldType::Text,
            get: |c| FieldRef::Text(&c.name),
        },
        Field {
            name: "description",
            ty: FieldType::Text,
            get: |c| FieldRef::Text(&c.description),
        },
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn assign(id: i64, input: NewCategory) -> Self {
        Category {
            id,
            name: input.name,
            description: input.description,
        }
    }

    fn from_record(record: &Record) -> StoreResult<Self> {
        let r = RecordReader::new(Self::COLLECTION, record);
        Ok(Category {
            id: r.int("id")?,
            name: r.text("name")?,
            description: r.text("description")?,
        })
    }
}
