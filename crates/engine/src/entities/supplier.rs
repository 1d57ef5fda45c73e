use crate::entity::{Entity, RecordReader, Validate};
use crate::schema::{Field, FieldRef};
use serde::{Deserialize, Serialize};
use stockroom_core::{FieldType, StoreResult};
use stockroom_storage::Record;

/// Supplier fulfilling orders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    /// Engine-assigned identifier
    pub id: i64,
    /// Company name
    pub name: String,
    /// Person to talk to
    pub contact_person: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
}

/// Input for creating a supplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSupplier {
    /// Company name
    pub name: String,
    /// Person to talk to
    pub contact_person: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
}

impl Validate for NewSupplier {
    fn validate(&self) -> StoreResult<()> {
        Ok(())
    }
}

impl Validate for Supplier {
    fn validate(&self) -> StoreResult<()> {
        Ok(())
    }
}

impl Entity for Supplier {
    type New = NewSupplier;

    const COLLECTION: &'static str = "suppliers";

    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "id",
            ty: FieldType::Int,
            get: |s| FieldRef::Int(s.id),
        },
        Field {
            name: "name",
            ty: FieldType::Text,
            get: |s| FieldRef::Text(&s.name),
        },
        Field {
            name: "contactPerson",
            ty: FieldType::Text,
            get: |s| FieldRef::Text(&s.contact_person),
        },
        Field {
            name: "email",
            ty: FieldType::Text,
            get: |s| FieldRef::Text(&s.email),
        },
        Field {
            name: "phone",
            ty: FieldType::Text,
            get: |s| FieldRef::Text(&s.phone),
        },
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn assign(id: i64, input: NewSupplier) -> Self {
        Supplier {
            id,
            name: input.name,
            contact_person: input.contact_person,
            email: input.email,
            phone: input.phone,
        }
    }

    fn from_record(record: &Record) -> StoreResult<Self> {
        let r = RecordReader::new(Self::COLLECTION, record);
        Ok(Supplier {
            id: r.int("id")?,
            name: r.text("name")?,
            contact_person: r.text("contactPerson")?,
            email: r.text("email")?,
            phone: r.text("phone")?,
        })
    }
}
