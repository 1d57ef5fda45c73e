//! Entity trait and record mapping
//!
//! An entity is the typed view of one record in one collection. The
//! [`Entity::FIELDS`] table drives encoding, sorting and filtering; decoding
//! goes through [`RecordReader`] so a missing or mistyped field is reported
//! as `CorruptDocument` naming the collection and field.

use crate::schema::Field;
use chrono::{DateTime, Utc};
use stockroom_core::{FieldType, Scalar, StoreError, StoreResult};
use stockroom_storage::{Collection, Document, Record};

/// Name of the identifier field in every collection
pub const ID_FIELD: &str = "id";

/// Basic shape checks on caller input
pub trait Validate {
    /// `Err(Validation)` if the value is obviously malformed.
    fn validate(&self) -> StoreResult<()>;
}

/// A record type stored in one named collection
pub trait Entity: Clone + Sized + Validate + 'static {
    /// Caller input for `create` (everything but engine-assigned fields)
    type New: Validate;

    /// Collection name in the document
    const COLLECTION: &'static str;

    /// Field table, in on-disk order
    const FIELDS: &'static [Field<Self>];

    /// Record identifier.
    fn id(&self) -> i64;

    /// Build the entity for a fresh id, stamping engine-assigned fields.
    fn assign(id: i64, input: Self::New) -> Self;

    /// Decode from a stored record.
    fn from_record(record: &Record) -> StoreResult<Self>;

    /// Carry engine-assigned fields over from the stored version on update.
    fn keep_assigned(self, _stored: &Self) -> Self {
        self
    }

    /// Encode into a record, fields in table order.
    fn to_record(&self) -> Record {
        let mut record = Record::new();
        for field in Self::FIELDS {
            record.set(field.name, (field.get)(self).to_scalar());
        }
        record
    }
}

/// Typed field access on a record with collection-aware errors
pub struct RecordReader<'a> {
    collection: &'static str,
    record: &'a Record,
}

impl<'a> RecordReader<'a> {
    /// Reader for a record of `collection`.
    pub fn new(collection: &'static str, record: &'a Record) -> Self {
        Self { collection, record }
    }

    fn scalar(&self, name: &str) -> StoreResult<&'a Scalar> {
        self.record.get(name).ok_or_else(|| {
            StoreError::corrupt(format!(
                "record in '{}' is missing field '{}'",
                self.collection, name
            ))
        })
    }

    /// Integer field.
    pub fn int(&self, name: &str) -> StoreResult<i64> {
        self.scalar(name)?
            .as_int()
            .ok_or_else(|| self.mistyped(name, FieldType::Int))
    }

    /// Decimal field.
    pub fn decimal(&self, name: &str) -> StoreResult<f64> {
        self.scalar(name)?
            .as_decimal()
            .ok_or_else(|| self.mistyped(name, FieldType::Decimal))
    }

    /// String field.
    pub fn text(&self, name: &str) -> StoreResult<String> {
        self.scalar(name)?
            .as_text()
            .map(str::to_string)
            .ok_or_else(|| self.mistyped(name, FieldType::Text))
    }

    /// Timestamp field.
    pub fn timestamp(&self, name: &str) -> StoreResult<DateTime<Utc>> {
        self.scalar(name)?
            .as_timestamp()
            .ok_or_else(|| self.mistyped(name, FieldType::Timestamp))
    }

    fn mistyped(&self, name: &str, ty: FieldType) -> StoreError {
        StoreError::corrupt(format!(
            "field '{}' in '{}' is not a valid {}",
            name, self.collection, ty
        ))
    }
}

/// The record's id, or `CorruptDocument` if it has none.
pub fn record_id(collection: &'static str, record: &Record) -> StoreResult<i64> {
    RecordReader::new(collection, record).int(ID_FIELD)
}

/// The collection for `E`, or `CorruptDocument` if bootstrap never ran.
pub fn collection_of<E: Entity>(doc: &Document) -> StoreResult<&Collection> {
    doc.collection(E::COLLECTION).ok_or_else(|| missing_collection(E::COLLECTION))
}

/// Mutable form of [`collection_of`].
pub fn collection_of_mut<E: Entity>(doc: &mut Document) -> StoreResult<&mut Collection> {
    doc.collection_mut(E::COLLECTION)
        .ok_or_else(|| missing_collection(E::COLLECTION))
}

/// Decode every record of `E`'s collection, in document order.
pub fn decode_all<E: Entity>(doc: &Document) -> StoreResult<Vec<E>> {
    collection_of::<E>(doc)?
        .records
        .iter()
        .map(E::from_record)
        .collect()
}

fn missing_collection(name: &str) -> StoreError {
    StoreError::corrupt(format!("document has no '{}' collection", name))
}
