//! Typed field accessor tables
//!
//! Every entity declares its fields once: name on disk, declared type, and
//! an accessor returning the typed value. Sorting and filtering by a field
//! chosen at call time resolve the name against this table, so an unknown
//! name is an `InvalidQueryField` error and comparisons never coerce types.

use crate::entity::Entity;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use stockroom_core::{FieldType, Scalar, StoreError, StoreResult};

/// A field value borrowed out of an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRef<'a> {
    /// Integer field
    Int(i64),
    /// String field
    Text(&'a str),
    /// Decimal field
    Decimal(f64),
    /// Timestamp field
    Timestamp(DateTime<Utc>),
}

impl<'a> FieldRef<'a> {
    /// Declared type of this value.
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldRef::Int(_) => FieldType::Int,
            FieldRef::Text(_) => FieldType::Text,
            FieldRef::Decimal(_) => FieldType::Decimal,
            FieldRef::Timestamp(_) => FieldType::Timestamp,
        }
    }

    /// Read `scalar` as a value of type `ty`.
    pub fn from_scalar(ty: FieldType, scalar: &'a Scalar) -> Option<Self> {
        match ty {
            FieldType::Int => scalar.as_int().map(FieldRef::Int),
            FieldType::Text => scalar.as_text().map(FieldRef::Text),
            FieldType::Decimal => scalar.as_decimal().map(FieldRef::Decimal),
            FieldType::Timestamp => scalar.as_timestamp().map(FieldRef::Timestamp),
        }
    }

    /// Owned scalar for writing into a record.
    pub fn to_scalar(&self) -> Scalar {
        match self {
            FieldRef::Int(v) => Scalar::Int(*v),
            FieldRef::Text(v) => Scalar::Text((*v).to_string()),
            FieldRef::Decimal(v) => Scalar::Float(*v),
            FieldRef::Timestamp(v) => Scalar::timestamp(*v),
        }
    }

    /// Total order within one type: ordinal for strings, numeric for
    /// numbers, chronological for timestamps.
    ///
    /// Values of different types are ordered by type; field resolution
    /// makes sure that never happens for a well-formed query.
    pub fn compare(&self, other: &FieldRef<'_>) -> Ordering {
        match (self, other) {
            (FieldRef::Int(a), FieldRef::Int(b)) => a.cmp(b),
            (FieldRef::Text(a), FieldRef::Text(b)) => a.cmp(b),
            (FieldRef::Decimal(a), FieldRef::Decimal(b)) => a.total_cmp(b),
            (FieldRef::Timestamp(a), FieldRef::Timestamp(b)) => a.cmp(b),
            _ => type_rank(self.field_type()).cmp(&type_rank(other.field_type())),
        }
    }
}

fn type_rank(ty: FieldType) -> u8 {
    match ty {
        FieldType::Int => 0,
        FieldType::Decimal => 1,
        FieldType::Text => 2,
        FieldType::Timestamp => 3,
    }
}

/// One entry of an entity's field table
pub struct Field<E> {
    /// Field name as stored in the document
    pub name: &'static str,
    /// Declared type
    pub ty: FieldType,
    /// Typed accessor
    pub get: fn(&E) -> FieldRef<'_>,
}

impl<E> std::fmt::Debug for Field<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .finish()
    }
}

/// Resolve a caller-supplied field name for `E`, ignoring ASCII case.
pub fn resolve<E: Entity>(name: &str) -> StoreResult<&'static Field<E>> {
    E::FIELDS
        .iter()
        .find(|field| field.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| StoreError::invalid_field(E::COLLECTION, name))
}
