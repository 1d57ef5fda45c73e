//! In-memory document tree
//!
//! A document is one root (`"source"`) holding named collections; each
//! collection is an ordered list of records; each record is an ordered list
//! of named scalar fields. Order is preserved everywhere so a decode/encode
//! round trip is lossless.

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use stockroom_core::Scalar;

/// Required name of the document root
pub const ROOT_NAME: &str = "source";

// =============================================================================
// Record
// =============================================================================

/// One entity instance: ordered named scalars
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, Scalar)>,
}

impl Record {
    /// Empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Record::set`].
    pub fn with(mut self, name: &str, value: impl Into<Scalar>) -> Self {
        self.set(name, value);
        self
    }

    /// Field value by exact name.
    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Overwrite a field in place, or append it if absent.
    pub fn set(&mut self, name: &str, value: impl Into<Scalar>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(field, _)| field == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    /// Fields in document order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a record object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
        let mut record = Record::new();
        while let Some((name, value)) = access.next_entry::<String, Scalar>()? {
            if record.get(&name).is_some() {
                return Err(de::Error::custom(format!("duplicate field '{}'", name)));
            }
            record.fields.push((name, value));
        }
        Ok(record)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}

// =============================================================================
// Collection
// =============================================================================

/// Named, ordered group of records
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    name: String,
    /// Records in insertion order
    pub records: Vec<Record>,
}

impl Collection {
    /// Empty collection called `name`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            records: Vec::new(),
        }
    }

    /// Collection name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

// =============================================================================
// Document
// =============================================================================

/// The whole persisted tree
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    collections: Vec<Collection>,
}

impl Document {
    /// Root with no collections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Root with one empty collection, the bootstrap shape.
    pub fn with_collection(name: &str) -> Self {
        let mut doc = Self::new();
        doc.ensure_collection(name);
        doc
    }

    /// Collection by name.
    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.name == name)
    }

    /// Mutable collection by name.
    pub fn collection_mut(&mut self, name: &str) -> Option<&mut Collection> {
        self.collections.iter_mut().find(|c| c.name == name)
    }

    /// Append an empty collection unless one exists. Returns true if added.
    pub fn ensure_collection(&mut self, name: &str) -> bool {
        if self.collection(name).is_some() {
            return false;
        }
        self.collections.push(Collection::new(name));
        true
    }

    /// All collections in document order.
    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }
}

struct CollectionsRef<'a>(&'a [Collection]);

impl Serialize for CollectionsRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for collection in self.0 {
            map.serialize_entry(&collection.name, &collection.records)?;
        }
        map.end()
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(ROOT_NAME, &CollectionsRef(&self.collections))?;
        map.end()
    }
}

struct Collections(Vec<Collection>);

struct CollectionsVisitor;

impl<'de> Visitor<'de> for CollectionsVisitor {
    type Value = Collections;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object of named collections")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Collections, A::Error> {
        let mut collections: Vec<Collection> = Vec::new();
        while let Some((name, records)) = access.next_entry::<String, Vec<Record>>()? {
            if collections.iter().any(|c| c.name == name) {
                return Err(de::Error::custom(format!("duplicate collection '{}'", name)));
            }
            collections.push(Collection { name, records });
        }
        Ok(Collections(collections))
    }
}

impl<'de> Deserialize<'de> for Collections {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CollectionsVisitor)
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = Document;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "an object with a single '{}' root", ROOT_NAME)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Document, A::Error> {
        let root = match access.next_key::<String>()? {
            Some(root) => root,
            None => return Err(de::Error::custom("document has no root")),
        };
        if root != ROOT_NAME {
            return Err(de::Error::custom(format!(
                "expected root '{}', found '{}'",
                ROOT_NAME, root
            )));
        }
        let Collections(collections) = access.next_value()?;
        if let Some(extra) = access.next_key::<String>()? {
            return Err(de::Error::custom(format!(
                "document has more than one root (extra '{}')",
                extra
            )));
        }
        Ok(Document { collections })
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DocumentVisitor)
    }
}
