//! Generic collection repository
//!
//! ## Design: STATELESS FACADE
//!
//! `Repository<E>` holds only the shared `DocumentStore`. No caches: every
//! call loads the whole document, and mutations run as one locked
//! load-modify-persist unit.
//!
//! ## Identifiers
//!
//! A new record gets `max(existing ids) + 1`, or 1 in an empty collection.
//! Deleting a record below the current maximum never frees its id. Deleting
//! the current maximum lowers the maximum, so the next create hands that id
//! out again.
//!
//! ## Absence
//!
//! Lookups of a missing id return `None`/`false` and never write.

use crate::entity::{collection_of, collection_of_mut, decode_all, record_id, Entity, Validate};
use std::marker::PhantomData;
use std::sync::Arc;
use stockroom_core::{CancellationToken, StoreError, StoreResult};
use stockroom_storage::{DocumentStore, Outcome, Record};
use tracing::debug;

/// CRUD over the collection of `E`
pub struct Repository<E: Entity> {
    store: Arc<DocumentStore>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    /// Repository over `store`; bootstraps `E`'s collection.
    pub fn new(store: Arc<DocumentStore>) -> StoreResult<Self> {
        store.bootstrap(E::COLLECTION)?;
        Ok(Self::attached(store))
    }

    /// Repository over a store whose document already holds `E`'s
    /// collection. Does not touch the file.
    pub fn attached(store: Arc<DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Shared store handle.
    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }

    /// Insert a record built from `input` under the next free id.
    pub fn create(&self, input: E::New, cancel: &CancellationToken) -> StoreResult<E> {
        input.validate()?;
        let created = self.store.mutate(cancel, |doc| {
            let collection = collection_of_mut::<E>(doc)?;
            let id = next_id::<E>(&collection.records)?;
            let entity = E::assign(id, input);
            collection.records.push(entity.to_record());
            Ok(Outcome::Commit(entity))
        })?;
        debug!(target: "stockroom::repo", collection = E::COLLECTION, id = created.id(), "Created record");
        Ok(created)
    }

    /// Every record, in insertion order.
    pub fn get_all(&self) -> StoreResult<Vec<E>> {
        self.store.read(decode_all::<E>)
    }

    /// First record with `id`.
    pub fn get_by_id(&self, id: i64) -> StoreResult<Option<E>> {
        let found = self.store.read(|doc| {
            let records = &collection_of::<E>(doc)?.records;
            match position::<E>(records, id)? {
                Some(index) => E::from_record(&records[index]).map(Some),
                None => Ok(None),
            }
        })?;
        if found.is_none() {
            debug!(target: "stockroom::repo", collection = E::COLLECTION, id, "Record not found");
        }
        Ok(found)
    }

    /// Overwrite the caller-supplied fields of the record with `entity.id()`.
    ///
    /// Fields are set in place, so field order and any extra fields on the
    /// stored record survive. Engine-assigned fields keep their stored value.
    /// Returns the record as stored, or `None` (and no write) if absent.
    pub fn update(&self, entity: E, cancel: &CancellationToken) -> StoreResult<Option<E>> {
        entity.validate()?;
        let id = entity.id();
        let updated = self.store.mutate(cancel, |doc| {
            let records = &mut collection_of_mut::<E>(doc)?.records;
            let index = match position::<E>(records, id)? {
                Some(index) => index,
                None => return Ok(Outcome::Skip(None)),
            };
            let stored = E::from_record(&records[index])?;
            let merged = entity.keep_assigned(&stored);
            let record = &mut records[index];
            for (name, value) in merged.to_record().fields() {
                record.set(name, value.clone());
            }
            Ok(Outcome::Commit(Some(merged)))
        })?;
        match &updated {
            Some(_) => debug!(target: "stockroom::repo", collection = E::COLLECTION, id, "Updated record"),
            None => debug!(target: "stockroom::repo", collection = E::COLLECTION, id, "Update skipped, record not found"),
        }
        Ok(updated)
    }

    /// Remove the record with `id`. Returns whether one was removed.
    pub fn delete(&self, id: i64, cancel: &CancellationToken) -> StoreResult<bool> {
        let removed = self.store.mutate(cancel, |doc| {
            let records = &mut collection_of_mut::<E>(doc)?.records;
            match position::<E>(records, id)? {
                Some(index) => {
                    records.remove(index);
                    Ok(Outcome::Commit(true))
                }
                None => Ok(Outcome::Skip(false)),
            }
        })?;
        debug!(target: "stockroom::repo", collection = E::COLLECTION, id, removed, "Delete finished");
        Ok(removed)
    }
}

/// `max(ids) + 1`, or 1 for an empty collection.
fn next_id<E: Entity>(records: &[Record]) -> StoreResult<i64> {
    let mut max: i64 = 0;
    for record in records {
        max = max.max(record_id(E::COLLECTION, record)?);
    }
    max.checked_add(1).ok_or_else(|| {
        StoreError::validation(format!("id space exhausted in '{}'", E::COLLECTION))
    })
}

/// Index of the first record whose id is `id`.
///
/// Records without a readable id are corrupt; scanning stops at the first
/// match so a later malformed record does not hide an earlier hit.
fn position<E: Entity>(records: &[Record], id: i64) -> StoreResult<Option<usize>> {
    for (index, record) in records.iter().enumerate() {
        if record_id(E::COLLECTION, record)? == id {
            return Ok(Some(index));
        }
    }
    Ok(None)
}
