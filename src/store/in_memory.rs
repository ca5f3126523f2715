//! InMemoryStore - HashMap-backed document store.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{RecordStore, StoreError};
use crate::model::{Model, RecordId, Version};

/// Internal stored representation of a document.
struct StoredDocument {
    bytes: Vec<u8>,
    version: Version,
    position: u64,
}

struct Collection<K> {
    documents: HashMap<K, StoredDocument>,
    /// Highest row number handed out or observed, for integer keys.
    sequence: u64,
    /// Insertion counter, used to list documents in insertion order.
    inserted: u64,
}

/// In-memory document store backed by a HashMap.
///
/// Models are kept as serialized JSON documents, so a read always hands
/// out a fresh copy. Version check and replacement in
/// [`conditional_update`](RecordStore::conditional_update) happen under a
/// single write lock. Clone-friendly via Arc.
pub struct InMemoryStore<M: Model> {
    storage: Arc<RwLock<Collection<M::Id>>>,
    _marker: PhantomData<fn() -> M>,
}

impl<M: Model> Clone for InMemoryStore<M> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            _marker: PhantomData,
        }
    }
}

impl<M: Model> Default for InMemoryStore<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> InMemoryStore<M> {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(Collection {
                documents: HashMap::new(),
                sequence: 0,
                inserted: 0,
            })),
            _marker: PhantomData,
        }
    }

    /// Number of stored documents.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read("len")?.documents.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    fn read(&self, operation: &'static str) -> Result<RwLockReadGuard<'_, Collection<M::Id>>, StoreError> {
        self.storage
            .read()
            .map_err(|_| StoreError::LockPoisoned(operation))
    }

    fn write(&self, operation: &'static str) -> Result<RwLockWriteGuard<'_, Collection<M::Id>>, StoreError> {
        self.storage
            .write()
            .map_err(|_| StoreError::LockPoisoned(operation))
    }
}

impl<M: Model> RecordStore<M> for InMemoryStore<M> {
    fn get(&self, id: &M::Id) -> Result<Option<M>, StoreError> {
        let storage = self.read("get")?;
        match storage.documents.get(id) {
            Some(stored) => Ok(Some(serde_json::from_slice(&stored.bytes)?)),
            None => Ok(None),
        }
    }

    fn list(&self) -> Result<Vec<M>, StoreError> {
        let storage = self.read("list")?;
        let mut stored: Vec<&StoredDocument> = storage.documents.values().collect();
        stored.sort_by_key(|s| s.position);
        stored
            .into_iter()
            .map(|s| serde_json::from_slice(&s.bytes).map_err(StoreError::from))
            .collect()
    }

    fn insert(&self, mut model: M) -> Result<M, StoreError> {
        let mut storage = self.write("insert")?;

        if model.id().is_unassigned() {
            storage.sequence += 1;
            model.set_id(M::Id::generate(storage.sequence));
        }

        if storage.documents.contains_key(model.id()) {
            return Err(StoreError::DuplicateKey {
                collection: M::COLLECTION,
                id: model.id().to_string(),
            });
        }

        if let Some(sequence) = model.id().sequence() {
            storage.sequence = storage.sequence.max(sequence);
        }

        let bytes = serde_json::to_vec(&model)?;
        let position = storage.inserted;
        storage.inserted += 1;
        storage.documents.insert(
            model.id().clone(),
            StoredDocument {
                bytes,
                version: model.version(),
                position,
            },
        );

        Ok(model)
    }

    fn conditional_update(&self, model: &M, expected_version: Version) -> Result<bool, StoreError> {
        let bytes = serde_json::to_vec(model)?;
        let mut storage = self.write("conditional_update")?;

        match storage.documents.get_mut(model.id()) {
            Some(stored) if stored.version == expected_version => {
                stored.bytes = bytes;
                stored.version = model.version();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn delete(&self, id: &M::Id) -> Result<bool, StoreError> {
        let mut storage = self.write("delete")?;
        Ok(storage.documents.remove(id).is_some())
    }
}
