//! The version-checked update protocol shared by every service.
//!
//! 1. Read the stored record. Missing -> `NotFound`.
//! 2. Compare the caller's expected version with the stored one by exact
//!    equality. Different -> `VersionConflict`, nothing written.
//! 3. Apply the change to the copy, bump its version by one and write it
//!    back with [`RecordStore::conditional_update`] keyed on the observed
//!    version.
//! 4. If the write touched nothing, re-read: a vanished record is
//!    `NotFound`, a record that moved on is `VersionConflict`.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::ServiceError;
use crate::model::{Model, Version, INITIAL_VERSION};
use crate::store::RecordStore;

/// CRUD over one model type with version-checked writes.
pub struct VersionedService<M: Model> {
    store: Arc<dyn RecordStore<M>>,
}

impl<M: Model> Clone for VersionedService<M> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<M: Model> VersionedService<M> {
    pub fn new(store: Arc<dyn RecordStore<M>>) -> Self {
        Self { store }
    }

    pub fn find_by_id(&self, id: &M::Id) -> Result<Option<M>, ServiceError> {
        Ok(self.store.get(id)?)
    }

    pub fn find_all(&self) -> Result<Vec<M>, ServiceError> {
        Ok(self.store.list()?)
    }

    pub fn find(&self, predicate: &dyn Fn(&M) -> bool) -> Result<Vec<M>, ServiceError> {
        Ok(self.store.find(predicate)?)
    }

    /// Store a new record at [`INITIAL_VERSION`], whatever version it carries.
    pub fn create(&self, mut model: M) -> Result<M, ServiceError> {
        model.set_version(INITIAL_VERSION);
        let saved = self.store.insert(model)?;
        info!(collection = M::COLLECTION, id = %saved.id(), "created");
        Ok(saved)
    }

    /// Apply `change` to the record `id` if its stored version is
    /// `expected_version`.
    pub fn update<F>(&self, id: &M::Id, expected_version: Version, change: F) -> Result<M, ServiceError>
    where
        F: FnOnce(&mut M) -> Result<(), ServiceError>,
    {
        let current = self.store.get(id)?.ok_or_else(|| not_found::<M>(id))?;

        info!(
            collection = M::COLLECTION,
            id = %id,
            stored = current.version(),
            if_match = expected_version,
            "version check"
        );
        if current.version() != expected_version {
            warn!(collection = M::COLLECTION, id = %id, "update rejected, version mismatch");
            return Err(ServiceError::VersionConflict {
                collection: M::COLLECTION,
                id: id.to_string(),
                expected: expected_version,
                actual: current.version(),
            });
        }

        self.commit(current, change)
    }

    /// Apply `change` to a record the caller has already read and write it
    /// back, provided nobody else wrote it in between.
    ///
    /// `change` may reject the update, in which case nothing is written.
    pub fn commit<F>(&self, mut observed: M, change: F) -> Result<M, ServiceError>
    where
        F: FnOnce(&mut M) -> Result<(), ServiceError>,
    {
        let observed_version = observed.version();
        change(&mut observed)?;
        observed.set_version(observed_version + 1);

        if self.store.conditional_update(&observed, observed_version)? {
            info!(
                collection = M::COLLECTION,
                id = %observed.id(),
                version = observed.version(),
                "updated"
            );
            return Ok(observed);
        }

        match self.store.get(observed.id())? {
            None => Err(not_found::<M>(observed.id())),
            Some(stored) => {
                warn!(
                    collection = M::COLLECTION,
                    id = %observed.id(),
                    "concurrent write won the race"
                );
                Err(ServiceError::VersionConflict {
                    collection: M::COLLECTION,
                    id: observed.id().to_string(),
                    expected: observed_version,
                    actual: stored.version(),
                })
            }
        }
    }

    /// Delete a record that must exist.
    pub fn delete(&self, id: &M::Id) -> Result<(), ServiceError> {
        if self.store.get(id)?.is_none() {
            return Err(not_found::<M>(id));
        }

        if !self.store.delete(id)? {
            return Err(ServiceError::DeleteFailed {
                collection: M::COLLECTION,
                id: id.to_string(),
            });
        }

        info!(collection = M::COLLECTION, id = %id, "deleted");
        Ok(())
    }
}

fn not_found<M: Model>(id: &M::Id) -> ServiceError {
    ServiceError::NotFound {
        collection: M::COLLECTION,
        id: id.to_string(),
    }
}
