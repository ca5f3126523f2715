//! Record stores - the persistence capability every service is built on.
//!
//! A store keeps one collection of [`Model`]s and exposes exactly the
//! operations the services need. Writes after creation go through
//! [`RecordStore::conditional_update`], a compare-and-swap on the stored
//! version, so a read-compare-write sequence cannot lose an update.
//!
//! Two implementations ship with the crate:
//!
//! - [`InMemoryStore`] keeps JSON documents (reviews, tests).
//! - [`SqliteStore`] maps rows of a relational table (products, inventory).

mod in_memory;
#[cfg(feature = "sqlite")]
mod sqlite;

use thiserror::Error;

use crate::model::{Model, Version};

pub use in_memory::InMemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::{SqlRecord, SqliteStore};

/// Error type for record store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),

    #[error("record already exists: {collection}:{id}")]
    DuplicateKey { collection: &'static str, id: String },

    #[error("document serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("storage error: {0}")]
    Storage(String),
}

/// CRUD capability over one collection of models.
pub trait RecordStore<M: Model>: Send + Sync {
    /// Get a record by id. Returns `None` if not found.
    fn get(&self, id: &M::Id) -> Result<Option<M>, StoreError>;

    /// All records. Document stores list them in insertion order, SQL
    /// stores in key order.
    fn list(&self) -> Result<Vec<M>, StoreError>;

    /// Insert a new record and return it as stored. An unassigned id is
    /// generated by the store; an assigned one must not exist yet.
    fn insert(&self, model: M) -> Result<M, StoreError>;

    /// Replace the stored record with `model` if, and only if, the stored
    /// version still equals `expected_version`. Returns whether a record
    /// was written.
    fn conditional_update(&self, model: &M, expected_version: Version) -> Result<bool, StoreError>;

    /// Delete a record by id. Returns true if it existed.
    fn delete(&self, id: &M::Id) -> Result<bool, StoreError>;

    /// Records matching a predicate.
    fn find(&self, predicate: &dyn Fn(&M) -> bool) -> Result<Vec<M>, StoreError> {
        Ok(self.list()?.into_iter().filter(|m| predicate(m)).collect())
    }
}
