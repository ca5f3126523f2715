use thiserror::Error;

use crate::model::Version;
use crate::store::StoreError;

/// Outcome of a service operation that did not succeed.
///
/// Store-level failures are wrapped in [`ServiceError::Store`]; everything
/// else is a domain outcome the HTTP layer maps to a status code.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The record is absent, or vanished before a conditional write landed.
    #[error("{collection}:{id} not found")]
    NotFound { collection: &'static str, id: String },

    /// The caller's expected version is not the stored version.
    #[error("version conflict on {collection}:{id} (expected version {expected}, actual {actual})")]
    VersionConflict {
        collection: &'static str,
        id: String,
        expected: Version,
        actual: Version,
    },

    /// A delete of a record that was just read did not remove exactly one record.
    #[error("delete of {collection}:{id} did not affect exactly one record")]
    DeleteFailed { collection: &'static str, id: String },

    /// A record with the same key already exists.
    #[error("{collection}:{id} already exists")]
    AlreadyExists { collection: &'static str, id: String },

    #[error("insufficient stock for product {product_id} (requested {requested}, available {available})")]
    InsufficientStock {
        product_id: i64,
        requested: i64,
        available: i64,
    },

    /// The request was rejected before touching the store.
    #[error("invalid request: {0}")]
    Invalid(String),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { collection, id } => {
                ServiceError::AlreadyExists { collection, id }
            }
            other => ServiceError::Store(other),
        }
    }
}
