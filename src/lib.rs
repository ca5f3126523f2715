//! Product, review and inventory services with version-checked updates.
//!
//! Every entity carries a version that starts at 1 and grows by one on each
//! accepted update. Clients read the version from the `ETag` header and send
//! it back in `If-Match`; an update against any other version is refused
//! with a conflict and leaves the stored entity untouched.
//!
//! Layers, bottom-up:
//!
//! - [`model`]: the entities and the [`Model`] trait the stores work with.
//! - [`store`]: the [`RecordStore`] capability plus in-memory and SQLite
//!   implementations.
//! - [`service`]: the shared [`VersionedService`] protocol and the
//!   per-entity services.
//! - `http` (feature `http`): axum routers and [`http::serve`].

pub mod config;
pub mod error;
pub mod model;
pub mod service;
pub mod store;

#[cfg(feature = "http")]
pub mod http;

pub use config::{Backend, ConfigError, ServiceConfig, StoreConfig};
pub use error::ServiceError;
pub use model::{
    InventoryRecord, Model, NewEntry, NewReview, Product, ProductFields, PurchaseRecord,
    RecordId, Review, ReviewEntry, ReviewFields, Version, INITIAL_VERSION,
};
pub use service::{InventoryService, ProductService, ReviewService, VersionedService};
pub use store::{InMemoryStore, RecordStore, StoreError};
#[cfg(feature = "sqlite")]
pub use store::{SqlRecord, SqliteStore};
