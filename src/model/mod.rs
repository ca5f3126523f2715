//! Models - the versioned entities served by the catalog services.
//!
//! Every entity carries its own `version`, starting at [`INITIAL_VERSION`]
//! when the service layer creates it and bumped by exactly one on every
//! successful conditional write.
//!
//! ## Example
//!
//! ```ignore
//! use catalog_services::{Model, Product};
//!
//! let mut product = Product::new("Widget", 10);
//! product.set_version(catalog_services::INITIAL_VERSION);
//! assert_eq!(Product::COLLECTION, "products");
//! ```

mod inventory;
mod product;
mod review;

use std::fmt::{Debug, Display};
use std::hash::Hash;

use serde::{de::DeserializeOwned, Serialize};

pub use inventory::{InventoryRecord, PurchaseRecord};
pub use product::{Product, ProductFields};
pub use review::{NewEntry, NewReview, Review, ReviewEntry, ReviewFields};

/// Revision number of a stored entity. Doubles as the HTTP `ETag`.
pub type Version = u64;

/// The version every entity is stored with on creation.
pub const INITIAL_VERSION: Version = 1;

/// Identifier types a record store knows how to key and generate.
pub trait RecordId:
    Clone + Eq + Hash + Debug + Display + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// True when the caller left the key for the store to assign.
    fn is_unassigned(&self) -> bool;

    /// Produce a fresh key. `sequence` is the store's next row number.
    fn generate(sequence: u64) -> Self;

    /// Row number encoded in this key, if any. Stores use it to keep their
    /// sequence ahead of caller-assigned keys.
    fn sequence(&self) -> Option<u64> {
        None
    }
}

impl RecordId for i64 {
    fn is_unassigned(&self) -> bool {
        *self <= 0
    }

    fn generate(sequence: u64) -> Self {
        sequence as i64
    }

    fn sequence(&self) -> Option<u64> {
        u64::try_from(*self).ok()
    }
}

impl RecordId for String {
    fn is_unassigned(&self) -> bool {
        self.is_empty()
    }

    fn generate(_sequence: u64) -> Self {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

/// Trait for entities that can be kept in a record store.
pub trait Model: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Key type of this entity.
    type Id: RecordId;

    /// The collection name for this model type (e.g. "products", "reviews").
    /// Maps to a table in SQL and a document collection otherwise.
    const COLLECTION: &'static str;

    fn id(&self) -> &Self::Id;

    fn set_id(&mut self, id: Self::Id);

    fn version(&self) -> Version;

    fn set_version(&mut self, version: Version);
}
