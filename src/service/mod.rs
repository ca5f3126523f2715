//! Domain services - the layer between the HTTP controllers and the stores.
//!
//! [`VersionedService`] implements the version-checked update protocol
//! once for every model; the per-entity services wrap it with the
//! operations their controllers expose.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use catalog_services::{InMemoryStore, Product, ProductFields, ProductService};
//!
//! let service = ProductService::new(Arc::new(InMemoryStore::<Product>::new()));
//! let product = service.save(ProductFields { name: "Widget".into(), quantity: 10 })?;
//! assert_eq!(product.version, 1);
//!
//! let updated = service.update(product.id, 1, ProductFields { name: "Gadget".into(), quantity: 9 })?;
//! assert_eq!(updated.version, 2);
//! ```

mod inventory;
mod product;
mod review;
mod versioned;

pub use inventory::InventoryService;
pub use product::ProductService;
pub use review::ReviewService;
pub use versioned::VersionedService;
