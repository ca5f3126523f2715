use std::sync::Arc;

use super::VersionedService;
use crate::error::ServiceError;
use crate::model::{Product, ProductFields, Version};
use crate::store::RecordStore;

/// Product operations. Lookups and deletes go straight to the store;
/// creation pins the version, updates are version-checked.
#[derive(Clone)]
pub struct ProductService {
    products: VersionedService<Product>,
}

impl ProductService {
    pub fn new(store: Arc<dyn RecordStore<Product>>) -> Self {
        Self {
            products: VersionedService::new(store),
        }
    }

    pub fn find_by_id(&self, id: i64) -> Result<Option<Product>, ServiceError> {
        self.products.find_by_id(&id)
    }

    pub fn find_all(&self) -> Result<Vec<Product>, ServiceError> {
        self.products.find_all()
    }

    /// Create a product at version 1 with a store-generated id.
    pub fn save(&self, fields: ProductFields) -> Result<Product, ServiceError> {
        self.products.create(Product::from(fields))
    }

    /// Overwrite name and quantity of product `id` if it is still at
    /// `expected_version`.
    pub fn update(
        &self,
        id: i64,
        expected_version: Version,
        fields: ProductFields,
    ) -> Result<Product, ServiceError> {
        self.products.update(&id, expected_version, |product| {
            fields.apply_to(product);
            Ok(())
        })
    }

    pub fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.products.delete(&id)
    }
}
