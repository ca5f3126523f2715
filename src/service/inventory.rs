use std::sync::Arc;

use super::VersionedService;
use crate::error::ServiceError;
use crate::model::{InventoryRecord, Model, PurchaseRecord, RecordId};
use crate::store::RecordStore;

/// Stock levels per product.
#[derive(Clone)]
pub struct InventoryService {
    records: VersionedService<InventoryRecord>,
}

impl InventoryService {
    pub fn new(store: Arc<dyn RecordStore<InventoryRecord>>) -> Self {
        Self {
            records: VersionedService::new(store),
        }
    }

    pub fn get_inventory_record(&self, product_id: i64) -> Result<Option<InventoryRecord>, ServiceError> {
        self.records.find_by_id(&product_id)
    }

    /// Register stock for a product that has no inventory record yet.
    pub fn stock(&self, record: InventoryRecord) -> Result<InventoryRecord, ServiceError> {
        if record.product_id.is_unassigned() {
            return Err(ServiceError::Invalid(format!(
                "product id must be positive, got {}",
                record.product_id
            )));
        }
        if record.quantity < 0 {
            return Err(ServiceError::Invalid("quantity must not be negative".into()));
        }
        self.records.create(record)
    }

    /// Take `quantity_purchased` units out of stock.
    ///
    /// The decrement is a conditional write on the version that was read, so
    /// two purchases racing for the last units cannot both succeed.
    pub fn purchase_product(&self, purchase: PurchaseRecord) -> Result<InventoryRecord, ServiceError> {
        let PurchaseRecord {
            product_id,
            quantity_purchased,
        } = purchase;
        if quantity_purchased <= 0 {
            return Err(ServiceError::Invalid(format!(
                "quantity purchased must be positive, got {quantity_purchased}"
            )));
        }

        let current = self
            .records
            .find_by_id(&product_id)?
            .ok_or_else(|| ServiceError::NotFound {
                collection: InventoryRecord::COLLECTION,
                id: product_id.to_string(),
            })?;

        self.records.commit(current, |record| {
            if record.quantity < quantity_purchased {
                return Err(ServiceError::InsufficientStock {
                    product_id,
                    requested: quantity_purchased,
                    available: record.quantity,
                });
            }
            record.quantity -= quantity_purchased;
            Ok(())
        })
    }
}
