use serde::{Deserialize, Serialize};

use super::{Model, Version};

/// Stock on hand for one product, keyed by the product's id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    pub product_id: i64,
    pub quantity: i64,
    pub product_name: String,
    pub product_category: String,
    #[serde(default)]
    pub version: Version,
}

impl InventoryRecord {
    pub fn new(
        product_id: i64,
        quantity: i64,
        product_name: impl Into<String>,
        product_category: impl Into<String>,
    ) -> Self {
        Self {
            product_id,
            quantity,
            product_name: product_name.into(),
            product_category: product_category.into(),
            version: 0,
        }
    }
}

/// Body of `POST /inventory/purchase-record`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    pub product_id: i64,
    pub quantity_purchased: i64,
}

impl Model for InventoryRecord {
    type Id = i64;
    const COLLECTION: &'static str = "inventory";

    fn id(&self) -> &i64 {
        &self.product_id
    }

    fn set_id(&mut self, id: i64) {
        self.product_id = id;
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }
}
