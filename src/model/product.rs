use serde::{Deserialize, Serialize};

use super::{Model, Version};

/// A catalog product. Stored in the relational `products` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    #[serde(default)]
    pub version: Version,
}

impl Product {
    /// An unsaved product. The store assigns the id, the service the version.
    pub fn new(name: impl Into<String>, quantity: i64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            quantity,
            version: 0,
        }
    }
}

/// Client-writable product fields, used as the body of create and update
/// requests. Any `id` or `version` in the body is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFields {
    pub name: String,
    pub quantity: i64,
}

impl ProductFields {
    pub fn apply_to(self, product: &mut Product) {
        product.name = self.name;
        product.quantity = self.quantity;
    }
}

impl From<ProductFields> for Product {
    fn from(fields: ProductFields) -> Self {
        Product::new(fields.name, fields.quantity)
    }
}

impl Model for Product {
    type Id = i64;
    const COLLECTION: &'static str = "products";

    fn id(&self) -> &i64 {
        &self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }
}
