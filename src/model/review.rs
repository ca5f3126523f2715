//! Review documents and their append-only entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Model, Version};

/// One user's review of a product. Owned by a [`Review`] and never edited
/// once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub username: String,
    pub date: DateTime<Utc>,
    pub review: String,
}

/// The review document for a single product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default)]
    pub id: String,
    pub product_id: i64,
    #[serde(default)]
    pub version: Version,
    #[serde(default)]
    pub entries: Vec<ReviewEntry>,
}

impl Review {
    /// An empty, unsaved review for `product_id`.
    pub fn new(product_id: i64) -> Self {
        Self {
            id: String::new(),
            product_id,
            version: 0,
            entries: Vec::new(),
        }
    }

    /// Append an entry stamped with `date`.
    pub fn append(&mut self, entry: NewEntry, date: DateTime<Utc>) {
        self.entries.push(entry.stamped(date));
    }
}

/// An entry as submitted by a client. The server supplies the date, so a
/// client-sent `date` is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub username: String,
    pub review: String,
}

impl NewEntry {
    pub fn new(username: impl Into<String>, review: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            review: review.into(),
        }
    }

    pub fn stamped(self, date: DateTime<Utc>) -> ReviewEntry {
        ReviewEntry {
            username: self.username,
            date,
            review: self.review,
        }
    }
}

/// Body of `POST /reviews`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub product_id: i64,
    #[serde(default)]
    pub entries: Vec<NewEntry>,
}

/// Body of `PUT /reviews/{id}`: entries to append and an optional new
/// product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewFields {
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub entries: Vec<NewEntry>,
}

impl ReviewFields {
    pub fn apply_to(self, review: &mut Review, date: DateTime<Utc>) {
        if let Some(product_id) = self.product_id {
            review.product_id = product_id;
        }
        for entry in self.entries {
            review.append(entry, date);
        }
    }
}

impl Model for Review {
    type Id = String;
    const COLLECTION: &'static str = "reviews";

    fn id(&self) -> &String {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }
}
