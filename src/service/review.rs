use std::sync::Arc;

use chrono::Utc;

use super::VersionedService;
use crate::error::ServiceError;
use crate::model::{Model, NewEntry, NewReview, Review, ReviewFields, Version};
use crate::store::RecordStore;

/// Review document operations.
///
/// Every entry accepted through this service is stamped with the current
/// time; entries are only ever appended.
#[derive(Clone)]
pub struct ReviewService {
    reviews: VersionedService<Review>,
}

impl ReviewService {
    pub fn new(store: Arc<dyn RecordStore<Review>>) -> Self {
        Self {
            reviews: VersionedService::new(store),
        }
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<Review>, ServiceError> {
        self.reviews.find_by_id(&id.to_string())
    }

    pub fn find_all(&self) -> Result<Vec<Review>, ServiceError> {
        self.reviews.find_all()
    }

    /// The review document for `product_id`, if there is one.
    pub fn find_by_product_id(&self, product_id: i64) -> Result<Option<Review>, ServiceError> {
        Ok(self
            .reviews
            .find(&|review: &Review| review.product_id == product_id)?
            .into_iter()
            .next())
    }

    /// Create a review at version 1 with a store-generated id.
    pub fn save(&self, new_review: NewReview) -> Result<Review, ServiceError> {
        let now = Utc::now();
        let mut review = Review::new(new_review.product_id);
        for entry in new_review.entries {
            review.append(entry, now);
        }
        self.reviews.create(review)
    }

    /// Append entries (and optionally re-target the product) if review `id`
    /// is still at `expected_version`. Re-targeting onto a product that
    /// already has a review is refused with `AlreadyExists`.
    pub fn update(
        &self,
        id: &str,
        expected_version: Version,
        fields: ReviewFields,
    ) -> Result<Review, ServiceError> {
        let now = Utc::now();
        self.reviews
            .update(&id.to_string(), expected_version, |review| {
                // One review document per product.
                if let Some(target) = fields.product_id.filter(|t| *t != review.product_id) {
                    if let Some(existing) = self.find_by_product_id(target)? {
                        return Err(ServiceError::AlreadyExists {
                            collection: Review::COLLECTION,
                            id: existing.id,
                        });
                    }
                }
                fields.apply_to(review, now);
                Ok(())
            })
    }

    /// Append one entry to the review for `product_id`, creating the review
    /// when the product has none yet.
    pub fn add_entry(&self, product_id: i64, entry: NewEntry) -> Result<Review, ServiceError> {
        let now = Utc::now();
        match self.find_by_product_id(product_id)? {
            Some(review) => self.reviews.commit(review, |review| {
                review.append(entry, now);
                Ok(())
            }),
            None => {
                let mut review = Review::new(product_id);
                review.append(entry, now);
                self.reviews.create(review)
            }
        }
    }

    pub fn delete(&self, id: &str) -> Result<(), ServiceError> {
        self.reviews.delete(&id.to_string())
    }
}
