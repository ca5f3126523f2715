use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use super::error::ApiError;
use super::headers::{if_match, if_none_match, versioned};
use crate::model::{Model, NewEntry, NewReview, Review, ReviewFields};
use crate::service::ReviewService;

const REQUEST_MAPPING: &str = "/reviews";

pub(super) fn routes(service: ReviewService) -> Router {
    Router::new()
        .route(REQUEST_MAPPING, get(list_reviews).post(create_review))
        .route(
            "/reviews/:id",
            get(get_review).put(update_review).delete(delete_review),
        )
        .route("/reviews/:id/entries", post(add_entry))
        .with_state(service)
}

fn location(review: &Review) -> String {
    format!("{REQUEST_MAPPING}/{}", review.id)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewQuery {
    product_id: Option<i64>,
}

async fn list_reviews(
    State(service): State<ReviewService>,
    Query(query): Query<ReviewQuery>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let reviews = match query.product_id {
        Some(product_id) => service.find_by_product_id(product_id)?.into_iter().collect(),
        None => service.find_all()?,
    };
    Ok(Json(reviews))
}

async fn get_review(
    State(service): State<ReviewService>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let review = service
        .find_by_id(&id)?
        .ok_or_else(|| ApiError::not_found(Review::COLLECTION, &id))?;

    if if_none_match(&headers) == Some(review.version) {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }
    versioned(StatusCode::OK, &review, review.version, &location(&review))
}

async fn create_review(
    State(service): State<ReviewService>,
    payload: Result<Json<NewReview>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(new_review) = payload?;
    info!(product_id = new_review.product_id, "creating review");
    let review = service.save(new_review)?;
    versioned(StatusCode::CREATED, &review, review.version, &location(&review))
}

async fn update_review(
    State(service): State<ReviewService>,
    Path(id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<ReviewFields>, JsonRejection>,
) -> Result<Response, ApiError> {
    let expected = if_match(&headers)?;
    let Json(fields) = payload?;
    info!(%id, expected, "updating review");
    let review = service.update(&id, expected, fields)?;
    versioned(StatusCode::OK, &review, review.version, &location(&review))
}

/// `POST /reviews/:id/entries`: `:id` names the product being reviewed.
async fn add_entry(
    State(service): State<ReviewService>,
    Path(product_id): Path<i64>,
    payload: Result<Json<NewEntry>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(entry) = payload?;
    info!(product_id, username = %entry.username, "adding review entry");
    let review = service.add_entry(product_id, entry)?;
    versioned(StatusCode::OK, &review, review.version, &location(&review))
}

async fn delete_review(
    State(service): State<ReviewService>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!(%id, "deleting review");
    service.delete(&id)?;
    Ok(StatusCode::OK)
}
