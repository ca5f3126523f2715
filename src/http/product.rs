use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

use super::error::ApiError;
use super::headers::{if_match, if_none_match, versioned};
use crate::model::{Model, Product, ProductFields};
use crate::service::ProductService;

const REQUEST_MAPPING: &str = "/products";

pub(super) fn routes(service: ProductService) -> Router {
    Router::new()
        .route(REQUEST_MAPPING, get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(service)
}

fn location(product: &Product) -> String {
    format!("{REQUEST_MAPPING}/{}", product.id)
}

async fn list_products(State(service): State<ProductService>) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(service.find_all()?))
}

async fn get_product(
    State(service): State<ProductService>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let product = service
        .find_by_id(id)?
        .ok_or_else(|| ApiError::not_found(Product::COLLECTION, id))?;

    if if_none_match(&headers) == Some(product.version) {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }
    versioned(StatusCode::OK, &product, product.version, &location(&product))
}

async fn create_product(
    State(service): State<ProductService>,
    payload: Result<Json<ProductFields>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(fields) = payload?;
    info!(name = %fields.name, "creating product");
    let product = service.save(fields)?;
    versioned(StatusCode::CREATED, &product, product.version, &location(&product))
}

async fn update_product(
    State(service): State<ProductService>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    payload: Result<Json<ProductFields>, JsonRejection>,
) -> Result<Response, ApiError> {
    let expected = if_match(&headers)?;
    let Json(fields) = payload?;
    info!(id, expected, "updating product");
    let product = service.update(id, expected, fields)?;
    versioned(StatusCode::OK, &product, product.version, &location(&product))
}

async fn delete_product(
    State(service): State<ProductService>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    info!(id, "deleting product");
    service.delete(id)?;
    Ok(StatusCode::OK)
}
