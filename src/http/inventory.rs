use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::info;

use super::error::ApiError;
use super::headers::{if_none_match, versioned};
use crate::model::{InventoryRecord, Model, PurchaseRecord};
use crate::service::InventoryService;

const REQUEST_MAPPING: &str = "/inventory";

pub(super) fn routes(service: InventoryService) -> Router {
    Router::new()
        .route(REQUEST_MAPPING, post(stock))
        .route("/inventory/purchase-record", post(purchase_product))
        .route("/inventory/:id", get(get_inventory_record))
        .with_state(service)
}

fn location(record: &InventoryRecord) -> String {
    format!("{REQUEST_MAPPING}/{}", record.product_id)
}

async fn get_inventory_record(
    State(service): State<InventoryService>,
    Path(product_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let record = service
        .get_inventory_record(product_id)?
        .ok_or_else(|| ApiError::not_found(InventoryRecord::COLLECTION, product_id))?;

    if if_none_match(&headers) == Some(record.version) {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }
    versioned(StatusCode::OK, &record, record.version, &location(&record))
}

async fn stock(
    State(service): State<InventoryService>,
    payload: Result<Json<InventoryRecord>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(record) = payload?;
    info!(product_id = record.product_id, quantity = record.quantity, "stocking product");
    let record = service.stock(record)?;
    versioned(StatusCode::CREATED, &record, record.version, &location(&record))
}

async fn purchase_product(
    State(service): State<InventoryService>,
    payload: Result<Json<PurchaseRecord>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(purchase) = payload?;
    info!(
        product_id = purchase.product_id,
        quantity = purchase.quantity_purchased,
        "purchasing product"
    );
    let record = service.purchase_product(purchase)?;
    versioned(StatusCode::OK, &record, record.version, &location(&record))
}
