//! HTTP transport for the catalog services.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `GET /products`, `POST /products`, `GET|PUT|DELETE /products/:id`
//! - `GET /reviews[?productId=]`, `POST /reviews`, `GET|PUT|DELETE /reviews/:id`,
//!   `POST /reviews/:id/entries` (`:id` is the product id here)
//! - `GET /inventory/:id`, `POST /inventory`, `POST /inventory/purchase-record`
//! - `GET /health` on every app: `{ "status": "ok", "service": "<name>" }`
//!
//! Entity responses carry `ETag: "<version>"` and `Location`. `PUT` requires
//! `If-Match`; `GET` honours `If-None-Match` with `304 Not Modified`.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use catalog_services::{http, InMemoryStore, Product, ProductService};
//!
//! let products = ProductService::new(Arc::new(InMemoryStore::<Product>::new()));
//! http::serve(http::product_app(products), "0.0.0.0:8080").await?;
//! ```

mod error;
mod headers;
mod inventory;
mod product;
mod review;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tracing::info;

use crate::service::{InventoryService, ProductService, ReviewService};

pub use error::ApiError;
pub use headers::{etag, if_match, if_none_match};

/// Add `GET /health` to `routes`, reporting `service` as the app name.
pub fn with_health(routes: Router, service: &'static str) -> Router {
    routes.route(
        "/health",
        get(move || async move { Json(json!({ "status": "ok", "service": service })) }),
    )
}

/// The product service app.
pub fn product_app(service: ProductService) -> Router {
    with_health(product::routes(service), "product")
}

/// The review service app.
pub fn review_app(service: ReviewService) -> Router {
    with_health(review::routes(service), "review")
}

/// The inventory service app.
pub fn inventory_app(service: InventoryService) -> Router {
    with_health(inventory::routes(service), "inventory")
}

/// All three services behind one listener.
pub fn catalog_app(
    products: ProductService,
    reviews: ReviewService,
    inventory: InventoryService,
) -> Router {
    let routes = product::routes(products)
        .merge(review::routes(reviews))
        .merge(inventory::routes(inventory));
    with_health(routes, "catalog")
}

/// Serve `app` over HTTP at the given address (e.g. `"0.0.0.0:8080"`).
pub async fn serve(app: Router, addr: &str) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).await
}
