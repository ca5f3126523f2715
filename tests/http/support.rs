use std::sync::Arc;

use axum::Router;
use catalog_services::{
    http, InMemoryStore, InventoryRecord, InventoryService, Product, ProductService, RecordStore,
    Review, ReviewService,
};

/// Bind to port 0 and return the base URL.
pub async fn start_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A product store holding "Widget" (id 2) at version 2.
pub fn seeded_products() -> Arc<InMemoryStore<Product>> {
    let store = Arc::new(InMemoryStore::new());
    store
        .insert(Product {
            id: 2,
            name: "Widget".into(),
            quantity: 5,
            version: 2,
        })
        .unwrap();
    store
}

pub async fn product_server(store: Arc<InMemoryStore<Product>>) -> String {
    start_server(http::product_app(ProductService::new(store))).await
}

pub async fn review_server() -> String {
    let service = ReviewService::new(Arc::new(InMemoryStore::<Review>::new()));
    start_server(http::review_app(service)).await
}

/// An inventory service with 10 units of product 1 at version 1.
pub fn stocked_inventory() -> InventoryService {
    let service = InventoryService::new(Arc::new(InMemoryStore::<InventoryRecord>::new()));
    service
        .stock(InventoryRecord::new(1, 10, "Product 1", "Great Products"))
        .unwrap();
    service
}

pub async fn inventory_server() -> String {
    start_server(http::inventory_app(stocked_inventory())).await
}

pub fn etag(resp: &reqwest::Response) -> &str {
    resp.headers()[reqwest::header::ETAG].to_str().unwrap()
}

pub fn location(resp: &reqwest::Response) -> &str {
    resp.headers()[reqwest::header::LOCATION].to_str().unwrap()
}
