use reqwest::header::{IF_MATCH, IF_NONE_MATCH};
use reqwest::StatusCode;
use serde_json::{json, Value};

use catalog_services::RecordStore;

use crate::support::{etag, location, product_server, seeded_products};

#[tokio::test]
async fn health_check() {
    let base = product_server(seeded_products()).await;

    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "status": "ok", "service": "product" }));
}

#[tokio::test]
async fn create_product() {
    let base = product_server(seeded_products()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/products"))
        .json(&json!({ "name": "Gadget", "quantity": 10, "version": 9 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(etag(&resp), "\"1\"");
    let expected_location = location(&resp).to_string();

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["name"], "Gadget");
    assert_eq!(body["version"], 1);
    assert_eq!(expected_location, format!("/products/{}", body["id"]));
}

#[tokio::test]
async fn get_product_sets_etag_and_location() {
    let base = product_server(seeded_products()).await;

    let resp = reqwest::get(format!("{base}/products/2")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(etag(&resp), "\"2\"");
    assert_eq!(location(&resp), "/products/2");

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "id": 2, "name": "Widget", "quantity": 5, "version": 2 }));
}

#[tokio::test]
async fn get_unknown_product_is_404() {
    let base = product_server(seeded_products()).await;
    let resp = reqwest::get(format!("{base}/products/99")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn if_none_match_current_version_is_304() {
    let base = product_server(seeded_products()).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/products/2"))
        .header(IF_NONE_MATCH, "\"2\"")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);

    let resp = client
        .get(format!("{base}/products/2"))
        .header(IF_NONE_MATCH, "\"1\"")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn update_with_current_version() {
    let store = seeded_products();
    let base = product_server(store.clone()).await;
    let client = reqwest::Client::new();

    let resp = client
        .put(format!("{base}/products/2"))
        .header(IF_MATCH, "2")
        .json(&json!({ "name": "Widget", "quantity": 4 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(etag(&resp), "\"3\"");

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["version"], 3);
    assert_eq!(body["quantity"], 4);
    assert_eq!(store.get(&2).unwrap().unwrap().version, 3);
}

#[tokio::test]
async fn update_with_stale_version_is_409() {
    let store = seeded_products();
    let base = product_server(store.clone()).await;
    let client = reqwest::Client::new();

    let resp = client
        .put(format!("{base}/products/2"))
        .header(IF_MATCH, "\"7\"")
        .json(&json!({ "name": "Changed", "quantity": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert!(resp.text().await.unwrap().is_empty());

    let stored = store.get(&2).unwrap().unwrap();
    assert_eq!(stored.name, "Widget");
    assert_eq!(stored.version, 2);
}

#[tokio::test]
async fn update_without_if_match_is_400() {
    let base = product_server(seeded_products()).await;
    let client = reqwest::Client::new();

    let resp = client
        .put(format!("{base}/products/2"))
        .json(&json!({ "name": "Widget", "quantity": 4 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("If-Match"));
}

#[tokio::test]
async fn update_unknown_product_is_404() {
    let base = product_server(seeded_products()).await;
    let client = reqwest::Client::new();

    let resp = client
        .put(format!("{base}/products/99"))
        .header(IF_MATCH, "1")
        .json(&json!({ "name": "Ghost", "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn concurrent_updates_have_one_winner() {
    let base = product_server(seeded_products()).await;
    let client = reqwest::Client::new();

    let put = |quantity: i64| {
        client
            .put(format!("{base}/products/2"))
            .header(IF_MATCH, "2")
            .json(&json!({ "name": "Widget", "quantity": quantity }))
            .send()
    };
    let (a, b) = tokio::join!(put(1), put(2));
    let mut statuses = [a.unwrap().status(), b.unwrap().status()];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::CONFLICT]);

    let resp = reqwest::get(format!("{base}/products/2")).await.unwrap();
    assert_eq!(etag(&resp), "\"3\"");
}

#[tokio::test]
async fn delete_product() {
    let base = product_server(seeded_products()).await;
    let client = reqwest::Client::new();

    let resp = client.delete(format!("{base}/products/2")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = reqwest::get(format!("{base}/products/2")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client.delete(format!("{base}/products/99")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_products() {
    let base = product_server(seeded_products()).await;
    let client = reqwest::Client::new();

    client
        .post(format!("{base}/products"))
        .json(&json!({ "name": "Gadget", "quantity": 1 }))
        .send()
        .await
        .unwrap();

    let products: Vec<Value> = reqwest::get(format!("{base}/products"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<&str> = products.iter().map(|p| p["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["Widget", "Gadget"]);
}

#[tokio::test]
async fn update_with_missing_field_is_400() {
    let store = seeded_products();
    let base = product_server(store.clone()).await;

    let resp = reqwest::Client::new()
        .put(format!("{base}/products/2"))
        .header(IF_MATCH, "2")
        .json(&json!({ "name": "X" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("quantity"));
    assert_eq!(store.get(&2).unwrap().unwrap().version, 2);
}

#[tokio::test]
async fn create_with_mistyped_field_is_400() {
    let base = product_server(seeded_products()).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/products"))
        .json(&json!({ "name": "Gadget", "quantity": "ten" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn missing_if_match_is_reported_before_a_bad_body() {
    let base = product_server(seeded_products()).await;

    let resp = reqwest::Client::new()
        .put(format!("{base}/products/2"))
        .json(&json!({ "name": "X" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("If-Match"));
}

#[tokio::test]
async fn body_that_is_not_json_is_400() {
    let base = product_server(seeded_products()).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/products"))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());
}
