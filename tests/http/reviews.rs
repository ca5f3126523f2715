use reqwest::header::{IF_MATCH, IF_NONE_MATCH};
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::support::{etag, location, review_server};

async fn add_entry(base: &str, product_id: i64, username: &str, review: &str) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{base}/reviews/{product_id}/entries"))
        .json(&json!({ "username": username, "review": review }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn first_entry_creates_review() {
    let base = review_server().await;

    let resp = add_entry(&base, 1, "test-user", "Great product").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(etag(&resp), "\"1\"");

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["productId"], 1);
    assert_eq!(body["version"], 1);
    assert_eq!(body["entries"].as_array().unwrap().len(), 1);
    assert_eq!(body["entries"][0]["username"], "test-user");
    assert!(body["entries"][0]["date"].is_string());
}

#[tokio::test]
async fn later_entries_append_to_the_same_review() {
    let base = review_server().await;

    let first: Value = add_entry(&base, 1, "user1", "This is a review").await.json().await.unwrap();
    let resp = add_entry(&base, 1, "test-user", "Great product").await;
    assert_eq!(etag(&resp), "\"2\"");

    let second: Value = resp.json().await.unwrap();
    assert_eq!(second["id"], first["id"]);
    assert_eq!(second["entries"][0]["username"], "user1");
    assert_eq!(second["entries"][1]["username"], "test-user");

    let all: Vec<Value> = reqwest::get(format!("{base}/reviews")).await.unwrap().json().await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn find_by_product_id() {
    let base = review_server().await;
    add_entry(&base, 1, "a", "x").await;
    add_entry(&base, 2, "b", "y").await;

    let reviews: Vec<Value> = reqwest::get(format!("{base}/reviews?productId=2"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["productId"], 2);

    let reviews: Vec<Value> = reqwest::get(format!("{base}/reviews?productId=3"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(reviews.is_empty());
}

#[tokio::test]
async fn create_then_update_review() {
    let base = review_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/reviews"))
        .json(&json!({
            "productId": 7,
            "entries": [{ "username": "a", "review": "first", "date": "2000-01-01T00:00:00Z" }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(etag(&resp), "\"1\"");
    let review_location = location(&resp).to_string();
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(review_location, format!("/reviews/{id}"));
    assert_ne!(created["entries"][0]["date"], "2000-01-01T00:00:00Z");

    let resp = client
        .put(format!("{base}/reviews/{id}"))
        .header(IF_MATCH, "\"1\"")
        .json(&json!({ "entries": [{ "username": "b", "review": "second" }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(etag(&resp), "\"2\"");
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["entries"].as_array().unwrap().len(), 2);

    let resp = client
        .put(format!("{base}/reviews/{id}"))
        .header(IF_MATCH, "\"1\"")
        .json(&json!({ "entries": [{ "username": "c", "review": "late" }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = client
        .get(format!("{base}/reviews/{id}"))
        .header(IF_NONE_MATCH, "\"2\"")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
}

#[tokio::test]
async fn update_without_if_match_is_400() {
    let base = review_server().await;
    let created: Value = add_entry(&base, 1, "a", "x").await.json().await.unwrap();
    let id = created["id"].as_str().unwrap();

    let resp = reqwest::Client::new()
        .put(format!("{base}/reviews/{id}"))
        .json(&json!({ "entries": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_review() {
    let base = review_server().await;
    let client = reqwest::Client::new();

    let resp = reqwest::get(format!("{base}/reviews/missing")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client
        .put(format!("{base}/reviews/missing"))
        .header(IF_MATCH, "1")
        .json(&json!({ "entries": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client.delete(format!("{base}/reviews/missing")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_review() {
    let base = review_server().await;
    let created: Value = add_entry(&base, 1, "a", "x").await.json().await.unwrap();
    let id = created["id"].as_str().unwrap();

    let resp = reqwest::Client::new()
        .delete(format!("{base}/reviews/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = reqwest::get(format!("{base}/reviews/{id}")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn retarget_onto_reviewed_product_is_409() {
    let base = review_server().await;
    add_entry(&base, 1, "a", "x").await;
    let second: Value = add_entry(&base, 2, "b", "y").await.json().await.unwrap();
    let id = second["id"].as_str().unwrap();

    let resp = reqwest::Client::new()
        .put(format!("{base}/reviews/{id}"))
        .header(IF_MATCH, "1")
        .json(&json!({ "productId": 1, "entries": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let reviews: Vec<Value> = reqwest::get(format!("{base}/reviews?productId=2"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["id"], id);
}

#[tokio::test]
async fn entry_without_username_is_400() {
    let base = review_server().await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/reviews/1/entries"))
        .json(&json!({ "review": "no author" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());
}
