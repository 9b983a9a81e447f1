//! End-to-end tests of the content API over HTTP
//!
//! These tests drive the full router (prefix, handlers, validation, error
//! bodies) with in-memory storage.

use axum::http::StatusCode;
use axum_test::TestServer;
use pulpit::prelude::*;
use serde_json::{Value, json};

// =============================================================================
// Test Server Setup
// =============================================================================

fn create_test_server() -> TestServer {
    let app = ServerBuilder::new()
        .register::<Sermon>(InMemoryDataService::new())
        .register::<Devotion>(InMemoryDataService::new())
        .register::<GalleryImage>(InMemoryDataService::new())
        .build()
        .expect("Failed to build app");

    TestServer::new(app).expect("Failed to create test server")
}

async fn create_sermon(server: &TestServer, title: &str, date: &str) -> Value {
    let response = server
        .post("/api/sermons")
        .json(&json!({ "title": title, "speaker": "J. Doe", "date": date }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

async fn create_devotion(server: &TestServer, title: &str, date: &str) -> Value {
    let response = server
        .post("/api/devotions")
        .json(&json!({
            "title": title,
            "verse": "Psalm 23:1",
            "content": "The Lord is my shepherd; I shall not want.",
            "date": date
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

fn titles(body: &Value) -> Vec<String> {
    let items = body.get("items").unwrap_or(body);
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["title"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server();

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body, json!({ "status": "ok", "service": "pulpit" }));
}

// =============================================================================
// Create / Get
// =============================================================================

#[tokio::test]
async fn test_create_then_get() {
    let server = create_test_server();

    let created = create_sermon(&server, "Grace", "2024-01-07").await;
    assert_eq!(created["title"], "Grace");
    assert_eq!(created["speaker"], "J. Doe");
    assert_eq!(created["date"], "2024-01-07T00:00:00.000Z");
    assert!(created["_id"].as_str().is_some());
    assert!(created["createdAt"].as_str().is_some());
    assert_eq!(created["createdAt"], created["updatedAt"]);

    let id = created["_id"].as_str().unwrap();
    let response = server.get(&format!("/api/sermons/{}", id)).await;
    response.assert_status_ok();
    let fetched: Value = response.json();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_trims_and_ignores_server_fields() {
    let server = create_test_server();

    let response = server
        .post("/api/gallery")
        .json(&json!({
            "_id": "client-chosen",
            "createdAt": "1999-01-01T00:00:00.000Z",
            "url": "  /uploads/a.jpg  "
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["url"], "/uploads/a.jpg");
    assert_eq!(body["caption"], "");
    assert_ne!(body["_id"], "client-chosen");
    assert_ne!(body["createdAt"], "1999-01-01T00:00:00.000Z");
}

#[tokio::test]
async fn test_gallery_null_caption_becomes_empty() {
    let server = create_test_server();

    let response = server
        .post("/api/gallery")
        .json(&json!({ "url": "/uploads/a.jpg", "caption": null }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let created: Value = response.json();
    assert_eq!(created["caption"], "");

    let id = created["_id"].as_str().unwrap();
    server
        .put(&format!("/api/gallery/{}", id))
        .json(&json!({ "caption": "Easter" }))
        .await
        .assert_status_ok();

    let response = server
        .put(&format!("/api/gallery/{}", id))
        .json(&json!({ "caption": null }))
        .await;
    response.assert_status_ok();
    let updated: Value = response.json();
    assert_eq!(updated["caption"], "");
    assert_eq!(updated["url"], "/uploads/a.jpg");
}

#[tokio::test]
async fn test_create_validation_errors() {
    let server = create_test_server();

    // Missing required field
    let response = server
        .post("/api/sermons")
        .json(&json!({ "title": "Grace", "date": "2024-01-07" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Validation failed");
    assert!(body["details"].as_str().unwrap().contains("speaker"));

    // Wrong type
    let response = server
        .post("/api/sermons")
        .json(&json!({ "title": "Grace", "speaker": "A", "date": "2024-01-07", "durationMinutes": -5 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    // Blank after trimming
    let response = server
        .post("/api/devotions")
        .json(&json!({ "title": "   ", "verse": "John 3:16", "content": "x", "date": "2024-01-07" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    // Unparsable date
    let response = server
        .post("/api/sermons")
        .json(&json!({ "title": "Grace", "speaker": "A", "date": "next sunday" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_malformed_json() {
    let server = create_test_server();

    let response = server
        .post("/api/sermons")
        .text("{ not json")
        .content_type("application/json")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"], "Validation failed");

    let response = server.post("/api/sermons").json(&json!([1, 2, 3])).await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_not_found_and_invalid_id() {
    let server = create_test_server();

    let response = server
        .get(&format!("/api/sermons/{}", Uuid::new_v4()))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "Not found");

    let response = server.get("/api/sermons/not-a-uuid").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid id");
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_merges_fields() {
    let server = create_test_server();
    let created = create_sermon(&server, "Grace", "2024-01-07").await;
    let id = created["_id"].as_str().unwrap();

    // Timestamps have millisecond resolution
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let response = server
        .put(&format!("/api/sermons/{}", id))
        .json(&json!({
            "title": "Amazing Grace",
            "videoUrl": "https://youtu.be/abc",
            "_id": "ignored",
            "createdAt": "2000-01-01T00:00:00.000Z"
        }))
        .await;
    response.assert_status_ok();

    let updated: Value = response.json();
    assert_eq!(updated["_id"], created["_id"]);
    assert_eq!(updated["title"], "Amazing Grace");
    assert_eq!(updated["speaker"], "J. Doe");
    assert_eq!(updated["videoUrl"], "https://youtu.be/abc");
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert_ne!(updated["updatedAt"], created["updatedAt"]);

    let fetched: Value = server.get(&format!("/api/sermons/{}", id)).await.json();
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn test_update_errors() {
    let server = create_test_server();
    let created = create_sermon(&server, "Grace", "2024-01-07").await;
    let id = created["_id"].as_str().unwrap();

    let response = server
        .put(&format!("/api/sermons/{}", id))
        .json(&json!({ "title": "" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .put(&format!("/api/sermons/{}", Uuid::new_v4()))
        .json(&json!({ "title": "X" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = server
        .put("/api/sermons/123")
        .json(&json!({ "title": "X" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    // The failed update left the document alone
    let fetched: Value = server.get(&format!("/api/sermons/{}", id)).await.json();
    assert_eq!(fetched["title"], "Grace");
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let server = create_test_server();
    let created = create_sermon(&server, "Grace", "2024-01-07").await;
    let id = created["_id"].as_str().unwrap();

    let response = server.delete(&format!("/api/sermons/{}", id)).await;
    response.assert_status(StatusCode::NO_CONTENT);

    server
        .get(&format!("/api/sermons/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .delete(&format!("/api/sermons/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .delete("/api/sermons/nope")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

// =============================================================================
// List
// =============================================================================

#[tokio::test]
async fn test_list_unpaginated_is_array_newest_created_first() {
    let server = create_test_server();
    // Semantic dates opposite to creation order
    create_sermon(&server, "first", "2024-03-01").await;
    create_sermon(&server, "second", "2024-02-01").await;
    create_sermon(&server, "third", "2024-01-01").await;

    let response = server.get("/api/sermons").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body.is_array());
    assert_eq!(titles(&body), vec!["third", "second", "first"]);
}

#[tokio::test]
async fn test_list_single_page_shape() {
    let server = create_test_server();
    let created = create_sermon(&server, "Grace", "2024-01-07").await;

    let response = server.get("/api/sermons?page=1&limit=1").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({ "items": [created], "total": 1, "page": 1, "pages": 1, "limit": 1 })
    );
}

#[tokio::test]
async fn test_pages_concatenate_to_full_list() {
    let server = create_test_server();
    for i in 0..5 {
        create_sermon(&server, &format!("s{}", i), "2024-01-07").await;
    }

    let full: Value = server.get("/api/sermons").await.json();
    let mut concatenated = Vec::new();
    for page in 1..=3 {
        let body: Value = server
            .get(&format!("/api/sermons?page={}&limit=2", page))
            .await
            .json();
        assert_eq!(body["total"], 5);
        assert_eq!(body["pages"], 3);
        concatenated.extend(titles(&body));
    }
    assert_eq!(concatenated, titles(&full));

    let past_end: Value = server.get("/api/sermons?page=9&limit=2").await.json();
    assert_eq!(past_end["items"], json!([]));
    assert_eq!(past_end["page"], 9);
}

#[tokio::test]
async fn test_lenient_pagination_params() {
    let server = create_test_server();
    for i in 0..14 {
        create_sermon(&server, &format!("s{}", i), "2024-01-07").await;
    }

    let body: Value = server.get("/api/sermons?page=abc").await.json();
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 12);
    assert_eq!(body["pages"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 12);

    let body: Value = server.get("/api/sermons?limit=0").await.json();
    assert_eq!(body["limit"], 12);

    let body: Value = server.get("/api/sermons?limit=-3").await.json();
    assert_eq!(body["limit"], 12);

    let body: Value = server.get("/api/sermons?page=2abc&limit=5xyz").await.json();
    assert_eq!(body["page"], 2);
    assert_eq!(body["limit"], 5);
    assert_eq!(body["items"].as_array().unwrap().len(), 5);

    // Empty values do not switch on pagination
    let body: Value = server.get("/api/sermons?page=&limit=").await.json();
    assert!(body.is_array());
}

#[tokio::test]
async fn test_repeated_query_keys_use_first_value() {
    let server = create_test_server();
    for i in 0..3 {
        create_sermon(&server, &format!("s{}", i), "2024-01-07").await;
    }

    let response = server.get("/api/sermons?page=1&page=2&limit=2&limit=9").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);

    let response = server.get("/api/sermons?from=x&from=y").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(titles(&body).len(), 3);
}

#[tokio::test]
async fn test_devotion_week_range() {
    let server = create_test_server();
    create_devotion(&server, "before", "2024-03-03T23:59:00").await;
    create_devotion(&server, "monday", "2024-03-04").await;
    create_devotion(&server, "sunday night", "2024-03-10T23:00:00").await;
    create_devotion(&server, "next monday", "2024-03-11").await;

    let body: Value = server
        .get("/api/devotions?from=2024-03-04&to=2024-03-10")
        .await
        .json();
    assert_eq!(titles(&body), vec!["sunday night", "monday"]);
}

#[tokio::test]
async fn test_malformed_range_is_ignored() {
    let server = create_test_server();
    create_devotion(&server, "a", "2024-03-04").await;
    create_devotion(&server, "b", "2025-06-01").await;

    let body: Value = server.get("/api/devotions?from=garbage&to=").await.json();
    assert_eq!(titles(&body).len(), 2);

    let body: Value = server
        .get("/api/devotions?from=2025-01-01&to=13/45/2025")
        .await
        .json();
    assert_eq!(titles(&body), vec!["b"]);
}

#[tokio::test]
async fn test_range_with_pagination() {
    let server = create_test_server();
    for i in 0..4 {
        create_devotion(&server, &format!("in{}", i), "2024-03-05").await;
    }
    create_devotion(&server, "out", "2024-04-05").await;

    let body: Value = server
        .get("/api/devotions?from=2024-03-01&to=2024-03-31&page=2&limit=3")
        .await
        .json();
    assert_eq!(body["total"], 4);
    assert_eq!(body["pages"], 2);
    assert_eq!(titles(&body), vec!["in0"]);
}

#[tokio::test]
async fn test_gallery_excluded_by_active_range() {
    let server = create_test_server();
    server
        .post("/api/gallery")
        .json(&json!({ "url": "/uploads/a.jpg", "caption": "Choir" }))
        .await
        .assert_status(StatusCode::CREATED);

    let all: Value = server.get("/api/gallery").await.json();
    assert_eq!(all.as_array().unwrap().len(), 1);

    let filtered: Value = server.get("/api/gallery?from=2000-01-01").await.json();
    assert_eq!(filtered, json!([]));

    let page: Value = server.get("/api/gallery?limit=9").await.json();
    assert_eq!(page["total"], 1);
    assert_eq!(page["limit"], 9);
}

// =============================================================================
// Prefix
// =============================================================================

#[tokio::test]
async fn test_custom_prefix() {
    let app = ServerBuilder::new()
        .with_api_prefix("/v2/")
        .register::<Sermon>(InMemoryDataService::new())
        .build()
        .unwrap();
    let server = TestServer::new(app).unwrap();

    server.get("/v2/sermons").await.assert_status_ok();
    server
        .get("/api/sermons")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server.get("/health").await.assert_status_ok();
}
