//! API integration tests

mod support;

use std::time::Duration;

use bookshelf_server::lifecycle::LifecycleState;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use serde_json::{json, Value};

use support::{spawn_app, PANIC_TRIGGER};

#[tokio::test]
async fn test_health_check() {
    let mut test = spawn_app(Duration::ZERO).await;

    let response = reqwest::get(format!("{}/health", test.base_url))
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");

    test.app.stop().await.unwrap();
}

#[tokio::test]
async fn test_create_then_list_books() {
    let mut test = spawn_app(Duration::ZERO).await;
    let client = Client::new();

    let response = client
        .post(format!("{}/books", test.base_url))
        .json(&json!({ "name": "Moby Dick" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.bytes().await.unwrap().is_empty());

    let body: Value = client
        .get(format!("{}/books", test.base_url))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body, json!([{ "id": 1, "name": "Moby Dick" }]));

    test.app.stop().await.unwrap();
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let mut test = spawn_app(Duration::ZERO).await;

    let response = Client::new()
        .post(format!("{}/books", test.base_url))
        .header(CONTENT_TYPE, "application/json")
        .body("{\"name\": ")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()[CONTENT_TYPE].to_str().unwrap(),
        "application/json"
    );
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "message": "invalid request body" }));

    test.app.stop().await.unwrap();
}

#[tokio::test]
async fn test_non_numeric_book_id_is_400() {
    let mut test = spawn_app(Duration::ZERO).await;

    let response = reqwest::get(format!("{}/books/abc", test.base_url))
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "message": "invalid path parameter: book_id" }));

    test.app.stop().await.unwrap();
}

#[tokio::test]
async fn test_unknown_path_and_wrong_method() {
    let mut test = spawn_app(Duration::ZERO).await;
    let client = Client::new();

    let response = client
        .get(format!("{}/authors", test.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .put(format!("{}/books", test.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = client
        .get(format!("{}/books/1/entries/2", test.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    test.app.stop().await.unwrap();
}

#[tokio::test]
async fn test_entry_lifecycle() {
    let mut test = spawn_app(Duration::ZERO).await;
    let client = Client::new();

    client
        .post(format!("{}/books", test.base_url))
        .json(&json!({ "name": "Moby Dick" }))
        .send()
        .await
        .unwrap();

    let response = client
        .post(format!("{}/books/1/entries", test.base_url))
        .json(&json!({ "content": "Call me Ishmael.", "type": "quote", "key": "opening" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = client
        .get(format!("{}/books/1", test.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        body,
        json!({
            "id": 1,
            "entries": [{ "id": 2, "type": "quote", "content": "Call me Ishmael." }]
        })
    );

    let response = client
        .delete(format!("{}/books/1/entries/2", test.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = client
        .get(format!("{}/books/1", test.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["entries"], json!([]));

    test.app.stop().await.unwrap();
}

#[tokio::test]
async fn test_deleting_missing_entry_is_consistently_404() {
    let mut test = spawn_app(Duration::ZERO).await;
    let client = Client::new();

    for _ in 0..2 {
        let response = client
            .delete(format!("{}/books/1/entries/42", test.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["message"], "Entry 42 not found in book 1");
    }

    test.app.stop().await.unwrap();
}

#[tokio::test]
async fn test_panic_is_contained() {
    let mut test = spawn_app(Duration::ZERO).await;
    let client = Client::new();

    let response = client
        .post(format!("{}/books", test.base_url))
        .json(&json!({ "name": PANIC_TRIGGER }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.headers()[CONTENT_TYPE].to_str().unwrap(),
        "application/json"
    );
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "message": "internal server error" }));

    // The server keeps serving
    let response = client
        .get(format!("{}/books", test.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    test.app.stop().await.unwrap();
}

#[tokio::test]
async fn test_shutdown_drains_in_flight_request_before_closing_store() {
    let mut test = spawn_app(Duration::from_millis(300)).await;

    let url = format!("{}/books", test.base_url);
    let in_flight = tokio::spawn(async move { reqwest::get(url).await });

    // Let the request reach the store before shutting down
    tokio::time::sleep(Duration::from_millis(100)).await;
    test.app.stop().await.expect("Shutdown failed");
    assert_eq!(test.app.state(), LifecycleState::Stopped);

    let response = in_flight.await.unwrap().expect("In-flight request was cut");
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(
        *test.log.lock().unwrap(),
        vec!["list_books".to_string(), "store closed".to_string()]
    );
}
