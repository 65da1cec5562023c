use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use library_service::api::{router, AppState, LIBRARY_PREFIX};
use library_service::library::repo::MemoryRepository;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

fn app() -> Router {
    router(AppState::new(Arc::new(MemoryRepository::new())))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn url(path: &str) -> String {
    format!("{}{}", LIBRARY_PREFIX, path)
}

async fn create_book(app: &Router, title: &str) -> String {
    let (status, body) = send(app, Method::POST, &url("/books/"), Some(json!({
        "title": title,
        "author": "Robert C. Martin",
        "genre": "programming",
    }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["book_id"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn root_and_health() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Library Service is running!" }));

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy", "service": "library" }));

    let (status, body) = send(&app, Method::GET, &url("/test"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Library router is working!");
}

#[tokio::test]
async fn book_lifecycle() {
    let app = app();

    let (status, created) = send(&app, Method::POST, &url("/books/"), Some(json!({
        "title": "Clean Code",
        "author": "Robert C. Martin",
        "genre": "programming",
    }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "Clean Code");
    assert_eq!(created["author"], "Robert C. Martin");
    assert_eq!(created["genre"], "programming");
    let book_id = created["book_id"].as_str().unwrap().to_owned();
    assert!(Uuid::parse_str(&book_id).is_ok());

    let (status, fetched) = send(&app, Method::GET, &url(&format!("/books/{}", book_id)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, body) = send(&app, Method::DELETE, &url(&format!("/books/{}", book_id)), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, Method::GET, &url(&format!("/books/{}", book_id)), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Book not found");
}

#[tokio::test]
async fn book_update_replaces_all_fields() {
    let app = app();
    let book_id = create_book(&app, "Clean Code").await;

    let (status, updated) = send(&app, Method::PUT, &url(&format!("/books/{}", book_id)), Some(json!({
        "title": "Clean Architecture",
        "author": "Robert C. Martin",
    }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["book_id"], book_id.as_str());
    assert_eq!(updated["title"], "Clean Architecture");
    assert_eq!(updated["genre"], Value::Null);
}

#[tokio::test]
async fn book_validation_errors() {
    let app = app();

    let (status, _) = send(&app, Method::POST, &url("/books/"), Some(json!({ "author": "Nobody" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, Method::POST, &url("/books/"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, Method::POST, &url("/books/"), Some(json!({
        "title": "x".repeat(256),
        "author": "Nobody",
    }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, Method::GET, &url("/books/?skip=-1"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, Method::GET, &url("/books/?limit=lots"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn malformed_book_id_is_bad_request() {
    let app = app();
    let body = json!({ "title": "T", "author": "A" });

    for method in [Method::GET, Method::PUT, Method::DELETE] {
        let payload = if method == Method::PUT { Some(body.clone()) } else { None };
        let (status, detail) = send(&app, method, &url("/books/not-a-uuid"), payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(detail["detail"], "Invalid book ID format");
    }
}

#[tokio::test]
async fn list_books_window() {
    let app = app();
    for i in 0..5 {
        create_book(&app, &format!("Book {}", i)).await;
    }

    let (status, all) = send(&app, Method::GET, &url("/books/"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 5);

    let (_, window) = send(&app, Method::GET, &url("/books?skip=1&limit=2"), None).await;
    let titles: Vec<&str> = window.as_array().unwrap().iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Book 1", "Book 2"]);
}

#[tokio::test]
async fn add_to_library_without_body_uses_defaults() {
    let app = app();
    let book_id = create_book(&app, "Clean Code").await;
    let user_id = Uuid::new_v4().to_string();

    let (status, entry) = send(&app, Method::POST, &url(&format!("/{}/books/{}", user_id, book_id)), None).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["user_id"], user_id.as_str());
    assert_eq!(entry["book_id"], book_id.as_str());
    assert_eq!(entry["reading_status"], "want_to_read");
    assert_eq!(entry["progress_page"], 0);
    assert!(Uuid::parse_str(entry["user_book_id"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn library_errors() {
    let app = app();
    let book_id = create_book(&app, "Clean Code").await;
    let user_id = Uuid::new_v4().to_string();
    let entry_url = url(&format!("/{}/books/{}", user_id, book_id));

    let (status, _) = send(&app, Method::POST, &entry_url, Some(json!({ "reading_status": "reading" }))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::POST, &entry_url, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Book already in library");

    let (status, body) = send(&app, Method::POST, &url(&format!("/{}/books/{}", user_id, Uuid::new_v4())), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Book not found in catalog");

    let (status, body) = send(&app, Method::POST, &url(&format!("/nobody/books/{}", book_id)), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid ID format");

    let (status, body) = send(&app, Method::GET, &url("/nobody/books"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid user ID format");

    let (status, body) = send(&app, Method::DELETE, &url(&format!("/books/{}", book_id)), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Book is still referenced by user libraries");
}

#[tokio::test]
async fn partial_update_and_removal() {
    let app = app();
    let book_id = create_book(&app, "Clean Code").await;
    let user_id = Uuid::new_v4().to_string();
    let entry_url = url(&format!("/{}/books/{}", user_id, book_id));

    send(&app, Method::POST, &entry_url, Some(json!({ "reading_status": "reading", "progress_page": 30 }))).await;

    let (status, entry) = send(&app, Method::PUT, &entry_url, Some(json!({ "progress_page": 0 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["reading_status"], "reading");
    assert_eq!(entry["progress_page"], 0);

    let (status, _) = send(&app, Method::PUT, &entry_url, Some(json!({ "reading_status": null }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, list) = send(&app, Method::GET, &url(&format!("/{}/books", user_id)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0], entry);

    let (status, _) = send(&app, Method::DELETE, &entry_url, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::PUT, &entry_url, Some(json!({ "progress_page": 1 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Book not found in user library");

    let (status, _) = send(&app, Method::DELETE, &entry_url, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &url(&format!("/books/{}", book_id)), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn body_is_read_as_json_regardless_of_content_type() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri(url("/books/"))
        .header("content-type", "text/plain")
        .body(Body::from(r#"{"title": "Dune", "author": "Frank Herbert"}"#))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let (status, _) = send(&app, Method::POST, &url("/books/"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let request = Request::builder()
        .method(Method::POST)
        .uri(url("/books/"))
        .body(Body::from("title=Dune"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
