//! HTTP 라우터
//!
//! `/api/v1/library` 아래에 카탈로그와 사용자 서재 API를 제공한다.
//!
//! **카탈로그**
//! - `POST   /books/` 도서 등록
//! - `GET    /books/?skip=&limit=` 도서 목록
//! - `GET    /books/{book_id}` 도서 조회
//! - `PUT    /books/{book_id}` 도서 전체 수정
//! - `DELETE /books/{book_id}` 도서 삭제
//!
//! **사용자 서재**
//! - `POST   /{user_id}/books/{book_id}` 서재에 도서 추가
//! - `GET    /{user_id}/books` 서재 목록
//! - `PUT    /{user_id}/books/{book_id}` 독서 상태/진행 페이지 부분 수정
//! - `DELETE /{user_id}/books/{book_id}` 서재에서 도서 삭제

mod books;
mod error;
mod payload;
mod shelf;

pub use error::ApiError;
pub use payload::Payload;

use crate::error::ServiceError;
use crate::library::catalog::CatalogService;
use crate::library::shelf::ShelfService;
use crate::library::{BookRepository, UserBookRepository};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub const LIBRARY_PREFIX: &str = "/api/v1/library";

/// 핸들러가 공유하는 서비스
pub struct AppState<R> {
    catalog: Arc<CatalogService<R>>,
    shelf: Arc<ShelfService<R>>,
}

impl<R> AppState<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            catalog: Arc::new(CatalogService::new(repository.clone())),
            shelf: Arc::new(ShelfService::new(repository)),
        }
    }
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            catalog: self.catalog.clone(),
            shelf: self.shelf.clone(),
        }
    }
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
}

async fn root() -> Json<MessageResponse> {
    Json(MessageResponse { message: "Library Service is running!" })
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy", service: "library" })
}

async fn router_check() -> Json<MessageResponse> {
    Json(MessageResponse { message: "Library router is working!" })
}

/// 저장소 작업은 동기 방식이므로 블로킹 스레드에서 실행한다.
async fn run_blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError(ServiceError::Internal(format!("blocking task failed: {}", e))))?
        .map_err(ApiError)
}

pub fn router<R>(state: AppState<R>) -> Router
where
    R: BookRepository + UserBookRepository + Send + Sync + 'static,
{
    let library = Router::new()
        .route("/books", get(books::list::<R>).post(books::create::<R>))
        .route("/books/", get(books::list::<R>).post(books::create::<R>))
        .route("/books/{book_id}", get(books::get::<R>).put(books::update::<R>).delete(books::delete::<R>))
        .route("/test", get(router_check))
        .route("/{user_id}/books", get(shelf::list::<R>))
        .route("/{user_id}/books/{book_id}", post(shelf::add::<R>).put(shelf::update::<R>).delete(shelf::remove::<R>));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest(LIBRARY_PREFIX, library)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
