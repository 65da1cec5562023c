use crate::api::error::ApiError;
use crate::api::payload::Payload;
use crate::api::{run_blocking, AppState};
use crate::error::ServiceError;
use crate::library::schemas::{BookCreate, BookResponse, ListQuery};
use crate::library::BookRepository;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

pub async fn create<R>(
    State(state): State<AppState<R>>,
    Payload(request): Payload<BookCreate>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError>
where
    R: BookRepository + Send + Sync + 'static,
{
    request.validate()?;
    let catalog = state.catalog.clone();
    let book = run_blocking(move || catalog.create(request)).await?;
    Ok((StatusCode::CREATED, Json(book.into())))
}

pub async fn list<R>(
    State(state): State<AppState<R>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<BookResponse>>, ApiError>
where
    R: BookRepository + Send + Sync + 'static,
{
    let Query(query) = query.map_err(|e| ServiceError::validation(e.body_text()))?;
    query.validate()?;

    let catalog = state.catalog.clone();
    let books = run_blocking(move || catalog.list(query.skip, query.limit)).await?;
    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

pub async fn get<R>(
    State(state): State<AppState<R>>,
    Path(book_id): Path<String>,
) -> Result<Json<BookResponse>, ApiError>
where
    R: BookRepository + Send + Sync + 'static,
{
    let catalog = state.catalog.clone();
    let book = run_blocking(move || catalog.get(&book_id)).await?;
    Ok(Json(book.into()))
}

pub async fn update<R>(
    State(state): State<AppState<R>>,
    Path(book_id): Path<String>,
    Payload(request): Payload<BookCreate>,
) -> Result<Json<BookResponse>, ApiError>
where
    R: BookRepository + Send + Sync + 'static,
{
    request.validate()?;
    let catalog = state.catalog.clone();
    let book = run_blocking(move || catalog.update(&book_id, request)).await?;
    Ok(Json(book.into()))
}

pub async fn delete<R>(
    State(state): State<AppState<R>>,
    Path(book_id): Path<String>,
) -> Result<StatusCode, ApiError>
where
    R: BookRepository + Send + Sync + 'static,
{
    let catalog = state.catalog.clone();
    run_blocking(move || catalog.delete(&book_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
