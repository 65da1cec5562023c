use crate::api::error::ApiError;
use crate::api::payload::Payload;
use crate::api::{run_blocking, AppState};
use crate::library::schemas::{UserBookCreate, UserBookResponse, UserBookUpdate};
use crate::library::{BookRepository, UserBookRepository};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

pub async fn add<R>(
    State(state): State<AppState<R>>,
    Path((user_id, book_id)): Path<(String, String)>,
    Payload(request): Payload<UserBookCreate>,
) -> Result<(StatusCode, Json<UserBookResponse>), ApiError>
where
    R: BookRepository + UserBookRepository + Send + Sync + 'static,
{
    request.validate()?;
    let shelf = state.shelf.clone();
    let entry = run_blocking(move || shelf.add(&user_id, &book_id, request)).await?;
    Ok((StatusCode::CREATED, Json(entry.into())))
}

pub async fn list<R>(
    State(state): State<AppState<R>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<UserBookResponse>>, ApiError>
where
    R: BookRepository + UserBookRepository + Send + Sync + 'static,
{
    let shelf = state.shelf.clone();
    let entries = run_blocking(move || shelf.list(&user_id)).await?;
    Ok(Json(entries.into_iter().map(UserBookResponse::from).collect()))
}

pub async fn update<R>(
    State(state): State<AppState<R>>,
    Path((user_id, book_id)): Path<(String, String)>,
    Payload(request): Payload<UserBookUpdate>,
) -> Result<Json<UserBookResponse>, ApiError>
where
    R: BookRepository + UserBookRepository + Send + Sync + 'static,
{
    let changes = request.into_changes()?;
    let shelf = state.shelf.clone();
    let entry = run_blocking(move || shelf.update(&user_id, &book_id, changes)).await?;
    Ok(Json(entry.into()))
}

pub async fn remove<R>(
    State(state): State<AppState<R>>,
    Path((user_id, book_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError>
where
    R: BookRepository + UserBookRepository + Send + Sync + 'static,
{
    let shelf = state.shelf.clone();
    run_blocking(move || shelf.remove(&user_id, &book_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
