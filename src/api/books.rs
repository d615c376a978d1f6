// Top-level book routes

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use serde_json::{Value, json};

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::catalog::{AuthorProfile, AuthorSummary, Book, BookPatch, BookWithAuthor, NewBook};

pub async fn list_books(
    State(state): State<AppState>,
) -> Result<Json<Vec<BookWithAuthor<AuthorSummary>>>, ApiError> {
    Ok(Json(state.catalog.list_books().await?))
}

pub async fn create_book(
    State(state): State<AppState>,
    payload: Result<Json<NewBook>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let Json(input) = payload?;
    let book = state.catalog.create_book(input).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BookWithAuthor<AuthorProfile>>, ApiError> {
    Ok(Json(state.catalog.get_book(&id).await?))
}

pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<BookPatch>, JsonRejection>,
) -> Result<Json<Book>, ApiError> {
    let Json(patch) = payload?;
    Ok(Json(state.catalog.update_book(&id, patch).await?))
}

pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.catalog.delete_book(&id).await?;
    Ok(Json(json!({ "message": "Book deleted" })))
}
