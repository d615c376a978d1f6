// Author routes, including the books nested under an author

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use serde_json::{Value, json};

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::catalog::{Author, AuthorPatch, AuthorSummary, Book, BookPatch, BookWithAuthor, NewAuthor, NewBook};

pub async fn list_authors(State(state): State<AppState>) -> Result<Json<Vec<Author>>, ApiError> {
    Ok(Json(state.catalog.list_authors().await?))
}

pub async fn create_author(
    State(state): State<AppState>,
    payload: Result<Json<NewAuthor>, JsonRejection>,
) -> Result<(StatusCode, Json<Author>), ApiError> {
    let Json(input) = payload?;
    let author = state.catalog.create_author(input).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Author>, ApiError> {
    Ok(Json(state.catalog.get_author(&id).await?))
}

pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AuthorPatch>, JsonRejection>,
) -> Result<Json<Author>, ApiError> {
    let Json(patch) = payload?;
    Ok(Json(state.catalog.update_author(&id, patch).await?))
}

pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.catalog.delete_author(&id).await?;
    Ok(Json(json!({ "message": "Author deleted" })))
}

pub async fn list_author_books(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Book>>, ApiError> {
    Ok(Json(state.catalog.list_books_for_author(&id).await?))
}

pub async fn create_author_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NewBook>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let Json(input) = payload?;
    let book = state.catalog.create_book_for_author(&id, input).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

pub async fn get_author_book(
    State(state): State<AppState>,
    Path((id, book_id)): Path<(String, String)>,
) -> Result<Json<BookWithAuthor<AuthorSummary>>, ApiError> {
    Ok(Json(state.catalog.get_book_for_author(&id, &book_id).await?))
}

pub async fn update_author_book(
    State(state): State<AppState>,
    Path((id, book_id)): Path<(String, String)>,
    payload: Result<Json<BookPatch>, JsonRejection>,
) -> Result<Json<Book>, ApiError> {
    let Json(patch) = payload?;
    Ok(Json(
        state
            .catalog
            .update_book_for_author(&id, &book_id, patch)
            .await?,
    ))
}

pub async fn delete_author_book(
    State(state): State<AppState>,
    Path((id, book_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    state.catalog.delete_book_for_author(&id, &book_id).await?;
    Ok(Json(json!({ "message": "Book deleted" })))
}
