// REST API for authors, books and accounts

mod auth;
mod authors;
mod books;
mod error;
mod state;

#[cfg(test)]
mod integration_tests;

pub use auth::{AuthResponse, LoginRequest, RegisterRequest};
pub use error::ApiError;
pub use state::AppState;

use axum::{
    Router,
    middleware,
    response::Json,
    routing::{delete, get, post, put},
};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::middleware::{require_admin, require_auth};

/// Build the full application router.
///
/// Reads are public. Writes go through the auth gate; deletes additionally go
/// through the admin gate when `admin_deletes` is set.
pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/authors", get(authors::list_authors))
        .route("/authors/{id}", get(authors::get_author))
        .route("/authors/{id}/books", get(authors::list_author_books))
        .route("/authors/{id}/books/{book_id}", get(authors::get_author_book))
        .route("/books", get(books::list_books))
        .route("/books/{id}", get(books::get_book));

    let mut deletes = Router::new()
        .route("/authors/{id}", delete(authors::delete_author))
        .route("/authors/{id}/books/{book_id}", delete(authors::delete_author_book))
        .route("/books/{id}", delete(books::delete_book));
    if state.admin_deletes {
        deletes = deletes.route_layer(middleware::from_fn(require_admin));
    }

    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/authors", post(authors::create_author))
        .route("/authors/{id}", put(authors::update_author))
        .route("/authors/{id}/books", post(authors::create_author_book))
        .route("/authors/{id}/books/{book_id}", put(authors::update_author_book))
        .route("/books", post(books::create_book))
        .route("/books/{id}", put(books::update_book))
        .merge(deletes)
        .route_layer(middleware::from_fn_with_state(state.auth.clone(), require_auth));

    public
        .merge(protected)
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn index() -> Json<Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "message": "Authors & Books API"
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
