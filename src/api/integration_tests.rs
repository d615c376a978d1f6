//! End-to-end tests driving the router over an in-memory database.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use super::{AppState, create_router};
use crate::auth::{AuthConfig, AuthExtractor};
use crate::catalog::Catalog;
use crate::db::memory_db;
use crate::db::schema::UserCreate;
use crate::types::Role;

async fn test_state(admin_deletes: bool) -> AppState {
    let db = memory_db().await;
    let config = AuthConfig {
        bcrypt_cost: 4,
        admin_deletes,
        ..AuthConfig::with_secret("integration-secret")
    };
    AppState::new(Catalog::new(db.clone()), AuthExtractor::new(config, db))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

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

async fn register(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "name": "Reader", "email": email, "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["token"].as_str().unwrap().to_string()
}

async fn create_author(app: &Router, token: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/authors",
        Some(token),
        Some(json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_cascade_delete_scenario() {
    let app = create_router(test_state(false).await);
    let token = register(&app, "reader@example.com").await;

    let author_id = create_author(&app, &token, "A1").await;

    let (status, book) = send(
        &app,
        Method::POST,
        &format!("/authors/{}/books", author_id),
        Some(&token),
        Some(json!({ "title": "First" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(book["author_id"], json!(author_id));
    let book_id = book["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/authors/{}", author_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Author deleted" }));

    let (status, body) = send(&app, Method::GET, &format!("/books/{}", book_id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Book not found" }));

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/authors/{}/books", author_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_register_twice_is_rejected() {
    let app = create_router(test_state(false).await);
    register(&app, "dup@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "email": "dup@example.com", "password": "other" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "User already exists" }));
}

#[tokio::test]
async fn test_register_requires_credentials() {
    let app = create_router(test_state(false).await);

    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "email": "nopass@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_and_token_acceptance() {
    let app = create_router(test_state(false).await);
    register(&app, "login@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "login@example.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Invalid email or password" }));

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "login@example.com", "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "user");
    assert!(body.get("password_hash").is_none());
    let token = body["token"].as_str().unwrap().to_string();

    let (status, me) = send(&app, Method::GET, "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "login@example.com");
    assert_eq!(me["id"], body["id"]);

    let (status, _) = send(
        &app,
        Method::POST,
        "/authors",
        Some(&token),
        Some(json!({ "name": "Accepted" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = create_router(test_state(false).await);

    let (status, body) = send(
        &app,
        Method::POST,
        "/authors",
        None,
        Some(json!({ "name": "Nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Not authorized, no token" }));

    let (status, body) = send(
        &app,
        Method::POST,
        "/authors",
        Some("not.a.token"),
        Some(json!({ "name": "Nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Not authorized, invalid token" }));

    let (status, authors) = send(&app, Method::GET, "/authors", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(authors, json!([]));
}

#[tokio::test]
async fn test_nested_book_scoped_to_author() {
    let app = create_router(test_state(false).await);
    let token = register(&app, "nested@example.com").await;
    let a = create_author(&app, &token, "A").await;
    let c = create_author(&app, &token, "C").await;

    let (_, book) = send(
        &app,
        Method::POST,
        &format!("/authors/{}/books", c),
        Some(&token),
        Some(json!({ "title": "Owned by C", "author_id": a })),
    )
    .await;
    assert_eq!(book["author_id"], json!(c));
    let book_id = book["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/authors/{}/books/{}", a, book_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Book not found for this author" }));

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/authors/{}/books/{}", c, book_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["author"]["name"], "C");
    assert!(body["author"].get("biography").is_none());
}

#[tokio::test]
async fn test_book_requires_existing_author() {
    let app = create_router(test_state(false).await);
    let token = register(&app, "books@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(&token),
        Some(json!({
            "title": "Orphan",
            "AutorId": "00000000-0000-4000-8000-000000000000"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Author does not exist" }));

    let (_, books) = send(&app, Method::GET, "/books", None, None).await;
    assert_eq!(books, json!([]));
}

#[tokio::test]
async fn test_book_listing_is_enriched() {
    let app = create_router(test_state(false).await);
    let token = register(&app, "enrich@example.com").await;

    let (_, author) = send(
        &app,
        Method::POST,
        "/authors",
        Some(&token),
        Some(json!({
            "name": "Isabel",
            "nationality": "Chilean",
            "biography": "Novelist",
            "birthDate": "1942-08-02"
        })),
    )
    .await;
    assert_eq!(author["birth_date"], "1942-08-02");
    let author_id = author["id"].as_str().unwrap();

    let (status, book) = send(
        &app,
        Method::POST,
        "/books",
        Some(&token),
        Some(json!({ "title": "The House of the Spirits", "authorId": author_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let book_id = book["id"].as_str().unwrap();

    let (_, listed) = send(&app, Method::GET, "/books", None, None).await;
    assert_eq!(
        listed[0]["author"],
        json!({ "id": author_id, "name": "Isabel", "nationality": "Chilean" })
    );

    let (_, single) = send(&app, Method::GET, &format!("/books/{}", book_id), None, None).await;
    assert_eq!(single["author"]["biography"], "Novelist");
    assert_eq!(single["title"], "The House of the Spirits");
}

#[tokio::test]
async fn test_partial_update_over_http() {
    let app = create_router(test_state(false).await);
    let token = register(&app, "patch@example.com").await;

    let (_, author) = send(
        &app,
        Method::POST,
        "/authors",
        Some(&token),
        Some(json!({ "name": "Jane", "nationality": "Irish" })),
    )
    .await;
    let id = author["id"].as_str().unwrap();

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/authors/{}", id),
        Some(&token),
        Some(json!({ "nationality": null, "biography": "Short" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Jane");
    assert_eq!(updated["nationality"], Value::Null);
    assert_eq!(updated["biography"], "Short");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/authors/{}", id),
        Some(&token),
        Some(json!({ "name": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_ids_and_bodies() {
    let app = create_router(test_state(false).await);
    let token = register(&app, "bad@example.com").await;

    let (status, body) = send(&app, Method::GET, "/authors/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Author not found" }));

    let (status, body) = send(&app, Method::GET, "/authors/not-a-uuid/books", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/authors")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_admin_gate_on_deletes() {
    let state = test_state(true).await;
    let app = create_router(state.clone());
    let user_token = register(&app, "user@example.com").await;
    let author_id = create_author(&app, &user_token, "Protected").await;

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/authors/{}", author_id),
        Some(&user_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "message": "Not authorized, admin role required" }));

    let admin = state
        .users
        .create_user(&UserCreate {
            name: Some("Admin".to_string()),
            email: "admin@example.com".to_string(),
            password: "admin".to_string(),
            role: Role::Admin,
        })
        .await
        .unwrap();
    let admin_token = state.tokens.issue(&admin.uid).unwrap();

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/authors/{}", author_id),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_and_index() {
    let app = create_router(test_state(false).await);

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "authors-books-api");

    let (status, _) = send(&app, Method::GET, "/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
