// Registration, login and identity routes

use axum::{
    Extension,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::auth::{AuthError, UserContext};
use crate::db::schema::{UserCreate, UserRecord};
use crate::types::{Role, UserId};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Returned by register and login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub id: UserId,
    pub name: Option<String>,
    pub email: String,
    pub role: Role,
    pub token: String,
}

impl AuthResponse {
    fn new(user: UserRecord, token: String) -> Self {
        Self {
            id: user.uid,
            name: user.name,
            email: user.email,
            role: user.role,
            token,
        }
    }
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let Json(req) = payload?;

    // Self-service accounts never get elevated roles
    let create = UserCreate {
        name: req.name,
        email: req.email.unwrap_or_default(),
        password: req.password.unwrap_or_default(),
        role: Role::User,
    };

    let user = state.users.create_user(&create).await?;
    let token = state.tokens.issue(&user.uid).map_err(AuthError::from)?;

    Ok((StatusCode::CREATED, Json(AuthResponse::new(user, token))))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(req) = payload?;

    let (Some(email), Some(password)) = (req.email, req.password) else {
        return Err(ApiError::Validation(
            "email and password are required".to_string(),
        ));
    };

    let user = match state.users.verify_credentials(&email, &password).await {
        Ok(user) => user,
        Err(err) => {
            if err == AuthError::InvalidCredentials {
                warn!("Failed login attempt for {}", email.trim());
            }
            return Err(err.into());
        }
    };

    let token = state.tokens.issue(&user.uid).map_err(AuthError::from)?;
    info!("User {} logged in", user.uid);

    Ok(Json(AuthResponse::new(user, token)))
}

pub async fn me(Extension(user): Extension<UserContext>) -> Json<UserContext> {
    Json(user)
}
