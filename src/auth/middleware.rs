//! Request gates for protected routes.
//!
//! [`require_auth`] authenticates the bearer token and stores the resulting
//! [`UserContext`] in the request extensions. [`require_admin`] must be layered
//! inside it and only lets admin identities through.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use crate::auth::context::UserContext;
use crate::auth::extractor::{AuthError, AuthExtractor};

/// Authenticate the request and attach the caller's identity.
pub async fn require_auth(
    State(auth): State<Arc<AuthExtractor>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let user = match auth.extract_user(authorization.as_deref()).await {
        Ok(user) => user,
        Err(err) => {
            warn!(
                method = %request.method(),
                path = %request.uri().path(),
                "Request rejected: {}",
                err
            );
            return Err(err);
        }
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Reject callers whose identity is not an admin.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AuthError> {
    match request.extensions().get::<UserContext>() {
        Some(user) if user.is_admin() => Ok(next.run(request).await),
        Some(user) => {
            warn!(
                user_id = %user.user_id(),
                path = %request.uri().path(),
                "Admin role required"
            );
            Err(AuthError::Forbidden)
        }
        None => Err(AuthError::Forbidden),
    }
}
