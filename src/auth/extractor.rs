//! Authentication extractor for HTTP requests.

use std::fmt;
use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::context::UserContext;
use crate::auth::token::{DEFAULT_TOKEN_TTL_HOURS, TokenError, TokenService};
use crate::auth::user_store::UserStore;
use crate::db::Db;
use crate::types::UserId;

/// Authentication configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign identity tokens
    #[serde(default)]
    pub jwt_secret: String,
    /// Lifetime of issued tokens in hours (default: 24)
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    /// bcrypt work factor for stored passwords
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
    /// Whether delete operations additionally require the admin role
    #[serde(default)]
    pub admin_deletes: bool,
}

fn default_token_ttl_hours() -> i64 {
    DEFAULT_TOKEN_TTL_HOURS
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            admin_deletes: false,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("admin_deletes", &self.admin_deletes)
            .finish()
    }
}

impl AuthConfig {
    /// Create a config signing tokens with `secret` and default settings.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: secret.into(),
            ..Default::default()
        }
    }

    /// Check that the configuration can be used to start the service.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.jwt_secret.trim().is_empty() {
            anyhow::bail!("a JWT signing secret is required (set JWT_SECRET or --jwt-secret)");
        }
        if self.token_ttl_hours <= 0 {
            anyhow::bail!("token lifetime must be positive, got {} hours", self.token_ttl_hours);
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            anyhow::bail!("bcrypt cost must be between 4 and 31, got {}", self.bcrypt_cost);
        }
        Ok(())
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::hours(self.token_ttl_hours)
    }
}

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No bearer token on a protected request
    Unauthenticated,
    /// Token failed validation or names a user that no longer exists
    InvalidToken(String),
    /// Login with an unknown email or a wrong password
    InvalidCredentials,
    /// Identity lacks the required role
    Forbidden,
    /// Registration with an email that is already taken
    UserExists,
    /// Missing or empty required input
    Validation(String),
    /// Database error
    DatabaseError(String),
    /// Hashing, signing or task failure
    Internal(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "Not authorized, no token"),
            Self::InvalidToken(_) => write!(f, "Not authorized, invalid token"),
            Self::InvalidCredentials => write!(f, "Invalid email or password"),
            Self::Forbidden => write!(f, "Not authorized, admin role required"),
            Self::UserExists => write!(f, "User already exists"),
            Self::Validation(msg) => write!(f, "Invalid input: {}", msg),
            Self::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InvalidToken(msg) => Self::InvalidToken(msg),
            TokenError::Signing(msg) => Self::Internal(msg),
        }
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(authorization: Option<&str>) -> Option<&str> {
    authorization?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Authentication extractor for HTTP requests.
pub struct AuthExtractor {
    config: AuthConfig,
    user_store: Arc<UserStore>,
    tokens: Arc<TokenService>,
}

impl AuthExtractor {
    /// Create a new auth extractor.
    pub fn new(config: AuthConfig, db: Db) -> Self {
        let tokens = Arc::new(TokenService::new(&config.jwt_secret, config.token_ttl()));
        let user_store = Arc::new(UserStore::new(db, config.bcrypt_cost));

        Self {
            config,
            user_store,
            tokens,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Get reference to the user store.
    pub fn user_store(&self) -> &Arc<UserStore> {
        &self.user_store
    }

    /// Get reference to the token service.
    pub fn tokens(&self) -> &Arc<TokenService> {
        &self.tokens
    }

    /// Issue an identity token for `user_id`.
    pub fn issue_token(&self, user_id: &UserId) -> Result<String, AuthError> {
        Ok(self.tokens.issue(user_id)?)
    }

    /// Extract user context from the `Authorization` header value.
    pub async fn extract_user(&self, authorization: Option<&str>) -> Result<UserContext, AuthError> {
        let token = bearer_token(authorization).ok_or(AuthError::Unauthenticated)?;

        let user_id = self.tokens.validate(token).map_err(|e| {
            warn!("Rejected bearer token: {}", e);
            AuthError::from(e)
        })?;

        let user = self
            .user_store
            .get_user_by_id(&user_id)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?
            .ok_or_else(|| {
                warn!("Token subject {} no longer exists", user_id);
                AuthError::InvalidToken("unknown user".to_string())
            })?;

        debug!("Authenticated user {} ({})", user.uid, user.role);
        Ok(UserContext::from(user))
    }
}
