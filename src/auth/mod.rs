//! Authentication and user context module.
//!
//! Users register with an email and password; the password is stored as a
//! bcrypt hash. A successful registration or login returns an HS256 identity
//! token which protected routes accept as `Authorization: Bearer <token>`.
//!
//! ## Request flow
//!
//! - [`middleware::require_auth`] validates the token with [`TokenService`]
//! - the token subject is loaded through [`UserStore`]; deleted users are rejected
//! - the resulting [`UserContext`] is stored in the request extensions
//! - [`middleware::require_admin`] optionally checks the role afterwards

mod context;
mod extractor;
pub mod middleware;
mod token;
mod user_store;

pub use context::UserContext;
pub use extractor::{AuthConfig, AuthError, AuthExtractor, bearer_token};
pub use token::{DEFAULT_TOKEN_TTL_HOURS, TokenClaims, TokenError, TokenService};
pub use user_store::{UserStore, normalize_email};
