use std::sync::Arc;

use crate::auth::{AuthExtractor, TokenService, UserStore};
use crate::catalog::Catalog;

/// Shared state handed to every handler. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub auth: Arc<AuthExtractor>,
    pub users: Arc<UserStore>,
    pub tokens: Arc<TokenService>,
    /// Put delete routes behind the admin role gate.
    pub admin_deletes: bool,
}

impl AppState {
    pub fn new(catalog: Catalog, auth: AuthExtractor) -> Self {
        let admin_deletes = auth.config().admin_deletes;
        let users = auth.user_store().clone();
        let tokens = auth.tokens().clone();

        Self {
            catalog: Arc::new(catalog),
            auth: Arc::new(auth),
            users,
            tokens,
            admin_deletes,
        }
    }
}
