//! User context for request-scoped identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::schema::UserRecord;
use crate::types::{Role, UserId};

/// Identity attached to a request by the auth gate.
///
/// Built from a stored user with the password hash left behind. It is
/// immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    id: UserId,
    name: Option<String>,
    email: String,
    role: Role,
    created_at: DateTime<Utc>,
}

impl UserContext {
    /// Create a new user context.
    pub fn new(
        id: UserId,
        name: Option<String>,
        email: String,
        role: Role,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            role,
            created_at,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Get a display-friendly name for this user.
    pub fn display(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

impl From<UserRecord> for UserContext {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.uid,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: *user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::now;

    fn record(role: Role, name: Option<&str>) -> UserRecord {
        UserRecord {
            uid: UserId::generate(),
            name: name.map(str::to_string),
            email: "user@example.com".to_string(),
            password_hash: "$2b$04$hash".to_string(),
            role,
            created_at: now(),
        }
    }

    #[test]
    fn test_context_from_record_drops_password() {
        let user = record(Role::User, Some("Test User"));
        let uid = user.uid.clone();
        let ctx = UserContext::from(user);

        assert_eq!(ctx.user_id(), &uid);
        assert_eq!(ctx.email(), "user@example.com");
        assert_eq!(ctx.name(), Some("Test User"));
        assert!(!ctx.is_admin());

        let json = serde_json::to_value(&ctx).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "user");
    }

    #[test]
    fn test_context_display() {
        let named = UserContext::from(record(Role::Admin, Some("Root")));
        assert_eq!(named.display(), "Root");
        assert!(named.is_admin());

        let unnamed = UserContext::from(record(Role::User, None));
        assert_eq!(unnamed.display(), "user@example.com");
    }
}
