//! Credential storage and verification.

use anyhow::Result;
use tracing::{info, warn};

use crate::auth::extractor::AuthError;
use crate::db::Db;
use crate::db::schema::{USER_TABLE, UserCreate, UserRecord, now};
use crate::types::UserId;

/// Normalize an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// User store for database operations.
pub struct UserStore {
    db: Db,
    bcrypt_cost: u32,
}

impl UserStore {
    /// Create a new user store hashing passwords with the given bcrypt cost.
    pub fn new(db: Db, bcrypt_cost: u32) -> Self {
        Self { db, bcrypt_cost }
    }

    /// Get a user by email (normalized before lookup).
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let email = normalize_email(email);

        let query = r#"
            SELECT * FROM user
            WHERE email = $email
            LIMIT 1
        "#;

        let mut res = self.db.query(query).bind(("email", email)).await?;

        let users: Vec<UserRecord> = res.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Get a user by id.
    pub async fn get_user_by_id(&self, user_id: &UserId) -> Result<Option<UserRecord>> {
        let user: Option<UserRecord> = self.db.select((USER_TABLE, user_id.to_string())).await?;
        Ok(user)
    }

    /// Create a new user with a bcrypt-hashed password.
    ///
    /// Fails with [`AuthError::UserExists`] when the email is already registered.
    pub async fn create_user(&self, create: &UserCreate) -> Result<UserRecord, AuthError> {
        let email = normalize_email(&create.email);
        if email.is_empty() {
            return Err(AuthError::Validation("email is required".to_string()));
        }
        if create.password.is_empty() {
            return Err(AuthError::Validation("password is required".to_string()));
        }

        if self
            .get_user_by_email(&email)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?
            .is_some()
        {
            return Err(AuthError::UserExists);
        }

        let password_hash = self.hash_password(create.password.clone()).await?;

        let record = UserRecord {
            uid: UserId::generate(),
            name: create
                .name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            email: email.clone(),
            password_hash,
            role: create.role,
            created_at: now(),
        };

        let created: Result<Option<UserRecord>, surrealdb::Error> = self
            .db
            .create((USER_TABLE, record.uid.to_string()))
            .content(record.clone())
            .await;

        match created {
            Ok(Some(user)) => {
                info!("Created user {} ({})", user.uid, user.role);
                Ok(user)
            }
            Ok(None) => Err(AuthError::DatabaseError("failed to create user".to_string())),
            Err(e) => {
                // The unique email index rejects a concurrent registration that won the race
                if let Ok(Some(_)) = self.get_user_by_email(&email).await {
                    return Err(AuthError::UserExists);
                }
                Err(AuthError::DatabaseError(e.to_string()))
            }
        }
    }

    /// Create the user unless the email is already registered.
    ///
    /// Used to bootstrap an administrator; an existing account is returned
    /// unchanged.
    pub async fn ensure_user(&self, create: &UserCreate) -> Result<UserRecord, AuthError> {
        match self.create_user(create).await {
            Err(AuthError::UserExists) => {
                let existing = self
                    .get_user_by_email(&create.email)
                    .await
                    .map_err(|e| AuthError::DatabaseError(e.to_string()))?
                    .ok_or(AuthError::UserExists)?;
                if existing.role != create.role {
                    warn!(
                        "User {} already exists with role {}, expected {}",
                        existing.email, existing.role, create.role
                    );
                }
                Ok(existing)
            }
            other => other,
        }
    }

    /// Check an email/password pair.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserRecord, AuthError> {
        let user = self
            .get_user_by_email(email)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;

        let hash = user.password_hash.clone();
        let password = password.to_string();
        let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .map_err(|e| AuthError::Internal(format!("password verification failed: {}", e)))?;

        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .map_err(|e| AuthError::Internal(format!("password hashing failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_db;
    use crate::types::Role;

    const TEST_COST: u32 = 4;

    fn signup(email: &str, password: &str) -> UserCreate {
        UserCreate {
            name: Some("Test User".to_string()),
            email: email.to_string(),
            password: password.to_string(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let store = UserStore::new(memory_db().await, TEST_COST);

        let user = store.create_user(&signup("a@b.com", "p")).await.unwrap();
        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.role, Role::User);
        assert_ne!(user.password_hash, "p");
        assert!(user.password_hash.starts_with("$2"));

        let by_id = store.get_user_by_id(&user.uid).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@b.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = UserStore::new(memory_db().await, TEST_COST);

        store.create_user(&signup("a@b.com", "p")).await.unwrap();
        let err = store
            .create_user(&signup(" A@B.com ", "other"))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::UserExists);
    }

    #[tokio::test]
    async fn test_missing_fields_rejected() {
        let store = UserStore::new(memory_db().await, TEST_COST);

        let err = store.create_user(&signup("  ", "p")).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        let err = store.create_user(&signup("a@b.com", "")).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn test_verify_credentials() {
        let store = UserStore::new(memory_db().await, TEST_COST);
        store.create_user(&signup("a@b.com", "secret")).await.unwrap();

        let user = store.verify_credentials("A@B.COM", "secret").await.unwrap();
        assert_eq!(user.email, "a@b.com");

        let wrong = store.verify_credentials("a@b.com", "nope").await.unwrap_err();
        assert_eq!(wrong, AuthError::InvalidCredentials);

        let unknown = store.verify_credentials("x@y.com", "secret").await.unwrap_err();
        assert_eq!(unknown, AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_ensure_user_is_idempotent() {
        let store = UserStore::new(memory_db().await, TEST_COST);
        let admin = UserCreate {
            name: None,
            email: "admin@example.com".to_string(),
            password: "admin".to_string(),
            role: Role::Admin,
        };

        let first = store.ensure_user(&admin).await.unwrap();
        let second = store.ensure_user(&admin).await.unwrap();
        assert_eq!(first.uid, second.uid);
        assert_eq!(second.role, Role::Admin);
    }
}
