use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use surrealdb::engine::any::Any;
use surrealdb::opt::auth::Root;
use surrealdb::Surreal;

pub type Db = Surreal<Any>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: env::var("SURREALDB_URL")
                .unwrap_or_else(|_| "memory".to_string()),
            namespace: env::var("SURREALDB_NAMESPACE")
                .unwrap_or_else(|_| "library".to_string()),
            database: env::var("SURREALDB_DATABASE")
                .unwrap_or_else(|_| "catalog".to_string()),
            username: env::var("SURREALDB_USERNAME").ok(),
            password: env::var("SURREALDB_PASSWORD").ok(),
        }
    }
}

pub async fn create_connection(config: DatabaseConfig) -> Result<Db> {
    let db = surrealdb::engine::any::connect(config.url).await?;

    // Sign in if credentials are provided
    if let (Some(username), Some(password)) = (config.username, config.password) {
        db.signin(Root {
            username: &username,
            password: &password,
        })
        .await?;
    }

    db.use_ns(config.namespace).use_db(config.database).await?;

    Ok(db)
}

/// Define tables and indexes. Safe to run against an already initialized database.
pub async fn ensure_schema(db: &Db) -> Result<()> {
    let schema_queries = [
        // Authors
        "DEFINE TABLE IF NOT EXISTS author SCHEMALESS;
         DEFINE INDEX IF NOT EXISTS author_created_at ON TABLE author COLUMNS created_at;",

        // Books reference authors by id; integrity is checked by the catalog, not the database
        "DEFINE TABLE IF NOT EXISTS book SCHEMALESS;
         DEFINE INDEX IF NOT EXISTS book_author_id ON TABLE book COLUMNS author_id;
         DEFINE INDEX IF NOT EXISTS book_created_at ON TABLE book COLUMNS created_at;",

        // Credentials
        "DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
         DEFINE INDEX IF NOT EXISTS user_email ON TABLE user COLUMNS email UNIQUE;",
    ];

    for query in schema_queries {
        db.query(query).await?.check()?;
    }

    Ok(())
}

#[cfg(test)]
pub(crate) async fn memory_db() -> Db {
    let config = DatabaseConfig {
        url: "memory".to_string(),
        ..Default::default()
    };
    let db = create_connection(config).await.unwrap();
    ensure_schema(&db).await.unwrap();
    db
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let db = memory_db().await;
        ensure_schema(&db).await.unwrap();
        ensure_schema(&db).await.unwrap();
    }
}
