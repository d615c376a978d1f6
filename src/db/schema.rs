use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use surrealdb::sql::Datetime;

use crate::types::{AuthorId, BookId, Role, UserId};

pub const AUTHOR_TABLE: &str = "author";
pub const BOOK_TABLE: &str = "book";
pub const USER_TABLE: &str = "user";

/// Current time as a SurrealDB datetime.
pub fn now() -> Datetime {
    Datetime::from(chrono::Utc::now())
}

/// Persisted representation of an author (table: `author`).
///
/// The record key equals `uid`; the copy in the body lets queries return the
/// identifier without decoding SurrealDB record ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorRecord {
    pub uid: AuthorId,
    /// Display name, never empty.
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub biography: Option<String>,
    pub created_at: Datetime,
    pub updated_at: Datetime,
}

/// Persisted representation of a book (table: `book`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRecord {
    pub uid: BookId,
    /// Title, never empty.
    pub title: String,
    pub isbn: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub genre: Option<String>,
    /// Owning author. Checked against the `author` table on every write that
    /// sets it; the database does not enforce it.
    pub author_id: AuthorId,
    pub created_at: Datetime,
    pub updated_at: Datetime,
}

/// Persisted user account (table: `user`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub uid: UserId,
    /// Optional display name
    pub name: Option<String>,
    /// Unique, trimmed and lower-cased
    pub email: String,
    /// bcrypt hash; never leaves the credential store
    pub password_hash: String,
    #[serde(default)]
    pub role: Role,
    pub created_at: Datetime,
}

/// Payload for creating a new user.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub name: Option<String>,
    pub email: String,
    pub password: String,
    pub role: Role,
}
