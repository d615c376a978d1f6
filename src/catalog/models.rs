//! Request and response shapes for authors and books.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::db::schema::{AuthorRecord, BookRecord};
use crate::types::{AuthorId, BookId};
use crate::utils::double_option;

/// An author as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub biography: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AuthorRecord> for Author {
    fn from(record: AuthorRecord) -> Self {
        Self {
            id: record.uid,
            name: record.name,
            birth_date: record.birth_date,
            nationality: record.nationality,
            biography: record.biography,
            created_at: *record.created_at,
            updated_at: *record.updated_at,
        }
    }
}

/// A book as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub isbn: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub genre: Option<String>,
    pub author_id: AuthorId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BookRecord> for Book {
    fn from(record: BookRecord) -> Self {
        Self {
            id: record.uid,
            title: record.title,
            isbn: record.isbn,
            publication_date: record.publication_date,
            genre: record.genre,
            author_id: record.author_id,
            created_at: *record.created_at,
            updated_at: *record.updated_at,
        }
    }
}

/// Author fields embedded in book listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: AuthorId,
    pub name: String,
    pub nationality: Option<String>,
}

impl From<&AuthorRecord> for AuthorSummary {
    fn from(record: &AuthorRecord) -> Self {
        Self {
            id: record.uid.clone(),
            name: record.name.clone(),
            nationality: record.nationality.clone(),
        }
    }
}

/// Author fields embedded in a single book lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub id: AuthorId,
    pub name: String,
    pub nationality: Option<String>,
    pub biography: Option<String>,
}

impl From<AuthorRecord> for AuthorProfile {
    fn from(record: AuthorRecord) -> Self {
        Self {
            id: record.uid,
            name: record.name,
            nationality: record.nationality,
            biography: record.biography,
        }
    }
}

/// A book together with a projection of its author.
///
/// `author` is `null` when the referenced author no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookWithAuthor<A> {
    #[serde(flatten)]
    pub book: Book,
    pub author: Option<A>,
}

/// Body of an author create request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAuthor {
    pub name: Option<String>,
    #[serde(default, alias = "birthDate")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub biography: Option<String>,
}

/// Body of an author update request.
///
/// Omitted fields keep their value; `null` clears an optional field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "birthDate", deserialize_with = "double_option")]
    pub birth_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub nationality: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub biography: Option<Option<String>>,
}

/// Body of a book create request.
///
/// On nested routes the author comes from the path and `author_id` is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBook {
    pub title: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default, alias = "publicationDate")]
    pub publication_date: Option<NaiveDate>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default, alias = "AutorId", alias = "authorId")]
    pub author_id: Option<String>,
}

/// Body of a book update request.
///
/// `author_id` re-points the book; nested routes ignore it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub isbn: Option<Option<String>>,
    #[serde(
        default,
        alias = "publicationDate",
        deserialize_with = "double_option"
    )]
    pub publication_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub genre: Option<Option<String>>,
    #[serde(default, alias = "AutorId", alias = "authorId")]
    pub author_id: Option<String>,
}
