// Record-level SurrealDB access for the author and book tables.
//
// Everything here is a single storage round trip. Integrity rules between the
// two tables live in `crate::catalog`, not here.

use crate::db::schema::*;
use crate::db::Db;
use crate::types::{AuthorId, BookId};
use anyhow::{anyhow, Result};

pub struct QueryBuilder;

impl QueryBuilder {
    /// Insert a new author record keyed by its `uid`.
    pub async fn create_author(db: &Db, record: &AuthorRecord) -> Result<AuthorRecord> {
        let created: Option<AuthorRecord> = db
            .create((AUTHOR_TABLE, record.uid.to_string()))
            .content(record.clone())
            .await?;

        created.ok_or_else(|| anyhow!("failed to create author record"))
    }

    pub async fn find_author(db: &Db, id: &AuthorId) -> Result<Option<AuthorRecord>> {
        let author: Option<AuthorRecord> = db.select((AUTHOR_TABLE, id.to_string())).await?;
        Ok(author)
    }

    /// Fetch all authors whose ids are in `ids`. Unknown ids are skipped.
    pub async fn find_authors(db: &Db, ids: Vec<AuthorId>) -> Result<Vec<AuthorRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut res = db
            .query("SELECT * FROM author WHERE uid IN $ids")
            .bind(("ids", ids))
            .await?;

        let authors: Vec<AuthorRecord> = res.take(0)?;
        Ok(authors)
    }

    pub async fn list_authors(db: &Db) -> Result<Vec<AuthorRecord>> {
        let mut res = db
            .query("SELECT * FROM author ORDER BY created_at ASC")
            .await?;

        let authors: Vec<AuthorRecord> = res.take(0)?;
        Ok(authors)
    }

    /// Replace the stored author with `record`. Returns `None` if it no longer exists.
    pub async fn replace_author(db: &Db, record: &AuthorRecord) -> Result<Option<AuthorRecord>> {
        if Self::find_author(db, &record.uid).await?.is_none() {
            return Ok(None);
        }

        let updated: Option<AuthorRecord> = db
            .update((AUTHOR_TABLE, record.uid.to_string()))
            .content(record.clone())
            .await?;
        Ok(updated)
    }

    /// Delete an author record. Returns whether a record was removed.
    pub async fn delete_author(db: &Db, id: &AuthorId) -> Result<bool> {
        let deleted: Option<AuthorRecord> = db.delete((AUTHOR_TABLE, id.to_string())).await?;
        Ok(deleted.is_some())
    }

    /// Insert a new book record keyed by its `uid`.
    pub async fn create_book(db: &Db, record: &BookRecord) -> Result<BookRecord> {
        let created: Option<BookRecord> = db
            .create((BOOK_TABLE, record.uid.to_string()))
            .content(record.clone())
            .await?;

        created.ok_or_else(|| anyhow!("failed to create book record"))
    }

    pub async fn find_book(db: &Db, id: &BookId) -> Result<Option<BookRecord>> {
        let book: Option<BookRecord> = db.select((BOOK_TABLE, id.to_string())).await?;
        Ok(book)
    }

    /// Find a book by the compound key (book id, author id).
    ///
    /// A book that exists under a different author is reported as `None`,
    /// exactly like an unknown book.
    pub async fn find_book_for_author(
        db: &Db,
        id: &BookId,
        author_id: &AuthorId,
    ) -> Result<Option<BookRecord>> {
        let book = Self::find_book(db, id).await?;
        Ok(book.filter(|b| &b.author_id == author_id))
    }

    pub async fn list_books(db: &Db) -> Result<Vec<BookRecord>> {
        let mut res = db
            .query("SELECT * FROM book ORDER BY created_at ASC")
            .await?;

        let books: Vec<BookRecord> = res.take(0)?;
        Ok(books)
    }

    pub async fn list_books_by_author(db: &Db, author_id: &AuthorId) -> Result<Vec<BookRecord>> {
        let mut res = db
            .query(
                r#"
                SELECT * FROM book
                WHERE author_id = $author_id
                ORDER BY created_at ASC
                "#,
            )
            .bind(("author_id", author_id.clone()))
            .await?;

        let books: Vec<BookRecord> = res.take(0)?;
        Ok(books)
    }

    /// Replace the stored book with `record`. Returns `None` if it no longer exists.
    pub async fn replace_book(db: &Db, record: &BookRecord) -> Result<Option<BookRecord>> {
        if Self::find_book(db, &record.uid).await?.is_none() {
            return Ok(None);
        }

        let updated: Option<BookRecord> = db
            .update((BOOK_TABLE, record.uid.to_string()))
            .content(record.clone())
            .await?;
        Ok(updated)
    }

    /// Delete a book record. Returns whether a record was removed.
    pub async fn delete_book(db: &Db, id: &BookId) -> Result<bool> {
        let deleted: Option<BookRecord> = db.delete((BOOK_TABLE, id.to_string())).await?;
        Ok(deleted.is_some())
    }

    /// Delete every book referencing `author_id`. Returns the number removed.
    pub async fn delete_books_by_author(db: &Db, author_id: &AuthorId) -> Result<usize> {
        let mut res = db
            .query("DELETE book WHERE author_id = $author_id RETURN BEFORE")
            .bind(("author_id", author_id.clone()))
            .await?;

        let removed: Vec<BookRecord> = res.take(0)?;
        Ok(removed.len())
    }
}
