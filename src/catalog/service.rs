//! Author and book operations with referential checks.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::catalog::error::CatalogError;
use crate::catalog::models::{
    Author, AuthorPatch, AuthorProfile, AuthorSummary, Book, BookPatch, BookWithAuthor, NewAuthor,
    NewBook,
};
use crate::db::Db;
use crate::db::queries::QueryBuilder;
use crate::db::schema::{AuthorRecord, BookRecord, now};
use crate::types::{AuthorId, BookId};
use crate::utils::{apply_patch, required_text, trimmed_opt};

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Relationship manager for authors and their books.
///
/// Ids arrive as raw path segments; anything that does not parse is treated
/// as an unknown id.
#[derive(Clone)]
pub struct Catalog {
    db: Db,
}

impl Catalog {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    pub async fn create_author(&self, input: NewAuthor) -> CatalogResult<Author> {
        let name = required_text(input.name)
            .ok_or_else(|| CatalogError::Validation("name is required".to_string()))?;

        let created_at = now();
        let record = AuthorRecord {
            uid: AuthorId::generate(),
            name,
            birth_date: input.birth_date,
            nationality: trimmed_opt(input.nationality),
            biography: trimmed_opt(input.biography),
            created_at: created_at.clone(),
            updated_at: created_at,
        };

        let created = QueryBuilder::create_author(&self.db, &record).await?;
        info!("Created author {}", created.uid);
        Ok(created.into())
    }

    pub async fn list_authors(&self) -> CatalogResult<Vec<Author>> {
        let authors = QueryBuilder::list_authors(&self.db).await?;
        Ok(authors.into_iter().map(Author::from).collect())
    }

    pub async fn get_author(&self, id: &str) -> CatalogResult<Author> {
        Ok(self.load_author(id).await?.into())
    }

    /// Apply a partial update. `name` may change but never become empty.
    pub async fn update_author(&self, id: &str, patch: AuthorPatch) -> CatalogResult<Author> {
        let mut record = self.load_author(id).await?;

        if let Some(name) = patch.name {
            record.name = required_text(Some(name))
                .ok_or_else(|| CatalogError::Validation("name cannot be empty".to_string()))?;
        }
        apply_patch(&mut record.birth_date, patch.birth_date);
        apply_patch(&mut record.nationality, patch.nationality.map(trimmed_opt));
        apply_patch(&mut record.biography, patch.biography.map(trimmed_opt));
        record.updated_at = now();

        let updated = QueryBuilder::replace_author(&self.db, &record)
            .await?
            .ok_or(CatalogError::AuthorNotFound)?;
        info!("Updated author {}", updated.uid);
        Ok(updated.into())
    }

    /// Delete an author and every book referencing it.
    ///
    /// Books go first, then the author. The two steps are not atomic; a crash
    /// in between leaves an author with fewer books, never an orphaned book.
    /// Returns the number of books removed.
    pub async fn delete_author(&self, id: &str) -> CatalogResult<usize> {
        let author = self.load_author(id).await?;

        let removed = QueryBuilder::delete_books_by_author(&self.db, &author.uid).await?;
        QueryBuilder::delete_author(&self.db, &author.uid).await?;

        info!("Deleted author {} and {} book(s)", author.uid, removed);
        Ok(removed)
    }

    /// Books referencing the author. A malformed or unknown id yields no books.
    pub async fn list_books_for_author(&self, author_id: &str) -> CatalogResult<Vec<Book>> {
        let Some(author_id) = AuthorId::parse(author_id) else {
            return Ok(Vec::new());
        };

        let books = QueryBuilder::list_books_by_author(&self.db, &author_id).await?;
        Ok(books.into_iter().map(Book::from).collect())
    }

    pub async fn create_book(&self, input: NewBook) -> CatalogResult<Book> {
        let title = required_text(input.title.clone())
            .ok_or_else(|| CatalogError::Validation("title is required".to_string()))?;
        let author_id = required_text(input.author_id.clone())
            .ok_or_else(|| CatalogError::Validation("author_id is required".to_string()))?;

        let author = self.resolve_author(&author_id).await?;
        self.insert_book(title, author, input).await
    }

    /// All books, each with `{ id, name, nationality }` of its author.
    pub async fn list_books(&self) -> CatalogResult<Vec<BookWithAuthor<AuthorSummary>>> {
        let books = QueryBuilder::list_books(&self.db).await?;

        let mut author_ids: Vec<AuthorId> = books.iter().map(|b| b.author_id.clone()).collect();
        author_ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        author_ids.dedup();

        let authors: HashMap<AuthorId, AuthorSummary> =
            QueryBuilder::find_authors(&self.db, author_ids)
                .await?
                .iter()
                .map(|a| (a.uid.clone(), AuthorSummary::from(a)))
                .collect();

        Ok(books
            .into_iter()
            .map(|record| {
                let author = authors.get(&record.author_id).cloned();
                BookWithAuthor {
                    book: record.into(),
                    author,
                }
            })
            .collect())
    }

    /// A single book with `{ id, name, nationality, biography }` of its author.
    pub async fn get_book(&self, id: &str) -> CatalogResult<BookWithAuthor<AuthorProfile>> {
        let record = self.load_book(id).await?;
        let author = QueryBuilder::find_author(&self.db, &record.author_id)
            .await?
            .map(AuthorProfile::from);

        Ok(BookWithAuthor {
            book: record.into(),
            author,
        })
    }

    /// Apply a partial update.
    ///
    /// A changed `author_id` must resolve before anything is written; an
    /// unchanged one is not re-checked.
    pub async fn update_book(&self, id: &str, patch: BookPatch) -> CatalogResult<Book> {
        let mut record = self.load_book(id).await?;

        if let Some(author_id) = required_text(patch.author_id.clone()) {
            let unchanged = AuthorId::parse(&author_id).is_some_and(|a| a == record.author_id);
            if !unchanged {
                let author = self.resolve_author(&author_id).await?;
                debug!("Re-pointing book {} to author {}", record.uid, author.uid);
                record.author_id = author.uid;
            }
        }

        self.save_book(record, patch).await
    }

    pub async fn delete_book(&self, id: &str) -> CatalogResult<()> {
        let id = BookId::parse(id).ok_or(CatalogError::BookNotFound)?;

        if !QueryBuilder::delete_book(&self.db, &id).await? {
            return Err(CatalogError::BookNotFound);
        }

        info!("Deleted book {}", id);
        Ok(())
    }

    /// Create a book under the author named by the path. Any body `author_id`
    /// is ignored.
    pub async fn create_book_for_author(
        &self,
        author_id: &str,
        input: NewBook,
    ) -> CatalogResult<Book> {
        let title = required_text(input.title.clone())
            .ok_or_else(|| CatalogError::Validation("title is required".to_string()))?;

        let author = self.resolve_author(author_id).await?;
        self.insert_book(title, author, input).await
    }

    pub async fn get_book_for_author(
        &self,
        author_id: &str,
        book_id: &str,
    ) -> CatalogResult<BookWithAuthor<AuthorSummary>> {
        let record = self.load_book_for_author(author_id, book_id).await?;
        let author = QueryBuilder::find_author(&self.db, &record.author_id)
            .await?
            .as_ref()
            .map(AuthorSummary::from);

        Ok(BookWithAuthor {
            book: record.into(),
            author,
        })
    }

    /// Update a book within its author's scope. The owner cannot change here.
    pub async fn update_book_for_author(
        &self,
        author_id: &str,
        book_id: &str,
        patch: BookPatch,
    ) -> CatalogResult<Book> {
        let record = self.load_book_for_author(author_id, book_id).await?;
        self.save_book(record, patch).await
    }

    pub async fn delete_book_for_author(&self, author_id: &str, book_id: &str) -> CatalogResult<()> {
        let record = self.load_book_for_author(author_id, book_id).await?;

        if !QueryBuilder::delete_book(&self.db, &record.uid).await? {
            return Err(CatalogError::BookNotFoundForAuthor);
        }

        info!("Deleted book {} of author {}", record.uid, record.author_id);
        Ok(())
    }

    async fn load_author(&self, id: &str) -> CatalogResult<AuthorRecord> {
        let id = AuthorId::parse(id).ok_or(CatalogError::AuthorNotFound)?;
        QueryBuilder::find_author(&self.db, &id)
            .await?
            .ok_or(CatalogError::AuthorNotFound)
    }

    /// Look up the author a book write refers to.
    async fn resolve_author(&self, id: &str) -> CatalogResult<AuthorRecord> {
        let id = AuthorId::parse(id).ok_or(CatalogError::AuthorMissing)?;
        QueryBuilder::find_author(&self.db, &id)
            .await?
            .ok_or(CatalogError::AuthorMissing)
    }

    async fn load_book(&self, id: &str) -> CatalogResult<BookRecord> {
        let id = BookId::parse(id).ok_or(CatalogError::BookNotFound)?;
        QueryBuilder::find_book(&self.db, &id)
            .await?
            .ok_or(CatalogError::BookNotFound)
    }

    async fn load_book_for_author(&self, author_id: &str, book_id: &str) -> CatalogResult<BookRecord> {
        let (Some(author_id), Some(book_id)) = (AuthorId::parse(author_id), BookId::parse(book_id))
        else {
            return Err(CatalogError::BookNotFoundForAuthor);
        };

        QueryBuilder::find_book_for_author(&self.db, &book_id, &author_id)
            .await?
            .ok_or(CatalogError::BookNotFoundForAuthor)
    }

    async fn insert_book(
        &self,
        title: String,
        author: AuthorRecord,
        input: NewBook,
    ) -> CatalogResult<Book> {
        let created_at = now();
        let record = BookRecord {
            uid: BookId::generate(),
            title,
            isbn: trimmed_opt(input.isbn),
            publication_date: input.publication_date,
            genre: trimmed_opt(input.genre),
            author_id: author.uid,
            created_at: created_at.clone(),
            updated_at: created_at,
        };

        let created = QueryBuilder::create_book(&self.db, &record).await?;
        info!("Created book {} for author {}", created.uid, created.author_id);
        Ok(created.into())
    }

    /// Merge the non-owner fields of `patch` into `record` and persist it.
    async fn save_book(&self, mut record: BookRecord, patch: BookPatch) -> CatalogResult<Book> {
        if let Some(title) = patch.title {
            record.title = required_text(Some(title))
                .ok_or_else(|| CatalogError::Validation("title cannot be empty".to_string()))?;
        }
        apply_patch(&mut record.isbn, patch.isbn.map(trimmed_opt));
        apply_patch(&mut record.publication_date, patch.publication_date);
        apply_patch(&mut record.genre, patch.genre.map(trimmed_opt));
        record.updated_at = now();

        let updated = QueryBuilder::replace_book(&self.db, &record)
            .await?
            .ok_or(CatalogError::BookNotFound)?;
        info!("Updated book {}", updated.uid);
        Ok(updated.into())
    }
}
