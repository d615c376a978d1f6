//! Error types for catalog operations.

use std::fmt;

/// Errors that can occur while reading or changing authors and books.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A required field is missing or empty.
    Validation(String),

    /// The author id is unknown or malformed.
    AuthorNotFound,

    /// The book id is unknown or malformed.
    BookNotFound,

    /// A book write referenced an author that cannot be resolved.
    AuthorMissing,

    /// The (book id, author id) pair does not name a book.
    ///
    /// Covers an unknown book, a book owned by another author and malformed
    /// ids alike.
    BookNotFoundForAuthor,

    /// Database error occurred.
    Database(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "{}", msg),
            Self::AuthorNotFound => write!(f, "Author not found"),
            Self::BookNotFound => write!(f, "Book not found"),
            Self::AuthorMissing => write!(f, "Author does not exist"),
            Self::BookNotFoundForAuthor => write!(f, "Book not found for this author"),
            Self::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl CatalogError {
    /// Whether this error maps to a missing resource.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::AuthorNotFound
                | Self::BookNotFound
                | Self::AuthorMissing
                | Self::BookNotFoundForAuthor
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(CatalogError::AuthorNotFound.to_string(), "Author not found");
        assert_eq!(CatalogError::AuthorMissing.to_string(), "Author does not exist");
        assert_eq!(
            CatalogError::BookNotFoundForAuthor.to_string(),
            "Book not found for this author"
        );
        assert_eq!(
            CatalogError::Validation("title is required".to_string()).to_string(),
            "title is required"
        );
    }

    #[test]
    fn test_not_found_kinds() {
        assert!(CatalogError::BookNotFound.is_not_found());
        assert!(CatalogError::AuthorMissing.is_not_found());
        assert!(!CatalogError::Validation("x".to_string()).is_not_found());
        assert!(!CatalogError::Database("x".to_string()).is_not_found());
    }
}
