//! Author and book catalog.
//!
//! [`Catalog`] owns the rules that tie the two collections together:
//!
//! - a book can only be created or re-pointed to an author that exists
//! - deleting an author deletes its books first
//! - nested routes address a book by (book id, author id) and never reveal
//!   books that belong to another author

mod error;
mod models;
mod service;

pub use error::CatalogError;
pub use models::{
    Author, AuthorPatch, AuthorProfile, AuthorSummary, Book, BookPatch, BookWithAuthor, NewAuthor,
    NewBook,
};
pub use service::{Catalog, CatalogResult};
