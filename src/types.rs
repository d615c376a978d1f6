//! NewType wrappers for strong typing throughout the service.
//!
//! These types prevent accidental mixing of semantically different ids
//! (e.g., passing a book id where an author id is expected).

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Macro to generate a record identifier NewType with standard trait implementations.
///
/// Identifiers are UUIDs rendered in hyphenated form. They double as the
/// SurrealDB record key, so the same string addresses a record and is
/// returned to clients.
macro_rules! newtype_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Parse a client-supplied identifier.
            ///
            /// Returns `None` when the value is not a well-formed UUID. The
            /// value is normalized to lower-case hyphenated form so that
            /// equivalent spellings address the same record.
            pub fn parse(value: &str) -> Option<Self> {
                Uuid::parse_str(value.trim())
                    .ok()
                    .map(|uuid| Self(uuid.hyphenated().to_string()))
            }

            /// Get the inner value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner String.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

newtype_id!(
    /// Identifier of an author record (table: `author`).
    AuthorId
);

newtype_id!(
    /// Identifier of a book record (table: `book`).
    BookId
);

newtype_id!(
    /// Identifier of a user account (table: `user`).
    ///
    /// This is the `sub` claim of every issued identity token.
    UserId
);

/// Role attached to a user identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access, including operations behind the role gate.
    Admin,
    /// Standard account created by registration.
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
