//! Record reference bindings: collection and document identification.
//!
//! This module defines strong types for naming collections in the external
//! document store (`CollectionId`) and addressing individual documents
//! within them (`DocumentId`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for `CollectionId` parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid collection id: {0}")]
pub struct ParseCollectionIdError(String);

/// Named handle to a collection in the external document store.
///
/// A collection id is the store-side name of a group of documents:
/// - `"event"`
/// - `"guest"`
/// - `"event-id"` (the companion code-registry collection)
///
/// # Design
///
/// `CollectionId` is a newtype wrapper around `String` that provides:
/// - Type safety (can't accidentally use a regular string)
/// - Clear intent in function signatures
/// - Serialization support for storage
///
/// # Validation
///
/// - `FromStr::from_str()`: Validates input (rejects empty strings)
/// - `From::from()` and `new()`: No validation (for internal use with trusted input)
///
/// Use `FromStr` when parsing external/user input. Use `new()` or `From`
/// when constructing collection ids from application-controlled data.
///
/// # Examples
///
/// ```
/// use vowsuite_core::collection::CollectionId;
///
/// let guests = CollectionId::new("guest");
/// assert_eq!(guests.as_str(), "guest");
///
/// let parsed: CollectionId = "event".parse().unwrap();
/// assert_eq!(parsed, CollectionId::new("event"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionId(String);

impl CollectionId {
    /// Create a new `CollectionId` from a string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the collection id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert the `CollectionId` into its inner `String`.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CollectionId {
    type Err = ParseCollectionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseCollectionIdError(
                "Collection id cannot be empty".to_string(),
            ));
        }
        Ok(Self(s.to_string()))
    }
}

impl From<String> for CollectionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CollectionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for CollectionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Store-assigned identifier of a single document.
///
/// Document ids are opaque strings minted by the document store when a
/// record is added. The application never derives meaning from their
/// contents; it only passes them back for deletion and keeps them as
/// list keys.
///
/// # Examples
///
/// ```
/// use vowsuite_core::collection::DocumentId;
///
/// let id = DocumentId::new("b9c2a1e4");
/// assert_eq!(id.as_str(), "b9c2a1e4");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a new `DocumentId` from a string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the document id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert the `DocumentId` into its inner `String`.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod collection_id_tests {
        use super::*;

        #[test]
        fn new_creates_collection_id() {
            let id = CollectionId::new("event");
            assert_eq!(id.as_str(), "event");
        }

        #[test]
        fn from_string() {
            let id = CollectionId::from("guest");
            assert_eq!(id.as_str(), "guest");

            let id2 = CollectionId::from("budget".to_string());
            assert_eq!(id2.as_str(), "budget");
        }

        #[test]
        #[allow(clippy::expect_used)] // Panics: Test will fail if parse fails
        fn parse_from_str() {
            let id: CollectionId = "event-id".parse().expect("parse should succeed");
            assert_eq!(id, CollectionId::new("event-id"));
        }

        #[test]
        fn parse_empty_string_fails() {
            let result = "".parse::<CollectionId>();
            assert!(result.is_err());
        }

        #[test]
        fn display() {
            let id = CollectionId::new("guest-id");
            assert_eq!(format!("{id}"), "guest-id");
        }

        #[test]
        fn equality() {
            let id1 = CollectionId::new("event");
            let id2 = CollectionId::new("event");
            let id3 = CollectionId::new("guest");

            assert_eq!(id1, id2);
            assert_ne!(id1, id3);
        }

        #[test]
        fn into_inner() {
            let id = CollectionId::new("event");
            assert_eq!(id.into_inner(), "event");
        }
    }

    mod document_id_tests {
        use super::*;

        #[test]
        fn new_creates_document_id() {
            let id = DocumentId::new("abc-123");
            assert_eq!(id.as_str(), "abc-123");
        }

        #[test]
        fn display() {
            let id = DocumentId::new("abc-123");
            assert_eq!(format!("{id}"), "abc-123");
        }

        #[test]
        fn equality() {
            assert_eq!(DocumentId::new("a"), DocumentId::new("a"));
            assert_ne!(DocumentId::new("a"), DocumentId::new("b"));
        }
    }
}
