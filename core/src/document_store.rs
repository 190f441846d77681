//! Document store trait and related types.
//!
//! This module defines the core abstraction over the external document
//! database: collections of schemaless JSON documents with store-assigned
//! ids, equality-filtered queries, delete-by-id, and live change
//! subscriptions that deliver the full collection on every remote change.
//!
//! # Design
//!
//! The `DocumentStore` trait is deliberately minimal. It provides exactly
//! the operations the planning workflow consumes:
//!
//! - Add a document to a collection
//! - Query documents matching field-equality predicates
//! - Delete a document by id
//! - Watch a collection for changes (full snapshots, not diffs)
//!
//! There is no update operation, no ordering, no range queries, and no
//! transactions: the hosted store this models exposes no uniqueness
//! constraints or cross-document atomicity, so none are promised here.
//!
//! # Implementations
//!
//! - `InMemoryDocumentStore` (in `vowsuite-memstore` crate): development
//!   and testing
//!
//! # Dyn Compatibility
//!
//! This trait uses explicit `Pin<Box<dyn Future>>` returns instead of
//! `async fn` to enable trait object usage (`Arc<dyn DocumentStore>`).
//! This is required for the effect system where reducers create effects
//! that capture the store.
//!
//! # Example
//!
//! ```no_run
//! use vowsuite_core::collection::CollectionId;
//! use vowsuite_core::document_store::{DocumentStore, DocumentStoreError, FieldFilter};
//! use serde_json::json;
//!
//! async fn example(store: &dyn DocumentStore) -> Result<(), DocumentStoreError> {
//!     let guests = CollectionId::new("guest");
//!
//!     let id = store.add(guests.clone(), json!({"firstName": "Ann"})).await?;
//!
//!     let matches = store
//!         .find(guests.clone(), vec![FieldFilter::equals("firstName", json!("Ann"))])
//!         .await?;
//!     assert_eq!(matches.len(), 1);
//!
//!     store.delete(guests, id).await?;
//!     Ok(())
//! }
//! ```

use crate::collection::{CollectionId, DocumentId};
use futures::Stream;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors that can occur during document store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentStoreError {
    /// Could not reach the store at all.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A write was rejected by the store.
    #[error("Write failed for collection '{collection}': {reason}")]
    WriteFailed {
        /// The collection that rejected the write
        collection: CollectionId,
        /// The reason for failure
        reason: String,
    },

    /// A query was rejected by the store.
    #[error("Query failed for collection '{collection}': {reason}")]
    QueryFailed {
        /// The collection that rejected the query
        collection: CollectionId,
        /// The reason for failure
        reason: String,
    },

    /// A delete was rejected by the store.
    #[error("Delete failed for collection '{collection}': {reason}")]
    DeleteFailed {
        /// The collection that rejected the delete
        collection: CollectionId,
        /// The reason for failure
        reason: String,
    },

    /// The addressed document does not exist.
    #[error("Document '{id}' not found in collection '{collection}'")]
    NotFound {
        /// The collection that was searched
        collection: CollectionId,
        /// The missing document id
        id: DocumentId,
    },

    /// A watch subscription could not be established.
    #[error("Subscription failed for collection '{collection}': {reason}")]
    SubscriptionFailed {
        /// The collection that could not be watched
        collection: CollectionId,
        /// The reason for failure
        reason: String,
    },

    /// A record could not be converted to or from its document form.
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),
}

/// A single document: store-assigned id plus schemaless payload.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Document {
    /// Store-assigned document id.
    pub id: DocumentId,

    /// The document payload as stored.
    pub data: Value,
}

impl Document {
    /// Create a document from its id and payload.
    #[must_use]
    pub const fn new(id: DocumentId, data: Value) -> Self {
        Self { id, data }
    }

    /// Check whether this document satisfies every filter.
    ///
    /// A filter matches when the named top-level field exists and equals
    /// the filter value exactly. Missing fields never match.
    #[must_use]
    pub fn matches(&self, filters: &[FieldFilter]) -> bool {
        filters
            .iter()
            .all(|filter| self.data.get(&filter.field) == Some(&filter.equals))
    }
}

/// Field-equality predicate for queries.
///
/// The store this models only supports equality matches on top-level
/// fields, so that is all this type expresses.
///
/// # Examples
///
/// ```
/// use vowsuite_core::document_store::FieldFilter;
/// use serde_json::json;
///
/// let filter = FieldFilter::equals("lastName", json!("Lee"));
/// assert_eq!(filter.field, "lastName");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FieldFilter {
    /// Top-level field name to compare.
    pub field: String,

    /// Value the field must equal.
    pub equals: Value,
}

impl FieldFilter {
    /// Create an equality filter on a top-level field.
    #[must_use]
    pub fn equals(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            equals: value,
        }
    }
}

/// Full state of a collection at one point in time.
///
/// Watch subscriptions deliver these wholesale: the consumer replaces its
/// local list with `documents` on every item, it never applies diffs.
#[derive(Clone, Debug, PartialEq)]
pub struct CollectionSnapshot {
    /// The collection this snapshot describes.
    pub collection: CollectionId,

    /// Every document currently in the collection.
    pub documents: Vec<Document>,
}

impl CollectionSnapshot {
    /// Number of documents in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the collection was empty at snapshot time.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Stream of collection snapshots from a watch subscription.
///
/// The stream yields the current contents immediately on subscribe, then
/// one snapshot per remote change (insert or delete by any client). It is
/// infinite until dropped or cancelled.
pub type SnapshotStream = Pin<Box<dyn Stream<Item = CollectionSnapshot> + Send>>;

/// Document store abstraction.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to be safely captured by effect
/// futures and shared across tasks.
///
/// # Consistency
///
/// The store promises nothing across operations: a `find` followed by an
/// `add` is a check-then-act sequence that can race with other clients.
/// Callers that rely on the pair (the duplicate-guest check) accept that
/// race; it is documented, not hidden.
pub trait DocumentStore: Send + Sync {
    /// Add a document to a collection.
    ///
    /// # Returns
    ///
    /// The store-assigned id of the new document.
    ///
    /// # Errors
    ///
    /// - `WriteFailed`: the store rejected the write
    /// - `ConnectionFailed`: the store was unreachable
    fn add(
        &self,
        collection: CollectionId,
        document: Value,
    ) -> Pin<Box<dyn Future<Output = Result<DocumentId, DocumentStoreError>> + Send + '_>>;

    /// Query documents matching every filter.
    ///
    /// Filters are combined with AND semantics. An empty filter list
    /// returns the whole collection.
    ///
    /// # Errors
    ///
    /// - `QueryFailed`: the store rejected the query
    /// - `ConnectionFailed`: the store was unreachable
    fn find(
        &self,
        collection: CollectionId,
        filters: Vec<FieldFilter>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Document>, DocumentStoreError>> + Send + '_>>;

    /// Delete a document by id.
    ///
    /// # Errors
    ///
    /// - `NotFound`: no document with that id exists
    /// - `DeleteFailed`: the store rejected the delete
    /// - `ConnectionFailed`: the store was unreachable
    fn delete(
        &self,
        collection: CollectionId,
        id: DocumentId,
    ) -> Pin<Box<dyn Future<Output = Result<(), DocumentStoreError>> + Send + '_>>;

    /// Watch a collection for changes.
    ///
    /// The returned stream yields the current contents immediately, then a
    /// fresh full snapshot after every mutation, until dropped.
    ///
    /// # Errors
    ///
    /// - `SubscriptionFailed`: the subscription could not be established
    fn watch(
        &self,
        collection: CollectionId,
    ) -> Pin<Box<dyn Future<Output = Result<SnapshotStream, DocumentStoreError>> + Send + '_>>;
}
