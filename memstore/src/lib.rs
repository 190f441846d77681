//! # Vowsuite Memstore
//!
//! In-memory [`DocumentStore`] implementation for development and testing.
//!
//! Collections are vectors of documents behind a mutex; document ids are
//! random UUIDs, mirroring the opaque ids a hosted store assigns. `watch`
//! is backed by a per-collection broadcast channel: every mutation
//! publishes a fresh full snapshot, and new subscribers receive the
//! current contents immediately.
//!
//! # Semantics
//!
//! This store deliberately mirrors the hosted document store it stands in
//! for:
//!
//! - No uniqueness constraints. The duplicate-guest check remains a
//!   check-then-act sequence that can race across clients; the storage
//!   layer does not close that race.
//! - No transactions. The registry write and the main-record write are
//!   two independent operations.
//! - Snapshots are full collection states, never diffs.
//!
//! # Example
//!
//! ```
//! use vowsuite_core::collection::CollectionId;
//! use vowsuite_core::document_store::DocumentStore;
//! use vowsuite_memstore::InMemoryDocumentStore;
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryDocumentStore::new();
//! let events = CollectionId::new("event");
//!
//! let id = store.add(events.clone(), json!({"firstPerson": "Ann"})).await?;
//! let all = store.find(events.clone(), vec![]).await?;
//! assert_eq!(all.len(), 1);
//!
//! store.delete(events, id).await?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::broadcast;

use vowsuite_core::collection::{CollectionId, DocumentId};
use vowsuite_core::document_store::{
    CollectionSnapshot, Document, DocumentStore, DocumentStoreError, FieldFilter, SnapshotStream,
};

/// Broadcast capacity per collection.
///
/// Slow subscribers that fall further behind than this resynchronize from
/// the current contents instead of replaying missed snapshots.
const SNAPSHOT_CHANNEL_CAPACITY: usize = 16;

#[derive(Default)]
struct Shared {
    collections: HashMap<CollectionId, Vec<Document>>,
    channels: HashMap<CollectionId, broadcast::Sender<CollectionSnapshot>>,
}

impl Shared {
    fn snapshot_of(&self, collection: &CollectionId) -> CollectionSnapshot {
        CollectionSnapshot {
            collection: collection.clone(),
            documents: self
                .collections
                .get(collection)
                .cloned()
                .unwrap_or_default(),
        }
    }

    fn publish(&mut self, collection: &CollectionId) {
        let snapshot = self.snapshot_of(collection);
        if let Some(sender) = self.channels.get(collection) {
            // Nobody listening is fine; the next watcher starts from the
            // current contents anyway.
            let _ = sender.send(snapshot);
        }
    }
}

/// In-memory document store.
///
/// Cheap to clone; clones share the same underlying collections, so a
/// test can hold one handle while the environment holds another.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    inner: Arc<Mutex<Shared>>,
}

impl InMemoryDocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently in a collection.
    ///
    /// Convenience for tests; returns 0 for unknown collections.
    #[must_use]
    pub fn len(&self, collection: &CollectionId) -> usize {
        self.inner
            .lock()
            .map(|shared| {
                shared
                    .collections
                    .get(collection)
                    .map_or(0, std::vec::Vec::len)
            })
            .unwrap_or(0)
    }

    /// Whether a collection has no documents.
    #[must_use]
    pub fn is_empty(&self, collection: &CollectionId) -> bool {
        self.len(collection) == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Shared>, DocumentStoreError> {
        self.inner
            .lock()
            .map_err(|_| DocumentStoreError::ConnectionFailed("store lock poisoned".to_string()))
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn add(
        &self,
        collection: CollectionId,
        document: Value,
    ) -> Pin<Box<dyn Future<Output = Result<DocumentId, DocumentStoreError>> + Send + '_>> {
        let store = self.clone();

        Box::pin(async move {
            let id = DocumentId::new(uuid::Uuid::new_v4().to_string());

            let mut shared = store.lock()?;
            shared
                .collections
                .entry(collection.clone())
                .or_default()
                .push(Document::new(id.clone(), document));
            shared.publish(&collection);

            tracing::debug!(collection = %collection, document = %id, "Added document");
            Ok(id)
        })
    }

    fn find(
        &self,
        collection: CollectionId,
        filters: Vec<FieldFilter>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Document>, DocumentStoreError>> + Send + '_>> {
        let store = self.clone();

        Box::pin(async move {
            let shared = store.lock()?;
            let matches = shared
                .collections
                .get(&collection)
                .map(|docs| {
                    docs.iter()
                        .filter(|doc| doc.matches(&filters))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            Ok(matches)
        })
    }

    fn delete(
        &self,
        collection: CollectionId,
        id: DocumentId,
    ) -> Pin<Box<dyn Future<Output = Result<(), DocumentStoreError>> + Send + '_>> {
        let store = self.clone();

        Box::pin(async move {
            let mut shared = store.lock()?;

            let docs = shared.collections.entry(collection.clone()).or_default();
            let before = docs.len();
            docs.retain(|doc| doc.id != id);

            if docs.len() == before {
                return Err(DocumentStoreError::NotFound { collection, id });
            }

            shared.publish(&collection);
            tracing::debug!(collection = %collection, document = %id, "Deleted document");
            Ok(())
        })
    }

    fn watch(
        &self,
        collection: CollectionId,
    ) -> Pin<Box<dyn Future<Output = Result<SnapshotStream, DocumentStoreError>> + Send + '_>> {
        let store = self.clone();

        Box::pin(async move {
            let (initial, mut receiver) = {
                let mut shared = store.lock()?;
                let sender = shared
                    .channels
                    .entry(collection.clone())
                    .or_insert_with(|| broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY).0);
                let receiver = sender.subscribe();
                (shared.snapshot_of(&collection), receiver)
            };

            let resync_store = store.clone();
            let resync_collection = collection.clone();
            let stream = async_stream::stream! {
                yield initial;

                loop {
                    match receiver.recv().await {
                        Ok(snapshot) => yield snapshot,
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            // Missed intermediate snapshots are irrelevant;
                            // only the latest state matters. The guard must
                            // drop before the yield point.
                            tracing::warn!(
                                collection = %resync_collection,
                                skipped,
                                "Watcher lagged, resynchronizing"
                            );
                            let latest = resync_store
                                .inner
                                .lock()
                                .ok()
                                .map(|shared| shared.snapshot_of(&resync_collection));
                            if let Some(snapshot) = latest {
                                yield snapshot;
                            }
                        },
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            };

            tracing::debug!(collection = %collection, "Watch established");
            Ok(Box::pin(stream) as SnapshotStream)
        })
    }
}
