//! Mock document stores for testing.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use serde_json::Value;

use vowsuite_core::collection::{CollectionId, DocumentId};
use vowsuite_core::document_store::{
    Document, DocumentStore, DocumentStoreError, FieldFilter, SnapshotStream,
};

/// A store whose every operation fails.
///
/// Sufficient for pure reducer tests: `ReducerTest` never executes the
/// effects a reducer returns, so the store behind the environment is
/// never called.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

fn unreachable_store<T>(
    collection: CollectionId,
) -> Pin<Box<dyn Future<Output = Result<T, DocumentStoreError>> + Send + 'static>>
where
    T: Send + 'static,
{
    Box::pin(async move {
        Err(DocumentStoreError::QueryFailed {
            collection,
            reason: "null store".to_string(),
        })
    })
}

impl DocumentStore for NullStore {
    fn add(
        &self,
        collection: CollectionId,
        _document: Value,
    ) -> Pin<Box<dyn Future<Output = Result<DocumentId, DocumentStoreError>> + Send + '_>> {
        unreachable_store(collection)
    }

    fn find(
        &self,
        collection: CollectionId,
        _filters: Vec<FieldFilter>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Document>, DocumentStoreError>> + Send + '_>> {
        unreachable_store(collection)
    }

    fn delete(
        &self,
        collection: CollectionId,
        _id: DocumentId,
    ) -> Pin<Box<dyn Future<Output = Result<(), DocumentStoreError>> + Send + '_>> {
        unreachable_store(collection)
    }

    fn watch(
        &self,
        collection: CollectionId,
    ) -> Pin<Box<dyn Future<Output = Result<SnapshotStream, DocumentStoreError>> + Send + '_>> {
        Box::pin(async move {
            Err(DocumentStoreError::SubscriptionFailed {
                collection,
                reason: "null store".to_string(),
            })
        })
    }
}

/// A store wrapper with scripted failures.
///
/// Wraps any [`DocumentStore`] and fails a scripted number of upcoming
/// operations per kind, then passes through. Used by workflow tests to
/// exercise the retry and error-surfacing paths.
pub struct FlakyStore {
    inner: Arc<dyn DocumentStore>,
    failing_adds: AtomicU32,
    failing_finds: AtomicU32,
    failing_deletes: AtomicU32,
}

impl FlakyStore {
    /// Wrap a store with no scripted failures.
    #[must_use]
    pub fn new(inner: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner,
            failing_adds: AtomicU32::new(0),
            failing_finds: AtomicU32::new(0),
            failing_deletes: AtomicU32::new(0),
        }
    }

    /// Fail the next `count` add operations.
    pub fn fail_adds(&self, count: u32) {
        self.failing_adds.store(count, Ordering::SeqCst);
    }

    /// Fail the next `count` find operations.
    pub fn fail_finds(&self, count: u32) {
        self.failing_finds.store(count, Ordering::SeqCst);
    }

    /// Fail the next `count` delete operations.
    pub fn fail_deletes(&self, count: u32) {
        self.failing_deletes.store(count, Ordering::SeqCst);
    }

    fn take_failure(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                current.checked_sub(1)
            })
            .is_ok()
    }
}

impl DocumentStore for FlakyStore {
    fn add(
        &self,
        collection: CollectionId,
        document: Value,
    ) -> Pin<Box<dyn Future<Output = Result<DocumentId, DocumentStoreError>> + Send + '_>> {
        if Self::take_failure(&self.failing_adds) {
            return Box::pin(async move {
                Err(DocumentStoreError::WriteFailed {
                    collection,
                    reason: "scripted failure".to_string(),
                })
            });
        }
        self.inner.add(collection, document)
    }

    fn find(
        &self,
        collection: CollectionId,
        filters: Vec<FieldFilter>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Document>, DocumentStoreError>> + Send + '_>> {
        if Self::take_failure(&self.failing_finds) {
            return Box::pin(async move {
                Err(DocumentStoreError::QueryFailed {
                    collection,
                    reason: "scripted failure".to_string(),
                })
            });
        }
        self.inner.find(collection, filters)
    }

    fn delete(
        &self,
        collection: CollectionId,
        id: DocumentId,
    ) -> Pin<Box<dyn Future<Output = Result<(), DocumentStoreError>> + Send + '_>> {
        if Self::take_failure(&self.failing_deletes) {
            return Box::pin(async move {
                Err(DocumentStoreError::DeleteFailed {
                    collection,
                    reason: "scripted failure".to_string(),
                })
            });
        }
        self.inner.delete(collection, id)
    }

    fn watch(
        &self,
        collection: CollectionId,
    ) -> Pin<Box<dyn Future<Output = Result<SnapshotStream, DocumentStoreError>> + Send + '_>> {
        self.inner.watch(collection)
    }
}
