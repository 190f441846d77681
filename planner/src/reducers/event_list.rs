//! Created-event list reducer.
//!
//! Keeps the rendered event list synchronized with the `event`
//! collection: a standing watch subscription replaces the local list
//! wholesale on every snapshot, and deletion removes the entry locally
//! before the store confirms. A failed delete is surfaced as a
//! list-level error; the view stays optimistically filtered until the
//! next remote change delivers a corrective snapshot.

use futures::StreamExt;

use vowsuite_core::document_store::Document;
use vowsuite_core::effect::{Effect, SubscriptionId};
use vowsuite_core::reducer::Reducer;
use vowsuite_core::{SmallVec, smallvec};
use vowsuite_runtime::retry::retry_with_policy;

use crate::actions::PlannerAction;
use crate::environment::PlannerEnvironment;
use crate::state::{EventEntry, EventRecord, PlannerState};

/// Subscription id of the `event` collection watch.
pub const EVENT_WATCH: &str = "watch:event";

/// Created-event list reducer.
#[derive(Clone, Debug, Default)]
pub struct EventListReducer;

impl EventListReducer {
    /// Create a new event list reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parse snapshot documents into list entries.
    ///
    /// Documents that do not parse as event records are skipped with a
    /// warning; other clients may write junk into a shared collection.
    fn entries_from(documents: Vec<Document>) -> Vec<EventEntry> {
        documents
            .into_iter()
            .filter_map(|document| {
                match serde_json::from_value::<EventRecord>(document.data.clone()) {
                    Ok(record) => Some(EventEntry {
                        id: document.id,
                        record,
                    }),
                    Err(error) => {
                        tracing::warn!(document = %document.id, %error, "Skipping malformed event document");
                        None
                    },
                }
            })
            .collect()
    }
}

impl Reducer for EventListReducer {
    type State = PlannerState;
    type Action = PlannerAction;
    type Environment = PlannerEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════════
            // Watch lifecycle
            // ═══════════════════════════════════════════════════════════════
            PlannerAction::WatchEvents => {
                state.events.watching = true;
                state.events.last_error = None;

                let store = env.store.clone();
                let collection = env.collections.events.clone();

                let stream = Box::pin(async_stream::stream! {
                    match store.watch(collection).await {
                        Ok(mut snapshots) => {
                            while let Some(snapshot) = snapshots.next().await {
                                yield PlannerAction::EventsSnapshot {
                                    documents: snapshot.documents,
                                };
                            }
                        },
                        Err(error) => {
                            yield PlannerAction::EventsWatchFailed {
                                reason: error.to_string(),
                            };
                        },
                    }
                });

                smallvec![Effect::Stream {
                    id: SubscriptionId::new(EVENT_WATCH),
                    stream,
                }]
            },

            PlannerAction::UnwatchEvents => {
                state.events.watching = false;
                smallvec![Effect::Cancel(SubscriptionId::new(EVENT_WATCH))]
            },

            PlannerAction::EventsSnapshot { documents } => {
                state.events.entries = Self::entries_from(documents);
                state.events.loaded = true;
                smallvec![Effect::None]
            },

            PlannerAction::EventsWatchFailed { reason } => {
                tracing::error!(%reason, "Event watch failed");
                state.events.watching = false;
                state.events.last_error = Some(reason);
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════════
            // Deletion
            // ═══════════════════════════════════════════════════════════════
            PlannerAction::DeleteEvent { id } => {
                // Optimistic removal; the next snapshot corrects either way.
                state.events.entries.retain(|entry| entry.id != id);

                let store = env.store.clone();
                let collection = env.collections.events.clone();
                let retry = env.retry.clone();

                smallvec![Effect::Future(Box::pin(async move {
                    let result = retry_with_policy(&retry, "delete_event", || {
                        let store = store.clone();
                        let collection = collection.clone();
                        let id = id.clone();
                        async move { store.delete(collection, id).await }
                    })
                    .await;

                    match result {
                        Ok(()) => Some(PlannerAction::EventDeleted { id }),
                        Err(error) => Some(PlannerAction::EventDeleteFailed {
                            id,
                            reason: error.to_string(),
                        }),
                    }
                }))]
            },

            PlannerAction::EventDeleted { id } => {
                tracing::info!(document = %id, "Event deleted");
                smallvec![Effect::None]
            },

            PlannerAction::EventDeleteFailed { id, reason } => {
                tracing::error!(document = %id, %reason, "Event delete failed");
                state.events.last_error = Some(format!("Could not delete event: {reason}"));
                smallvec![Effect::None]
            },

            _ => smallvec![Effect::None],
        }
    }
}
