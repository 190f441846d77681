//! Guest list reducer.
//!
//! Mirrors the created-event list for the `guest` collection: a standing
//! watch replaces the table wholesale per snapshot, deletion filters
//! optimistically and surfaces failures as a list-level error.

use futures::StreamExt;

use vowsuite_core::document_store::Document;
use vowsuite_core::effect::{Effect, SubscriptionId};
use vowsuite_core::reducer::Reducer;
use vowsuite_core::{SmallVec, smallvec};
use vowsuite_runtime::retry::retry_with_policy;

use crate::actions::PlannerAction;
use crate::environment::PlannerEnvironment;
use crate::state::{GuestEntry, GuestRecord, PlannerState};

/// Subscription id of the `guest` collection watch.
pub const GUEST_WATCH: &str = "watch:guest";

/// Guest list reducer.
#[derive(Clone, Debug, Default)]
pub struct GuestListReducer;

impl GuestListReducer {
    /// Create a new guest list reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn entries_from(documents: Vec<Document>) -> Vec<GuestEntry> {
        documents
            .into_iter()
            .filter_map(|document| {
                match serde_json::from_value::<GuestRecord>(document.data.clone()) {
                    Ok(record) => Some(GuestEntry {
                        id: document.id,
                        record,
                    }),
                    Err(error) => {
                        tracing::warn!(document = %document.id, %error, "Skipping malformed guest document");
                        None
                    },
                }
            })
            .collect()
    }
}

impl Reducer for GuestListReducer {
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
            PlannerAction::WatchGuests => {
                state.guests.watching = true;
                state.guests.last_error = None;

                let store = env.store.clone();
                let collection = env.collections.guests.clone();

                let stream = Box::pin(async_stream::stream! {
                    match store.watch(collection).await {
                        Ok(mut snapshots) => {
                            while let Some(snapshot) = snapshots.next().await {
                                yield PlannerAction::GuestsSnapshot {
                                    documents: snapshot.documents,
                                };
                            }
                        },
                        Err(error) => {
                            yield PlannerAction::GuestsWatchFailed {
                                reason: error.to_string(),
                            };
                        },
                    }
                });

                smallvec![Effect::Stream {
                    id: SubscriptionId::new(GUEST_WATCH),
                    stream,
                }]
            },

            PlannerAction::UnwatchGuests => {
                state.guests.watching = false;
                smallvec![Effect::Cancel(SubscriptionId::new(GUEST_WATCH))]
            },

            PlannerAction::GuestsSnapshot { documents } => {
                state.guests.entries = Self::entries_from(documents);
                state.guests.loaded = true;
                smallvec![Effect::None]
            },

            PlannerAction::GuestsWatchFailed { reason } => {
                tracing::error!(%reason, "Guest watch failed");
                state.guests.watching = false;
                state.guests.last_error = Some(reason);
                smallvec![Effect::None]
            },

            PlannerAction::DeleteGuest { id } => {
                state.guests.entries.retain(|entry| entry.id != id);

                let store = env.store.clone();
                let collection = env.collections.guests.clone();
                let retry = env.retry.clone();

                smallvec![Effect::Future(Box::pin(async move {
                    let result = retry_with_policy(&retry, "delete_guest", || {
                        let store = store.clone();
                        let collection = collection.clone();
                        let id = id.clone();
                        async move { store.delete(collection, id).await }
                    })
                    .await;

                    match result {
                        Ok(()) => Some(PlannerAction::GuestDeleted { id }),
                        Err(error) => Some(PlannerAction::GuestDeleteFailed {
                            id,
                            reason: error.to_string(),
                        }),
                    }
                }))]
            },

            PlannerAction::GuestDeleted { id } => {
                tracing::info!(document = %id, "Guest deleted");
                smallvec![Effect::None]
            },

            PlannerAction::GuestDeleteFailed { id, reason } => {
                tracing::error!(document = %id, %reason, "Guest delete failed");
                state.guests.last_error = Some(format!("Could not delete guest: {reason}"));
                smallvec![Effect::None]
            },

            _ => smallvec![Effect::None],
        }
    }
}
