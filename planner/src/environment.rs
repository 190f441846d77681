//! Planner environment.
//!
//! This module defines the environment type for dependency injection in
//! planner reducers. Every dependency is dyn-compatible, so the
//! environment is a plain struct of `Arc<dyn …>` handles - cheap to
//! clone into effect futures.

use std::sync::Arc;

use vowsuite_core::document_store::DocumentStore;
use vowsuite_core::environment::{Clock, SystemClock};
use vowsuite_runtime::RetryPolicy;

use crate::codes::{CodeSequence, SessionCodes};
use crate::collections::CollectionBindings;
use crate::config::PlannerConfig;
use crate::providers::AuthGateway;

/// Planner environment.
///
/// Contains all external dependencies needed by planner reducers.
#[derive(Clone)]
pub struct PlannerEnvironment {
    /// The external document store.
    pub store: Arc<dyn DocumentStore>,

    /// The authentication collaborator.
    pub auth: Arc<dyn AuthGateway>,

    /// Time source for timestamps and countdowns.
    pub clock: Arc<dyn Clock>,

    /// Code sequence for new events.
    pub event_codes: Arc<dyn CodeSequence>,

    /// Code sequence for new guests.
    pub guest_codes: Arc<dyn CodeSequence>,

    /// Collection names in the store.
    pub collections: CollectionBindings,

    /// Backoff policy for remote operations.
    pub retry: RetryPolicy,
}

impl PlannerEnvironment {
    /// Create an environment with default configuration.
    ///
    /// Uses the system clock and freshly seeded session code sequences.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, auth: Arc<dyn AuthGateway>) -> Self {
        Self::with_config(store, auth, PlannerConfig::default())
    }

    /// Create an environment from an explicit configuration.
    #[must_use]
    pub fn with_config(
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthGateway>,
        config: PlannerConfig,
    ) -> Self {
        Self {
            store,
            auth,
            clock: Arc::new(SystemClock),
            event_codes: Arc::new(SessionCodes::new(config.code_floor, config.code_span)),
            guest_codes: Arc::new(SessionCodes::new(config.code_floor, config.code_span)),
            collections: config.collections,
            retry: config.retry,
        }
    }

    /// Replace the clock (tests use a frozen one).
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace both code sequences.
    #[must_use]
    pub fn with_codes(
        mut self,
        event_codes: Arc<dyn CodeSequence>,
        guest_codes: Arc<dyn CodeSequence>,
    ) -> Self {
        self.event_codes = event_codes;
        self.guest_codes = guest_codes;
        self
    }
}
