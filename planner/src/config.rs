//! Planner configuration.
//!
//! Configuration values are provided by the application, not hardcoded
//! in reducers or read implicitly from the process environment.

use vowsuite_runtime::RetryPolicy;

use crate::collections::CollectionBindings;

/// Planner configuration.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Collection names in the external store.
    pub collections: CollectionBindings,

    /// Lowest code the session sequences may be seeded with.
    ///
    /// Default: 1000
    pub code_floor: u32,

    /// Width of the seeding range above the floor.
    ///
    /// Default: 8000 (seeds land in `1000..9000`)
    pub code_span: u32,

    /// Backoff policy for remote store operations.
    pub retry: RetryPolicy,
}

impl PlannerConfig {
    /// Create a configuration with default collection names and codes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            collections: CollectionBindings::default(),
            code_floor: 1000,
            code_span: 8000,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the collection bindings.
    #[must_use]
    pub fn with_collections(mut self, collections: CollectionBindings) -> Self {
        self.collections = collections;
        self
    }

    /// Override the code seeding range.
    #[must_use]
    pub const fn with_code_range(mut self, floor: u32, span: u32) -> Self {
        self.code_floor = floor;
        self.code_span = span;
        self
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self::new()
    }
}
