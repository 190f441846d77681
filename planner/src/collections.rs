//! Named collection bindings.
//!
//! The planner talks to five collections in the external store. Their
//! names are bound once here and carried in the environment, so reducers
//! and effects never spell out raw collection strings.

use vowsuite_core::collection::CollectionId;

/// The set of collections the planner reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionBindings {
    /// Created events.
    pub events: CollectionId,

    /// Companion code-registry records for events (`{"ID": <code>}`).
    pub event_codes: CollectionId,

    /// Submitted guests.
    pub guests: CollectionId,

    /// Companion code-registry records for guests.
    pub guest_codes: CollectionId,

    /// Budget lines.
    pub budgets: CollectionId,
}

impl Default for CollectionBindings {
    fn default() -> Self {
        Self {
            events: CollectionId::new("event"),
            event_codes: CollectionId::new("event-id"),
            guests: CollectionId::new("guest"),
            guest_codes: CollectionId::new("guest-id"),
            budgets: CollectionId::new("budget"),
        }
    }
}
