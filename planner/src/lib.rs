//! # Vowsuite Planner
//!
//! Wedding-event planning workflows on the Vowsuite reducer
//! architecture: event creation, guest RSVPs with duplicate detection,
//! sign-up, live lists, and budgets, persisted to an external document
//! store.
//!
//! ## Architecture
//!
//! - [`state`]: records, drafts, error maps, and the root [`PlannerState`]
//! - [`actions`]: the unified [`PlannerAction`] command/event enum
//! - [`reducers`]: one reducer per form/list, routed by [`PlannerReducer`]
//! - [`validate`]: pure field validators
//! - [`codes`]: process-local unique code sequences
//! - [`providers`]: the auth gateway trait (the document store trait
//!   lives in `vowsuite-core`)
//! - [`environment`]: dependency injection via [`PlannerEnvironment`]
//! - [`mocks`]: test doubles with failure injection
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use vowsuite_memstore::InMemoryDocumentStore;
//! use vowsuite_planner::{PlannerEnvironment, PlannerReducer, PlannerState};
//! use vowsuite_planner::providers::StaticAuthGateway;
//! use vowsuite_runtime::Store;
//!
//! let env = PlannerEnvironment::new(
//!     Arc::new(InMemoryDocumentStore::new()),
//!     Arc::new(StaticAuthGateway::signed_in("uid-1")),
//! );
//! let store = Store::new(PlannerState::default(), PlannerReducer::new(), env);
//! ```

pub mod actions;
pub mod codes;
pub mod collections;
pub mod config;
pub mod environment;
pub mod error;
pub mod mocks;
pub mod providers;
pub mod reducers;
pub mod state;
pub mod validate;

pub use actions::PlannerAction;
pub use collections::CollectionBindings;
pub use config::PlannerConfig;
pub use environment::PlannerEnvironment;
pub use error::{PlannerError, Result};
pub use reducers::PlannerReducer;
pub use state::{PlannerState, RecordCode, UserUid};
