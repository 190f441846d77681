//! # Vowsuite Core
//!
//! Core traits and types for the Vowsuite planning architecture.
//!
//! This crate provides the fundamental abstractions for building the
//! event-planning workflow engine using the Reducer pattern.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature (form drafts, error maps, lists)
//! - **Action**: All possible inputs to a reducer (commands and events)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Explicit Effects (no hidden I/O)
//! - Explicit subscription cancellation (no leaked watchers)
//! - Dependency Injection via Environment
//!
//! ## Example
//!
//! ```ignore
//! use vowsuite_core::*;
//!
//! // Define your state
//! #[derive(Clone, Debug, Default)]
//! struct FormState {
//!     draft: String,
//!     error: Option<String>,
//! }
//!
//! // Define your actions
//! #[derive(Clone, Debug)]
//! enum FormAction {
//!     FieldChanged { value: String },
//!     Submit,
//!     Submitted,
//! }
//!
//! // Implement the reducer
//! impl Reducer for FormReducer {
//!     type State = FormState;
//!     type Action = FormAction;
//!     type Environment = FormEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut FormState,
//!         action: FormAction,
//!         env: &FormEnvironment,
//!     ) -> SmallVec<[Effect<FormAction>; 4]> {
//!         // Business logic goes here
//!         SmallVec::new()
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

pub mod collection;
pub mod document_store;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for GuestFormReducer {
    ///     type State = GuestFormState;
    ///     type Action = PlannerAction;
    ///     type Environment = PlannerEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut GuestFormState,
    ///         action: PlannerAction,
    ///         env: &PlannerEnvironment,
    ///     ) -> SmallVec<[Effect<PlannerAction>; 4]> {
    ///         match action {
    ///             PlannerAction::SubmitGuestForm => {
    ///                 // Validate, then describe the duplicate check + writes
    ///                 SmallVec::new()
    ///             }
    ///             _ => SmallVec::new(),
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// Effects to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable and cancellable.
pub mod effect {
    use futures::Stream;
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Identifier for a cancellable, long-lived effect.
    ///
    /// Subscriptions (live collection watches) are registered under a
    /// `SubscriptionId` when started and torn down by returning
    /// [`Effect::Cancel`] with the same id. Ids are plain strings so a
    /// feature can derive them from the thing being watched:
    ///
    /// ```
    /// use vowsuite_core::effect::SubscriptionId;
    ///
    /// let id = SubscriptionId::new("watch:event");
    /// assert_eq!(id.as_str(), "watch:event");
    /// ```
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct SubscriptionId(String);

    impl SubscriptionId {
        /// Create a new subscription id.
        #[must_use]
        pub fn new(id: impl Into<String>) -> Self {
            Self(id.into())
        }

        /// Get the id as a string slice.
        #[must_use]
        pub fn as_str(&self) -> &str {
            &self.0
        }
    }

    impl std::fmt::Display for SubscriptionId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl From<&str> for SubscriptionId {
        fn from(s: &str) -> Self {
            Self(s.to_string())
        }
    }

    /// Stream of actions produced by a long-lived effect.
    ///
    /// Each item is fed back into the reducer as it arrives. The stream
    /// runs until it ends naturally or the owning subscription is
    /// cancelled.
    pub type ActionStream<Action> = Pin<Box<dyn Stream<Item = Action> + Send>>;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the Store
    /// runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    #[allow(missing_docs)]
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (for timeouts, retries)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into
        /// the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

        /// Long-lived stream of actions, registered for cancellation.
        ///
        /// Used for live collection snapshots: each item is dispatched
        /// back through the reducer. Starting a stream with an id that is
        /// already registered replaces the previous stream.
        Stream {
            /// Cancellation handle for this stream
            id: SubscriptionId,
            /// The actions to dispatch as they arrive
            stream: ActionStream<Action>,
        },

        /// Stop a previously started [`Effect::Stream`].
        ///
        /// Cancelling an unknown id is a no-op, so teardown paths do not
        /// need to track whether the subscription ever started.
        Cancel(SubscriptionId),
    }

    // Manual Debug implementation since Future and Stream don't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Stream { id, .. } => f
                    .debug_struct("Effect::Stream")
                    .field("id", id)
                    .field("stream", &"<stream>")
                    .finish(),
                Effect::Cancel(id) => f.debug_tuple("Effect::Cancel").field(id).finish(),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter. This module holds the dependencies
/// every feature shares; domain-specific providers (document store,
/// auth gateway, code sequences) live with their domains.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use vowsuite_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let now = clock.now();
    /// assert!(now.timestamp() > 0);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Fixed clock for deterministic tests.
    ///
    /// # Examples
    ///
    /// ```
    /// use vowsuite_core::environment::{Clock, FixedClock};
    /// use chrono::{TimeZone, Utc};
    ///
    /// let moment = Utc.with_ymd_and_hms(2024, 6, 21, 16, 30, 0).single().unwrap_or_default();
    /// let clock = FixedClock::new(moment);
    /// assert_eq!(clock.now(), moment);
    /// ```
    #[derive(Clone, Copy, Debug)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a clock frozen at the given instant.
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }
}
