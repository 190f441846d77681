//! # Vowsuite Testing
//!
//! Testing utilities for the Vowsuite planning architecture.
//!
//! The centerpiece is [`ReducerTest`], a fluent Given/When/Then harness
//! for exercising reducers as pure functions - no runtime, no tokio, no
//! real providers. Effect inspection helpers live in [`assertions`].
//!
//! ## Example
//!
//! ```ignore
//! use vowsuite_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(GuestFormReducer::new())
//!     .with_env(test_environment())
//!     .given_state(GuestFormState::default())
//!     .when_action(PlannerAction::SubmitGuestForm)
//!     .then_state(|state| {
//!         assert!(state.errors.contains_key(&FormField::FirstName));
//!     })
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

pub mod reducer_test;

pub use reducer_test::{ReducerTest, assertions};
