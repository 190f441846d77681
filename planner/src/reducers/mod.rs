//! Planner reducers.
//!
//! This module contains pure reducer functions for the planning
//! workflows. Reducers are pure functions:
//! `(State, Action, Environment) → (State, Effects)`.

pub mod budget;
pub mod event_form;
pub mod event_list;
pub mod guest_form;
pub mod guest_list;
pub mod sign_up;

use vowsuite_core::effect::Effect;
use vowsuite_core::reducer::Reducer;
use vowsuite_core::{SmallVec, smallvec};

use crate::actions::PlannerAction;
use crate::environment::PlannerEnvironment;
use crate::state::{AuthStatus, PlannerState};

// Re-export
pub use budget::BudgetReducer;
pub use event_form::EventFormReducer;
pub use event_list::{EVENT_WATCH, EventListReducer};
pub use guest_form::GuestFormReducer;
pub use guest_list::{GUEST_WATCH, GuestListReducer};
pub use sign_up::SignUpReducer;

/// Unified planner reducer.
///
/// Routes actions to the appropriate sub-reducer based on action type
/// and handles the auth status actions itself.
#[derive(Clone, Debug, Default)]
pub struct PlannerReducer {
    event_form: EventFormReducer,
    guest_form: GuestFormReducer,
    sign_up: SignUpReducer,
    event_list: EventListReducer,
    guest_list: GuestListReducer,
    budget: BudgetReducer,
}

impl PlannerReducer {
    /// Create a new unified planner reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            event_form: EventFormReducer::new(),
            guest_form: GuestFormReducer::new(),
            sign_up: SignUpReducer::new(),
            event_list: EventListReducer::new(),
            guest_list: GuestListReducer::new(),
            budget: BudgetReducer::new(),
        }
    }
}

impl Reducer for PlannerReducer {
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
            // Event form actions
            PlannerAction::EventFieldChanged { .. }
            | PlannerAction::EventDateSelected { .. }
            | PlannerAction::SubmitEventForm
            | PlannerAction::EventSubmitted { .. }
            | PlannerAction::EventSubmitFailed { .. } => {
                self.event_form.reduce(state, action, env)
            },

            // Guest form actions
            PlannerAction::GuestFieldChanged { .. }
            | PlannerAction::GuestFlagChanged { .. }
            | PlannerAction::GuestMenuToggled { .. }
            | PlannerAction::GuestAlcoholToggled { .. }
            | PlannerAction::GuestChildrenChanged { .. }
            | PlannerAction::SubmitGuestForm
            | PlannerAction::GuestAlreadyExists
            | PlannerAction::GuestSubmitted { .. }
            | PlannerAction::GuestSubmitFailed { .. } => {
                self.guest_form.reduce(state, action, env)
            },

            // Sign-up actions
            PlannerAction::SignUpFieldChanged { .. } | PlannerAction::SubmitSignUp => {
                self.sign_up.reduce(state, action, env)
            },

            // Created-event list actions
            PlannerAction::WatchEvents
            | PlannerAction::UnwatchEvents
            | PlannerAction::EventsSnapshot { .. }
            | PlannerAction::EventsWatchFailed { .. }
            | PlannerAction::DeleteEvent { .. }
            | PlannerAction::EventDeleted { .. }
            | PlannerAction::EventDeleteFailed { .. } => {
                self.event_list.reduce(state, action, env)
            },

            // Guest list actions
            PlannerAction::WatchGuests
            | PlannerAction::UnwatchGuests
            | PlannerAction::GuestsSnapshot { .. }
            | PlannerAction::GuestsWatchFailed { .. }
            | PlannerAction::DeleteGuest { .. }
            | PlannerAction::GuestDeleted { .. }
            | PlannerAction::GuestDeleteFailed { .. } => {
                self.guest_list.reduce(state, action, env)
            },

            // Budget actions
            PlannerAction::FetchBudgets
            | PlannerAction::BudgetsLoaded { .. }
            | PlannerAction::BudgetsLoadFailed { .. } => self.budget.reduce(state, action, env),

            // Authentication
            PlannerAction::AuthStatusChanged { status } => {
                state.auth = status;

                match status {
                    AuthStatus::Authenticated => {
                        let auth = env.auth.clone();
                        smallvec![Effect::Future(Box::pin(async move {
                            match auth.user_uid().await {
                                Ok(uid) => Some(PlannerAction::UserUidResolved { uid }),
                                Err(error) => {
                                    tracing::error!(%error, "User uid lookup failed");
                                    Some(PlannerAction::UserUidResolved { uid: None })
                                },
                            }
                        }))]
                    },
                    AuthStatus::Unauthenticated | AuthStatus::Loading => {
                        state.user_uid = None;
                        smallvec![Effect::None]
                    },
                }
            },

            PlannerAction::UserUidResolved { uid } => {
                state.user_uid = uid;
                smallvec![Effect::None]
            },
        }
    }
}
