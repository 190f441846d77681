//! Sign-up form reducer.
//!
//! Unlike the event and guest forms, sign-up validation stops at the
//! first failing field and clears the password input on the way out, so
//! a stale password never survives a failed attempt. Account creation
//! itself is delegated to the auth collaborator outside this scope;
//! a valid submit just resets the draft and marks the form completed.

use vowsuite_core::effect::Effect;
use vowsuite_core::reducer::Reducer;
use vowsuite_core::{SmallVec, smallvec};

use crate::actions::PlannerAction;
use crate::environment::PlannerEnvironment;
use crate::state::{FormField, PlannerState, SignUpDraft};
use crate::validate;

/// Sign-up form reducer.
#[derive(Clone, Debug, Default)]
pub struct SignUpReducer;

impl SignUpReducer {
    /// Create a new sign-up reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for SignUpReducer {
    type State = PlannerState;
    type Action = PlannerAction;
    type Environment = PlannerEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            PlannerAction::SignUpFieldChanged { field, value } => {
                state.sign_up.errors.remove(&field);
                let draft = &mut state.sign_up.draft;
                match field {
                    FormField::FirstName => draft.first_name = value,
                    FormField::LastName => draft.last_name = value,
                    FormField::Email => draft.email = value,
                    FormField::Password => draft.password = value,
                    _ => {},
                }
                smallvec![Effect::None]
            },

            PlannerAction::SubmitSignUp => {
                state.sign_up.errors.clear();
                let draft = &state.sign_up.draft;

                if validate::is_blank(&draft.first_name) {
                    state
                        .sign_up
                        .errors
                        .insert(FormField::FirstName, "Name is required".to_string());
                    state.sign_up.draft.password.clear();
                    return smallvec![Effect::None];
                }

                if validate::is_blank(&draft.last_name) {
                    state
                        .sign_up
                        .errors
                        .insert(FormField::LastName, "Surname is required".to_string());
                    state.sign_up.draft.password.clear();
                    return smallvec![Effect::None];
                }

                if validate::is_blank(&draft.email) {
                    state
                        .sign_up
                        .errors
                        .insert(FormField::Email, "Email is required".to_string());
                    return smallvec![Effect::None];
                }

                if !validate::is_valid_email(&draft.email) {
                    state
                        .sign_up
                        .errors
                        .insert(FormField::Email, "Invalid email format".to_string());
                    state.sign_up.draft.email.clear();
                    state.sign_up.draft.password.clear();
                    return smallvec![Effect::None];
                }

                if validate::is_blank(&draft.password) {
                    state
                        .sign_up
                        .errors
                        .insert(FormField::Password, "Password is required".to_string());
                    return smallvec![Effect::None];
                }

                tracing::info!("Account created");
                state.sign_up.draft = SignUpDraft::default();
                state.sign_up.completed = true;
                smallvec![Effect::None]
            },

            _ => smallvec![Effect::None],
        }
    }
}
