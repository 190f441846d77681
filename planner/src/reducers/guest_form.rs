//! Guest creation form reducer.
//!
//! The guest flow is the one place with a suspension point before the
//! writes: a duplicate-check query on (first name, last name, email) is
//! awaited strictly before anything is written. Two concurrent
//! submissions can still both pass the check - the store enforces no
//! uniqueness, so the check-then-act race is accepted, not hidden.

use vowsuite_core::document_store::FieldFilter;
use vowsuite_core::effect::Effect;
use vowsuite_core::environment::Clock;
use vowsuite_core::reducer::Reducer;
use vowsuite_core::{SmallVec, smallvec};
use vowsuite_runtime::retry::retry_with_policy;

use crate::actions::PlannerAction;
use crate::environment::PlannerEnvironment;
use crate::state::{
    FieldErrors, FormField, FormPhase, GuestDraft, GuestFlag, GuestFormState, GuestRecord,
    PlannerState,
};
use crate::validate;

const MIN_NAME_CHARS: usize = 2;

/// Guest creation form reducer.
#[derive(Clone, Debug, Default)]
pub struct GuestFormReducer;

impl GuestFormReducer {
    /// Create a new guest form reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn apply_field(draft: &mut GuestDraft, field: FormField, value: String) {
        match field {
            FormField::FirstName => draft.first_name = value,
            FormField::LastName => draft.last_name = value,
            FormField::Email => draft.email = value,
            FormField::Partner => draft.partner = value,
            FormField::AdditionalInfo => draft.additional_info = value,
            FormField::SelectedMenuPartner => draft.selected_menu_partner = value,
            FormField::SelectedMenuChild => draft.selected_menu_child = value,
            _ => {},
        }
    }

    fn validate_draft(draft: &GuestDraft) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if !validate::has_min_chars(&draft.first_name, MIN_NAME_CHARS) {
            errors.insert(
                FormField::FirstName,
                "First name is required, min 2 characters".to_string(),
            );
        }
        if !validate::has_min_chars(&draft.last_name, MIN_NAME_CHARS) {
            errors.insert(
                FormField::LastName,
                "Last name is required, min 2 characters".to_string(),
            );
        }
        if !validate::is_valid_email(&draft.email) {
            errors.insert(FormField::Email, "Email is required".to_string());
        }

        errors
    }

    fn optional(value: &str) -> Option<String> {
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }
}

impl Reducer for GuestFormReducer {
    type State = PlannerState;
    type Action = PlannerAction;
    type Environment = PlannerEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per workflow transition
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════════
            // Editing
            // ═══════════════════════════════════════════════════════════════
            PlannerAction::GuestFieldChanged { field, value } => {
                state.guest_form.errors.remove(&field);
                // A changed identity field also invalidates the last
                // duplicate verdict.
                state.guest_form.errors.remove(&FormField::Exists);
                Self::apply_field(&mut state.guest_form.draft, field, value);
                smallvec![Effect::None]
            },

            PlannerAction::GuestFlagChanged { flag, value } => {
                match flag {
                    GuestFlag::Presence => state.guest_form.draft.presence = value,
                    GuestFlag::Accommodation => state.guest_form.draft.accommodation = value,
                    GuestFlag::Transport => state.guest_form.draft.transport = value,
                }
                smallvec![Effect::None]
            },

            PlannerAction::GuestMenuToggled { dish } => {
                let menu = &mut state.guest_form.draft.selected_menu_guest;
                if let Some(position) = menu.iter().position(|d| d == &dish) {
                    menu.remove(position);
                } else {
                    menu.push(dish);
                }
                smallvec![Effect::None]
            },

            PlannerAction::GuestAlcoholToggled { drink } => {
                let drinks = &mut state.guest_form.draft.alcohols;
                if let Some(position) = drinks.iter().position(|d| d == &drink) {
                    drinks.remove(position);
                } else {
                    drinks.push(drink);
                }
                smallvec![Effect::None]
            },

            PlannerAction::GuestChildrenChanged { count } => {
                state.guest_form.draft.number_of_children = count;
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════════
            // Submit: validate, duplicate-check, then registry + record
            // ═══════════════════════════════════════════════════════════════
            PlannerAction::SubmitGuestForm => {
                if state.guest_form.phase == FormPhase::Submitting {
                    return smallvec![Effect::None];
                }

                let errors = Self::validate_draft(&state.guest_form.draft);
                if !errors.is_empty() {
                    state.guest_form.errors = errors;
                    return smallvec![Effect::None];
                }

                let draft = &state.guest_form.draft;
                let code = env.guest_codes.next_code();
                let record = GuestRecord {
                    first_name: draft.first_name.clone(),
                    last_name: draft.last_name.clone(),
                    email: draft.email.clone(),
                    presence: draft.presence,
                    partner: Self::optional(&draft.partner),
                    number_of_children: draft.number_of_children,
                    selected_menu_guest: draft.selected_menu_guest.clone(),
                    selected_menu_partner: Self::optional(&draft.selected_menu_partner),
                    selected_menu_child: Self::optional(&draft.selected_menu_child),
                    alcohols: draft.alcohols.clone(),
                    accommodation: draft.accommodation,
                    transport: draft.transport,
                    additional_info: Self::optional(&draft.additional_info),
                    guest_code: code,
                    user_uid: state.user_uid.clone(),
                    timestamp: env.clock.now(),
                };

                let document = match serde_json::to_value(&record) {
                    Ok(document) => document,
                    Err(error) => {
                        state.guest_form.errors.insert(
                            FormField::Submit,
                            format!("Could not encode guest: {error}"),
                        );
                        return smallvec![Effect::None];
                    },
                };

                state.guest_form.errors.clear();
                state.guest_form.phase = FormPhase::Submitting;

                let store = env.store.clone();
                let guests = env.collections.guests.clone();
                let registry = env.collections.guest_codes.clone();
                let retry = env.retry.clone();
                let identity = vec![
                    FieldFilter::equals("firstName", serde_json::json!(record.first_name)),
                    FieldFilter::equals("lastName", serde_json::json!(record.last_name)),
                    FieldFilter::equals("email", serde_json::json!(record.email)),
                ];

                smallvec![Effect::Future(Box::pin(async move {
                    // The duplicate check is awaited strictly before any
                    // write is issued.
                    let matches = match retry_with_policy(&retry, "check_guest_exists", || {
                        let store = store.clone();
                        let collection = guests.clone();
                        let filters = identity.clone();
                        async move { store.find(collection, filters).await }
                    })
                    .await
                    {
                        Ok(matches) => matches,
                        Err(error) => {
                            return Some(PlannerAction::GuestSubmitFailed {
                                reason: error.to_string(),
                            });
                        },
                    };

                    if !matches.is_empty() {
                        return Some(PlannerAction::GuestAlreadyExists);
                    }

                    let registry_doc = serde_json::json!({ "ID": code.value() });
                    if let Err(error) = retry_with_policy(&retry, "register_guest_code", || {
                        let store = store.clone();
                        let collection = registry.clone();
                        let document = registry_doc.clone();
                        async move { store.add(collection, document).await }
                    })
                    .await
                    {
                        return Some(PlannerAction::GuestSubmitFailed {
                            reason: error.to_string(),
                        });
                    }

                    match retry_with_policy(&retry, "add_guest", || {
                        let store = store.clone();
                        let collection = guests.clone();
                        let document = document.clone();
                        async move { store.add(collection, document).await }
                    })
                    .await
                    {
                        Ok(document_id) => Some(PlannerAction::GuestSubmitted { code, document_id }),
                        Err(error) => Some(PlannerAction::GuestSubmitFailed {
                            reason: error.to_string(),
                        }),
                    }
                }))]
            },

            // ═══════════════════════════════════════════════════════════════
            // Submission outcome
            // ═══════════════════════════════════════════════════════════════
            PlannerAction::GuestAlreadyExists => {
                tracing::info!("Guest already exists, nothing written");
                state.guest_form.phase = FormPhase::Editing;
                state
                    .guest_form
                    .errors
                    .insert(FormField::Exists, "Guest already exists".to_string());
                smallvec![Effect::None]
            },

            PlannerAction::GuestSubmitted { code, document_id } => {
                tracing::info!(%code, %document_id, "Guest saved");
                state.guest_form = GuestFormState::default();
                smallvec![Effect::None]
            },

            PlannerAction::GuestSubmitFailed { reason } => {
                tracing::error!(%reason, "Guest submission failed");
                state.guest_form.phase = FormPhase::Editing;
                state.guest_form.errors.insert(
                    FormField::Submit,
                    format!("Could not save your guest: {reason}"),
                );
                smallvec![Effect::None]
            },

            _ => smallvec![Effect::None],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::test_environment;
    use vowsuite_core::collection::DocumentId;
    use vowsuite_testing::{ReducerTest, assertions};

    fn valid_draft() -> GuestDraft {
        GuestDraft {
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            email: "ann@x.com".to_string(),
            ..GuestDraft::default()
        }
    }

    fn state_with_draft(draft: GuestDraft) -> PlannerState {
        let mut state = PlannerState::default();
        state.guest_form.draft = draft;
        state
    }

    #[test]
    fn field_change_clears_field_and_exists_errors() {
        let mut state = PlannerState::default();
        state
            .guest_form
            .errors
            .insert(FormField::Email, "Email is required".to_string());
        state
            .guest_form
            .errors
            .insert(FormField::Exists, "Guest already exists".to_string());

        ReducerTest::new(GuestFormReducer::new())
            .with_env(test_environment())
            .given_state(state)
            .when_action(PlannerAction::GuestFieldChanged {
                field: FormField::Email,
                value: "ann@x.com".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.guest_form.draft.email, "ann@x.com");
                assert!(state.guest_form.errors.is_empty());
            })
            .run();
    }

    #[test]
    fn submit_with_empty_draft_collects_every_error() {
        ReducerTest::new(GuestFormReducer::new())
            .with_env(test_environment())
            .given_state(PlannerState::default())
            .when_action(PlannerAction::SubmitGuestForm)
            .then_state(|state| {
                let errors = &state.guest_form.errors;
                assert_eq!(
                    errors.get(&FormField::FirstName),
                    Some(&"First name is required, min 2 characters".to_string())
                );
                assert!(errors.contains_key(&FormField::LastName));
                assert!(errors.contains_key(&FormField::Email));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn submit_rejects_email_without_dotted_domain() {
        let mut draft = valid_draft();
        draft.email = "ann@x".to_string();

        ReducerTest::new(GuestFormReducer::new())
            .with_env(test_environment())
            .given_state(state_with_draft(draft))
            .when_action(PlannerAction::SubmitGuestForm)
            .then_state(|state| {
                assert!(state.guest_form.errors.contains_key(&FormField::Email));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn valid_submit_enters_submitting_and_starts_the_check() {
        ReducerTest::new(GuestFormReducer::new())
            .with_env(test_environment())
            .given_state(state_with_draft(valid_draft()))
            .when_action(PlannerAction::SubmitGuestForm)
            .then_state(|state| {
                assert_eq!(state.guest_form.phase, FormPhase::Submitting);
                assert!(state.guest_form.errors.is_empty());
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn menu_and_alcohol_toggles_flip_membership() {
        ReducerTest::new(GuestFormReducer::new())
            .with_env(test_environment())
            .given_state(PlannerState::default())
            .when_action(PlannerAction::GuestMenuToggled {
                dish: "vegetarian".to_string(),
            })
            .when_action(PlannerAction::GuestAlcoholToggled {
                drink: "wine".to_string(),
            })
            .when_action(PlannerAction::GuestAlcoholToggled {
                drink: "wine".to_string(),
            })
            .then_state(|state| {
                assert_eq!(
                    state.guest_form.draft.selected_menu_guest,
                    vec!["vegetarian".to_string()]
                );
                assert!(state.guest_form.draft.alcohols.is_empty());
            })
            .run();
    }

    #[test]
    fn duplicate_verdict_sets_exists_error_and_keeps_draft() {
        let mut state = state_with_draft(valid_draft());
        state.guest_form.phase = FormPhase::Submitting;

        ReducerTest::new(GuestFormReducer::new())
            .with_env(test_environment())
            .given_state(state)
            .when_action(PlannerAction::GuestAlreadyExists)
            .then_state(|state| {
                assert_eq!(state.guest_form.phase, FormPhase::Editing);
                assert_eq!(
                    state.guest_form.errors.get(&FormField::Exists),
                    Some(&"Guest already exists".to_string())
                );
                assert_eq!(state.guest_form.draft, valid_draft());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn submitted_resets_the_form() {
        let mut state = state_with_draft(valid_draft());
        state.guest_form.phase = FormPhase::Submitting;

        ReducerTest::new(GuestFormReducer::new())
            .with_env(test_environment())
            .given_state(state)
            .when_action(PlannerAction::GuestSubmitted {
                code: crate::state::RecordCode::new(5001),
                document_id: DocumentId::new("g1"),
            })
            .then_state(|state| {
                assert_eq!(state.guest_form, GuestFormState::default());
            })
            .run();
    }

    #[test]
    fn failed_submit_surfaces_error_and_keeps_draft() {
        let mut state = state_with_draft(valid_draft());
        state.guest_form.phase = FormPhase::Submitting;

        ReducerTest::new(GuestFormReducer::new())
            .with_env(test_environment())
            .given_state(state)
            .when_action(PlannerAction::GuestSubmitFailed {
                reason: "store offline".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.guest_form.phase, FormPhase::Editing);
                assert_eq!(state.guest_form.draft, valid_draft());
                let submit_error = state.guest_form.errors.get(&FormField::Submit);
                assert!(submit_error.is_some_and(|e| e.contains("store offline")));
            })
            .run();
    }
}
