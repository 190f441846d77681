//! Event creation form reducer.
//!
//! Implements the submission workflow for new events:
//!
//! 1. Field changes update the draft and clear that field's error
//! 2. Submit validates every field synchronously and collects all
//!    failures - any failure publishes the error map and stops, no I/O
//! 3. A valid draft pulls the next event code and writes the
//!    code-registry record followed by the event record
//! 4. Success resets the form; failure surfaces a form-level error and
//!    leaves the draft intact

use chrono::NaiveDate;

use vowsuite_core::effect::Effect;
use vowsuite_core::environment::Clock;
use vowsuite_core::reducer::Reducer;
use vowsuite_core::{SmallVec, smallvec};
use vowsuite_runtime::retry::retry_with_policy;

use crate::actions::PlannerAction;
use crate::environment::PlannerEnvironment;
use crate::state::{
    EventDraft, EventFormState, EventRecord, FieldErrors, FormField, FormPhase, PlannerState,
    RecordCode,
};
use crate::validate;

const MIN_NAME_CHARS: usize = 2;

/// Event creation form reducer.
#[derive(Clone, Debug, Default)]
pub struct EventFormReducer;

impl EventFormReducer {
    /// Create a new event form reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Apply a text input change to the draft.
    fn apply_field(draft: &mut EventDraft, field: FormField, value: String) {
        match field {
            FormField::FirstPerson => draft.first_person = value,
            FormField::SecondPerson => draft.second_person = value,
            FormField::EventTime => draft.event_time = value,
            FormField::CeremonyPlace => draft.ceremony_place = value,
            FormField::CeremonyStreetAddress => draft.ceremony_street_address = value,
            FormField::CeremonyCityAddress => draft.ceremony_city_address = value,
            FormField::ReceptionPlace => draft.reception_place = value,
            FormField::ReceptionStreetAddress => draft.reception_street_address = value,
            FormField::ReceptionCityAddress => draft.reception_city_address = value,
            FormField::FirstPersonPhone => draft.first_person_phone = value,
            FormField::SecondPersonPhone => draft.second_person_phone = value,
            FormField::LeadColor => draft.lead_color = value,
            _ => {},
        }
    }

    /// Validate the whole draft, collecting every failure.
    fn validate_draft(draft: &EventDraft) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if !validate::has_min_chars(&draft.first_person, MIN_NAME_CHARS) {
            errors.insert(FormField::FirstPerson, "Use at least 2 characters".to_string());
        }
        if !validate::has_min_chars(&draft.second_person, MIN_NAME_CHARS) {
            errors.insert(FormField::SecondPerson, "Use at least 2 characters".to_string());
        }
        if draft.event_date.is_none() {
            errors.insert(FormField::EventDate, "Choose event date".to_string());
        }
        if validate::is_blank(&draft.event_time) {
            errors.insert(FormField::EventTime, "Enter event time".to_string());
        } else if !validate::is_valid_time(&draft.event_time) {
            errors.insert(FormField::EventTime, "Time format is 00:00".to_string());
        }
        if !validate::has_min_chars(&draft.ceremony_place, MIN_NAME_CHARS) {
            errors.insert(
                FormField::CeremonyPlace,
                "Enter ceremony place, use at least 2 characters".to_string(),
            );
        }
        if !validate::has_min_chars(&draft.ceremony_street_address, MIN_NAME_CHARS) {
            errors.insert(
                FormField::CeremonyStreetAddress,
                "Enter ceremony street address, use at least 2 characters".to_string(),
            );
        }
        if !validate::has_min_chars(&draft.ceremony_city_address, MIN_NAME_CHARS) {
            errors.insert(
                FormField::CeremonyCityAddress,
                "Enter ceremony city address, use at least 2 characters".to_string(),
            );
        }
        if !validate::has_min_chars(&draft.reception_place, MIN_NAME_CHARS) {
            errors.insert(
                FormField::ReceptionPlace,
                "Enter reception place, use at least 2 characters".to_string(),
            );
        }
        if !validate::has_min_chars(&draft.reception_street_address, MIN_NAME_CHARS) {
            errors.insert(
                FormField::ReceptionStreetAddress,
                "Enter reception street address, use at least 2 characters".to_string(),
            );
        }
        if !validate::has_min_chars(&draft.reception_city_address, MIN_NAME_CHARS) {
            errors.insert(
                FormField::ReceptionCityAddress,
                "Enter reception city address, use at least 2 characters".to_string(),
            );
        }
        if !validate::is_valid_phone(&draft.first_person_phone) {
            errors.insert(
                FormField::FirstPersonPhone,
                "Enter first person's number. Use at least 6 numbers".to_string(),
            );
        }
        if !validate::is_valid_phone(&draft.second_person_phone) {
            errors.insert(
                FormField::SecondPersonPhone,
                "Enter second person's number. Use at least 6 numbers".to_string(),
            );
        }

        errors
    }

    fn record_from_draft(draft: &EventDraft, date: NaiveDate, code: RecordCode) -> EventRecord {
        EventRecord {
            first_person: draft.first_person.clone(),
            second_person: draft.second_person.clone(),
            event_date: date,
            event_time: draft.event_time.clone(),
            ceremony_place: draft.ceremony_place.clone(),
            ceremony_street_address: draft.ceremony_street_address.clone(),
            ceremony_city_address: draft.ceremony_city_address.clone(),
            reception_place: draft.reception_place.clone(),
            reception_street_address: draft.reception_street_address.clone(),
            reception_city_address: draft.reception_city_address.clone(),
            first_person_phone: draft.first_person_phone.clone(),
            second_person_phone: draft.second_person_phone.clone(),
            lead_color: if draft.lead_color.is_empty() {
                None
            } else {
                Some(draft.lead_color.clone())
            },
            event_code: code,
        }
    }
}

impl Reducer for EventFormReducer {
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
            // ═══════════════════════════════════════════════════════════════
            // Editing
            // ═══════════════════════════════════════════════════════════════
            PlannerAction::EventFieldChanged { field, value } => {
                state.event_form.errors.remove(&field);
                Self::apply_field(&mut state.event_form.draft, field, value);
                smallvec![Effect::None]
            },

            PlannerAction::EventDateSelected { date } => {
                state.event_form.errors.remove(&FormField::EventDate);
                state.event_form.draft.event_date = Some(date);

                let days_to_event = (date - env.clock.now().date_naive()).num_days();
                tracing::debug!(days_to_event, "Event date selected");
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════════
            // Submit: validate, then registry write + record write
            // ═══════════════════════════════════════════════════════════════
            PlannerAction::SubmitEventForm => {
                // One in-flight submission per form.
                if state.event_form.phase == FormPhase::Submitting {
                    return smallvec![Effect::None];
                }

                let errors = Self::validate_draft(&state.event_form.draft);
                if !errors.is_empty() {
                    state.event_form.errors = errors;
                    return smallvec![Effect::None];
                }

                let Some(date) = state.event_form.draft.event_date else {
                    // validate_draft guarantees a date is present
                    return smallvec![Effect::None];
                };

                let code = env.event_codes.next_code();
                let record = Self::record_from_draft(&state.event_form.draft, date, code);
                let document = match serde_json::to_value(&record) {
                    Ok(document) => document,
                    Err(error) => {
                        state.event_form.errors.insert(
                            FormField::Submit,
                            format!("Could not encode event: {error}"),
                        );
                        return smallvec![Effect::None];
                    },
                };

                state.event_form.errors.clear();
                state.event_form.phase = FormPhase::Submitting;

                let store = env.store.clone();
                let registry = env.collections.event_codes.clone();
                let events = env.collections.events.clone();
                let retry = env.retry.clone();

                smallvec![Effect::Future(Box::pin(async move {
                    let registry_doc = serde_json::json!({ "ID": code.value() });

                    if let Err(error) = retry_with_policy(&retry, "register_event_code", || {
                        let store = store.clone();
                        let collection = registry.clone();
                        let document = registry_doc.clone();
                        async move { store.add(collection, document).await }
                    })
                    .await
                    {
                        return Some(PlannerAction::EventSubmitFailed {
                            reason: error.to_string(),
                        });
                    }

                    match retry_with_policy(&retry, "add_event", || {
                        let store = store.clone();
                        let collection = events.clone();
                        let document = document.clone();
                        async move { store.add(collection, document).await }
                    })
                    .await
                    {
                        Ok(document_id) => Some(PlannerAction::EventSubmitted { code, document_id }),
                        Err(error) => Some(PlannerAction::EventSubmitFailed {
                            reason: error.to_string(),
                        }),
                    }
                }))]
            },

            // ═══════════════════════════════════════════════════════════════
            // Submission outcome
            // ═══════════════════════════════════════════════════════════════
            PlannerAction::EventSubmitted { code, document_id } => {
                tracing::info!(%code, %document_id, "Event saved");
                state.event_form = EventFormState::default();
                smallvec![Effect::None]
            },

            PlannerAction::EventSubmitFailed { reason } => {
                tracing::error!(%reason, "Event submission failed");
                state.event_form.phase = FormPhase::Editing;
                state.event_form.errors.insert(
                    FormField::Submit,
                    format!("Could not save your event: {reason}"),
                );
                smallvec![Effect::None]
            },

            _ => smallvec![Effect::None],
        }
    }
}
