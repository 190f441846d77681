//! Planner state types.
//!
//! This module defines the records persisted to the document store, the
//! transient form drafts and error maps, and the root [`PlannerState`]
//! managed by the planner reducer. All types are `Clone` to support the
//! functional architecture pattern.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use vowsuite_core::collection::DocumentId;

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

/// Numeric code attached to a newly created event or guest record.
///
/// Codes come from a process-local [`CodeSequence`](crate::codes::CodeSequence)
/// and never repeat within a process lifetime. They are stored both on the
/// main record and in a companion code-registry document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordCode(u32);

impl RecordCode {
    /// Wrap a raw code value.
    #[must_use]
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    /// The raw code value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for RecordCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of the authenticated user, as reported by the auth
/// collaborator. Never parsed or interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserUid(String);

impl UserUid {
    /// Wrap a raw uid.
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    /// The uid as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserUid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Persistent Records
// ═══════════════════════════════════════════════════════════════════════

/// A created event, as persisted to the `event` collection.
///
/// Field names serialize in the store's camelCase wire convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// First organizer's name.
    pub first_person: String,

    /// Second organizer's name.
    pub second_person: String,

    /// Calendar date of the event.
    pub event_date: NaiveDate,

    /// Start time, `HH:MM`.
    pub event_time: String,

    /// Ceremony venue name.
    pub ceremony_place: String,

    /// Ceremony street address.
    pub ceremony_street_address: String,

    /// Ceremony city.
    pub ceremony_city_address: String,

    /// Reception venue name.
    pub reception_place: String,

    /// Reception street address.
    pub reception_street_address: String,

    /// Reception city.
    pub reception_city_address: String,

    /// First organizer's phone number.
    pub first_person_phone: String,

    /// Second organizer's phone number.
    pub second_person_phone: String,

    /// Optional lead color of the event (`#RRGGBB`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_color: Option<String>,

    /// Generated event code, also stored in the `event-id` registry.
    #[serde(rename = "eventID")]
    pub event_code: RecordCode,
}

impl EventRecord {
    /// Whole days remaining until the event, negative once it has passed.
    #[must_use]
    pub fn days_until(&self, now: DateTime<Utc>) -> i64 {
        (self.event_date - now.date_naive()).num_days()
    }
}

/// A submitted guest, as persisted to the `guest` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestRecord {
    /// Guest's first name.
    pub first_name: String,

    /// Guest's last name.
    pub last_name: String,

    /// Guest's email address.
    pub email: String,

    /// Whether the guest confirmed attendance.
    #[serde(default)]
    pub presence: bool,

    /// Accompanying partner's name, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner: Option<String>,

    /// Number of accompanying children, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_children: Option<u32>,

    /// Menu choices for the guest.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selected_menu_guest: Vec<String>,

    /// Menu choice for the partner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_menu_partner: Option<String>,

    /// Menu choice for the children.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_menu_child: Option<String>,

    /// Preferred drinks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alcohols: Vec<String>,

    /// Whether accommodation is needed.
    #[serde(default)]
    pub accommodation: bool,

    /// Whether transport is needed.
    #[serde(default)]
    pub transport: bool,

    /// Free-form notes from the guest.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,

    /// Generated guest code, also stored in the `guest-id` registry.
    #[serde(rename = "guestID")]
    pub guest_code: RecordCode,

    /// Uid of the owning event's authenticated user, when known.
    #[serde(rename = "userUID", skip_serializing_if = "Option::is_none")]
    pub user_uid: Option<UserUid>,

    /// When the guest was submitted.
    pub timestamp: DateTime<Utc>,
}

/// A budget line, read wholesale from the `budget` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRecord {
    /// What the money is for.
    pub description: String,

    /// Planned amount.
    pub amount: f64,
}

// ═══════════════════════════════════════════════════════════════════════
// Form Fields and Error Maps
// ═══════════════════════════════════════════════════════════════════════

/// Typed key of a form field, used in error maps and field-change actions.
///
/// `Exists` and `Submit` are not input fields: `Exists` carries the
/// duplicate-guest error, `Submit` carries form-level failures from the
/// remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum FormField {
    // Event form
    FirstPerson,
    SecondPerson,
    EventDate,
    EventTime,
    CeremonyPlace,
    CeremonyStreetAddress,
    CeremonyCityAddress,
    ReceptionPlace,
    ReceptionStreetAddress,
    ReceptionCityAddress,
    FirstPersonPhone,
    SecondPersonPhone,
    LeadColor,
    // Guest and sign-up forms
    FirstName,
    LastName,
    Email,
    Password,
    Partner,
    AdditionalInfo,
    SelectedMenuPartner,
    SelectedMenuChild,
    // Synthetic keys
    Exists,
    Submit,
}

impl FormField {
    /// The field's wire/DOM name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstPerson => "firstPerson",
            Self::SecondPerson => "secondPerson",
            Self::EventDate => "eventDate",
            Self::EventTime => "eventTime",
            Self::CeremonyPlace => "ceremonyPlace",
            Self::CeremonyStreetAddress => "ceremonyStreetAddress",
            Self::CeremonyCityAddress => "ceremonyCityAddress",
            Self::ReceptionPlace => "receptionPlace",
            Self::ReceptionStreetAddress => "receptionStreetAddress",
            Self::ReceptionCityAddress => "receptionCityAddress",
            Self::FirstPersonPhone => "firstPersonPhone",
            Self::SecondPersonPhone => "secondPersonPhone",
            Self::LeadColor => "leadColor",
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Password => "password",
            Self::Partner => "partner",
            Self::AdditionalInfo => "additionalInfo",
            Self::SelectedMenuPartner => "selectedMenuPartner",
            Self::SelectedMenuChild => "selectedMenuChild",
            Self::Exists => "exists",
            Self::Submit => "submit",
        }
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-field error messages, recomputed on every change/submit.
pub type FieldErrors = BTreeMap<FormField, String>;

/// Boolean guest attributes toggled from the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum GuestFlag {
    Presence,
    Accommodation,
    Transport,
}

// ═══════════════════════════════════════════════════════════════════════
// Form Drafts
// ═══════════════════════════════════════════════════════════════════════

/// In-progress event form input.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    /// First organizer's name.
    pub first_person: String,
    /// Second organizer's name.
    pub second_person: String,
    /// Selected date, if any.
    pub event_date: Option<NaiveDate>,
    /// Start time input.
    pub event_time: String,
    /// Ceremony venue name.
    pub ceremony_place: String,
    /// Ceremony street address.
    pub ceremony_street_address: String,
    /// Ceremony city.
    pub ceremony_city_address: String,
    /// Reception venue name.
    pub reception_place: String,
    /// Reception street address.
    pub reception_street_address: String,
    /// Reception city.
    pub reception_city_address: String,
    /// First organizer's phone input.
    pub first_person_phone: String,
    /// Second organizer's phone input.
    pub second_person_phone: String,
    /// Lead color input.
    pub lead_color: String,
}

impl Default for EventDraft {
    fn default() -> Self {
        Self {
            first_person: String::new(),
            second_person: String::new(),
            event_date: None,
            event_time: String::new(),
            ceremony_place: String::new(),
            ceremony_street_address: String::new(),
            ceremony_city_address: String::new(),
            reception_place: String::new(),
            reception_street_address: String::new(),
            reception_city_address: String::new(),
            first_person_phone: String::new(),
            second_person_phone: String::new(),
            lead_color: "#FFFFFF".to_string(),
        }
    }
}

/// In-progress guest form input.
#[derive(Debug, Clone, PartialEq)]
pub struct GuestDraft {
    /// Guest's first name input.
    pub first_name: String,
    /// Guest's last name input.
    pub last_name: String,
    /// Guest's email input.
    pub email: String,
    /// Partner name input.
    pub partner: String,
    /// Number of accompanying children.
    pub number_of_children: Option<u32>,
    /// Menu choices for the guest.
    pub selected_menu_guest: Vec<String>,
    /// Menu choice for the partner.
    pub selected_menu_partner: String,
    /// Menu choice for the children.
    pub selected_menu_child: String,
    /// Preferred drinks.
    pub alcohols: Vec<String>,
    /// Whether accommodation is needed.
    pub accommodation: bool,
    /// Whether transport is needed.
    pub transport: bool,
    /// Whether the guest will attend.
    pub presence: bool,
    /// Free-form notes input.
    pub additional_info: String,
}

impl Default for GuestDraft {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            partner: String::new(),
            number_of_children: None,
            selected_menu_guest: Vec::new(),
            selected_menu_partner: String::new(),
            selected_menu_child: String::new(),
            alcohols: Vec::new(),
            accommodation: false,
            transport: false,
            presence: true,
            additional_info: String::new(),
        }
    }
}

/// In-progress sign-up form input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignUpDraft {
    /// Name input.
    pub first_name: String,
    /// Surname input.
    pub last_name: String,
    /// Email input.
    pub email: String,
    /// Password input.
    pub password: String,
}

// ═══════════════════════════════════════════════════════════════════════
// Form and List States
// ═══════════════════════════════════════════════════════════════════════

/// Where a form currently is in its submission cycle.
///
/// Validation runs synchronously inside the submit transition, so only
/// the editing and in-flight phases are observable states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormPhase {
    /// Collecting input; errors (if any) are shown inline.
    #[default]
    Editing,

    /// A submission is in flight against the document store.
    Submitting,
}

/// Event creation form state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFormState {
    /// Current input.
    pub draft: EventDraft,
    /// Per-field errors from the last change/submit.
    pub errors: FieldErrors,
    /// Submission phase.
    pub phase: FormPhase,
}

/// Guest creation form state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuestFormState {
    /// Current input.
    pub draft: GuestDraft,
    /// Per-field errors from the last change/submit.
    pub errors: FieldErrors,
    /// Submission phase.
    pub phase: FormPhase,
}

/// Sign-up form state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignUpFormState {
    /// Current input.
    pub draft: SignUpDraft,
    /// Per-field errors from the last submit.
    pub errors: FieldErrors,
    /// Whether an account was created this session.
    pub completed: bool,
}

/// An event as rendered in the created-event list.
#[derive(Debug, Clone, PartialEq)]
pub struct EventEntry {
    /// Store-assigned document id, used for deletion.
    pub id: DocumentId,
    /// The event record.
    pub record: EventRecord,
}

/// A guest as rendered in the guest list table.
#[derive(Debug, Clone, PartialEq)]
pub struct GuestEntry {
    /// Store-assigned document id, used for deletion.
    pub id: DocumentId,
    /// The guest record.
    pub record: GuestRecord,
}

/// Live list of created events.
///
/// Replaced wholesale by every snapshot from the `event` collection
/// watch; deletions filter optimistically ahead of the next snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventListState {
    /// Current entries.
    pub entries: Vec<EventEntry>,
    /// Whether at least one snapshot has arrived.
    pub loaded: bool,
    /// Whether a watch subscription is active.
    pub watching: bool,
    /// Last surfaced list-level failure, if any.
    pub last_error: Option<String>,
}

/// Live list of submitted guests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuestListState {
    /// Current entries.
    pub entries: Vec<GuestEntry>,
    /// Whether at least one snapshot has arrived.
    pub loaded: bool,
    /// Whether a watch subscription is active.
    pub watching: bool,
    /// Last surfaced list-level failure, if any.
    pub last_error: Option<String>,
}

/// Budget lines fetched from the `budget` collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetState {
    /// Fetched budget lines.
    pub entries: Vec<BudgetRecord>,
    /// Whether a fetch has completed.
    pub loaded: bool,
    /// Last surfaced fetch failure, if any.
    pub last_error: Option<String>,
}

/// Status reported by the authentication collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthStatus {
    /// No user is signed in.
    #[default]
    Unauthenticated,

    /// The auth collaborator has not settled yet.
    Loading,

    /// A user is signed in; their uid can be looked up.
    Authenticated,
}

// ═══════════════════════════════════════════════════════════════════════
// Root State
// ═══════════════════════════════════════════════════════════════════════

/// Root planner state.
///
/// This is the state managed by the planner reducer: every form draft,
/// error map, live list, and the auth snapshot, in one place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlannerState {
    /// Event creation form.
    pub event_form: EventFormState,

    /// Guest creation form.
    pub guest_form: GuestFormState,

    /// Sign-up form.
    pub sign_up: SignUpFormState,

    /// Created events list.
    pub events: EventListState,

    /// Submitted guests list.
    pub guests: GuestListState,

    /// Budget lines.
    pub budgets: BudgetState,

    /// Current auth status.
    pub auth: AuthStatus,

    /// Resolved uid of the authenticated user, if any.
    pub user_uid: Option<UserUid>,
}
