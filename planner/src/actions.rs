//! Planner actions.
//!
//! This module defines all possible actions in the planning system.
//! Actions unify commands (user intent: a field change, a submit, a
//! delete) and events (results of async work: a snapshot arrived, a
//! write failed).
//!
//! # Architecture Note
//!
//! Actions are the **only** way to communicate with the planner.
//! The reducer is a pure function: `(State, Action, Env) → (State, Effects)`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use vowsuite_core::collection::DocumentId;
use vowsuite_core::document_store::Document;

use crate::state::{AuthStatus, BudgetRecord, FormField, GuestFlag, RecordCode, UserUid};

/// Planner action.
///
/// Commands come from the form surface and list views; events are
/// produced by effect futures and snapshot streams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlannerAction {
    // ═══════════════════════════════════════════════════════════════════════
    // Event Form
    // ═══════════════════════════════════════════════════════════════════════
    /// A text input of the event form changed.
    ///
    /// Clears the field's error and updates the draft.
    EventFieldChanged {
        /// Which field changed.
        field: FormField,
        /// The new raw value.
        value: String,
    },

    /// A date was picked for the event.
    EventDateSelected {
        /// The selected date.
        date: NaiveDate,
    },

    /// Submit the event form.
    ///
    /// # Flow
    ///
    /// 1. Run every field validator synchronously
    /// 2. Any failure: publish the full error map, no I/O
    /// 3. Otherwise: pull the next event code and write the code-registry
    ///    record followed by the event record
    SubmitEventForm,

    /// The event was persisted.
    ///
    /// This is an **event** produced by the submit effect.
    EventSubmitted {
        /// The code registered for the event.
        code: RecordCode,
        /// Store-assigned id of the event document.
        document_id: DocumentId,
    },

    /// The event could not be persisted.
    EventSubmitFailed {
        /// Why the write failed, after retries.
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Guest Form
    // ═══════════════════════════════════════════════════════════════════════
    /// A text input of the guest form changed.
    GuestFieldChanged {
        /// Which field changed.
        field: FormField,
        /// The new raw value.
        value: String,
    },

    /// A boolean guest attribute was toggled.
    GuestFlagChanged {
        /// Which flag changed.
        flag: GuestFlag,
        /// The new value.
        value: bool,
    },

    /// A dish was added to or removed from the guest's menu selection.
    GuestMenuToggled {
        /// The dish in question.
        dish: String,
    },

    /// A drink was added to or removed from the guest's preferences.
    GuestAlcoholToggled {
        /// The drink in question.
        drink: String,
    },

    /// The number of accompanying children changed.
    GuestChildrenChanged {
        /// New count, or `None` to clear.
        count: Option<u32>,
    },

    /// Submit the guest form.
    ///
    /// # Flow
    ///
    /// 1. Run every field validator synchronously
    /// 2. Any failure: publish the full error map, no I/O
    /// 3. Otherwise: await the duplicate-check query on
    ///    (first name, last name, email)
    /// 4. On a match: [`PlannerAction::GuestAlreadyExists`], nothing written
    /// 5. Otherwise: attach code, uid, and timestamp, then write the
    ///    code-registry record followed by the guest record
    SubmitGuestForm,

    /// The duplicate-check query matched an existing guest.
    ///
    /// This is an **event** produced by the submit effect.
    GuestAlreadyExists,

    /// The guest was persisted.
    GuestSubmitted {
        /// The code registered for the guest.
        code: RecordCode,
        /// Store-assigned id of the guest document.
        document_id: DocumentId,
    },

    /// The guest could not be persisted.
    GuestSubmitFailed {
        /// Why the write failed, after retries.
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Sign-Up Form
    // ═══════════════════════════════════════════════════════════════════════
    /// A text input of the sign-up form changed.
    SignUpFieldChanged {
        /// Which field changed.
        field: FormField,
        /// The new raw value.
        value: String,
    },

    /// Submit the sign-up form.
    ///
    /// Validation stops at the first failing field, clearing the password
    /// input on the way out. There is no remote call; account creation is
    /// delegated to the auth collaborator outside this scope.
    SubmitSignUp,

    // ═══════════════════════════════════════════════════════════════════════
    // Created-Event List
    // ═══════════════════════════════════════════════════════════════════════
    /// Start the live watch on the `event` collection.
    WatchEvents,

    /// Stop the live watch on the `event` collection.
    UnwatchEvents,

    /// A full snapshot of the `event` collection arrived.
    ///
    /// This is an **event** produced by the watch stream. The local list
    /// is replaced wholesale.
    EventsSnapshot {
        /// Every document currently in the collection.
        documents: Vec<Document>,
    },

    /// The `event` watch could not be established.
    EventsWatchFailed {
        /// Why the subscription failed.
        reason: String,
    },

    /// Delete a created event by document id.
    ///
    /// The entry is filtered out of the local list immediately; the
    /// delete runs against the store in the background.
    DeleteEvent {
        /// Document to delete.
        id: DocumentId,
    },

    /// The event document was removed from the store.
    EventDeleted {
        /// The deleted document.
        id: DocumentId,
    },

    /// The event document could not be removed.
    EventDeleteFailed {
        /// The document that survived.
        id: DocumentId,
        /// Why the delete failed, after retries.
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Guest List
    // ═══════════════════════════════════════════════════════════════════════
    /// Start the live watch on the `guest` collection.
    WatchGuests,

    /// Stop the live watch on the `guest` collection.
    UnwatchGuests,

    /// A full snapshot of the `guest` collection arrived.
    GuestsSnapshot {
        /// Every document currently in the collection.
        documents: Vec<Document>,
    },

    /// The `guest` watch could not be established.
    GuestsWatchFailed {
        /// Why the subscription failed.
        reason: String,
    },

    /// Delete a submitted guest by document id.
    DeleteGuest {
        /// Document to delete.
        id: DocumentId,
    },

    /// The guest document was removed from the store.
    GuestDeleted {
        /// The deleted document.
        id: DocumentId,
    },

    /// The guest document could not be removed.
    GuestDeleteFailed {
        /// The document that survived.
        id: DocumentId,
        /// Why the delete failed, after retries.
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Budgets
    // ═══════════════════════════════════════════════════════════════════════
    /// Fetch every budget line once.
    FetchBudgets,

    /// Budget lines arrived.
    BudgetsLoaded {
        /// Every parsed budget record.
        budgets: Vec<BudgetRecord>,
    },

    /// Budget lines could not be fetched.
    BudgetsLoadFailed {
        /// Why the query failed, after retries.
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Authentication
    // ═══════════════════════════════════════════════════════════════════════
    /// The auth collaborator reported a new status.
    ///
    /// On `Authenticated`, the uid lookup effect is started.
    AuthStatusChanged {
        /// The new status.
        status: AuthStatus,
    },

    /// The uid lookup settled.
    ///
    /// This is an **event** produced by the uid lookup effect. `None`
    /// means the lookup failed or no user was signed in; guests submitted
    /// in that window carry no owner uid.
    UserUidResolved {
        /// The resolved uid, if any.
        uid: Option<UserUid>,
    },
}
