//! End-to-end submission workflows over a real Store and the in-memory
//! document store: event creation, guest creation with duplicate
//! detection, and failure surfacing.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use vowsuite_core::collection::CollectionId;
use vowsuite_core::document_store::DocumentStore;
use vowsuite_memstore::InMemoryDocumentStore;
use vowsuite_planner::codes::FixedCodes;
use vowsuite_planner::mocks::{FlakyStore, MockAuthGateway};
use vowsuite_planner::state::{AuthStatus, FormField, FormPhase};
use vowsuite_planner::{
    PlannerAction, PlannerConfig, PlannerEnvironment, PlannerReducer, PlannerState,
};
use vowsuite_runtime::{RetryPolicy, Store};

type PlannerStore = Store<PlannerState, PlannerAction, PlannerEnvironment, PlannerReducer>;

const WAIT: Duration = Duration::from_secs(2);

fn environment(store: Arc<dyn vowsuite_core::document_store::DocumentStore>) -> PlannerEnvironment {
    PlannerEnvironment::with_config(
        store,
        Arc::new(MockAuthGateway::signed_in("uid-test")),
        PlannerConfig::new().with_retry(RetryPolicy::no_retries()),
    )
    .with_codes(
        Arc::new(FixedCodes::new(vec![1111, 1112, 1113])),
        Arc::new(FixedCodes::new(vec![5001, 5002, 5003])),
    )
}

fn planner_store(env: PlannerEnvironment) -> PlannerStore {
    Store::new(PlannerState::default(), PlannerReducer::new(), env)
}

async fn fill_event_form(store: &PlannerStore) {
    let fields = [
        (FormField::FirstPerson, "Ann"),
        (FormField::SecondPerson, "Bea"),
        (FormField::EventTime, "16:30"),
        (FormField::CeremonyPlace, "Old Chapel"),
        (FormField::CeremonyStreetAddress, "Main St 1"),
        (FormField::CeremonyCityAddress, "Springfield"),
        (FormField::ReceptionPlace, "Garden Hall"),
        (FormField::ReceptionStreetAddress, "Park Ave 2"),
        (FormField::ReceptionCityAddress, "Springfield"),
        (FormField::FirstPersonPhone, "123456"),
        (FormField::SecondPersonPhone, "604 321 987"),
    ];
    for (field, value) in fields {
        store
            .send(PlannerAction::EventFieldChanged {
                field,
                value: value.to_string(),
            })
            .await
            .unwrap();
    }
    store
        .send(PlannerAction::EventDateSelected {
            date: NaiveDate::from_ymd_opt(2026, 9, 12).unwrap(),
        })
        .await
        .unwrap();
}

async fn fill_guest_form(store: &PlannerStore, first: &str, last: &str, email: &str) {
    let fields = [
        (FormField::FirstName, first),
        (FormField::LastName, last),
        (FormField::Email, email),
    ];
    for (field, value) in fields {
        store
            .send(PlannerAction::GuestFieldChanged {
                field,
                value: value.to_string(),
            })
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn event_submission_writes_registry_and_record_then_resets() {
    let memstore = InMemoryDocumentStore::new();
    let store = planner_store(environment(Arc::new(memstore.clone())));

    fill_event_form(&store).await;

    let result = store
        .send_and_wait_for(
            PlannerAction::SubmitEventForm,
            |a| matches!(a, PlannerAction::EventSubmitted { .. }),
            WAIT,
        )
        .await
        .unwrap();

    if let PlannerAction::EventSubmitted { code, .. } = result {
        assert_eq!(code.value(), 1111);
    }

    // Exactly one event record and one registry record.
    assert_eq!(memstore.len(&CollectionId::new("event")), 1);
    assert_eq!(memstore.len(&CollectionId::new("event-id")), 1);

    // Registry document carries just the code.
    let registry = memstore
        .find(CollectionId::new("event-id"), vec![])
        .await
        .unwrap();
    assert_eq!(registry[0].data, serde_json::json!({"ID": 1111}));

    // The form reset to its initial values.
    let form = store.state(|s| s.event_form.clone()).await;
    assert!(form.draft.first_person.is_empty());
    assert_eq!(form.draft.lead_color, "#FFFFFF");
    assert!(form.errors.is_empty());
    assert_eq!(form.phase, FormPhase::Editing);
}

#[tokio::test]
async fn event_submit_without_date_reports_event_date_and_writes_nothing() {
    let memstore = InMemoryDocumentStore::new();
    let store = planner_store(environment(Arc::new(memstore.clone())));

    // Everything except the date.
    let fields = [
        (FormField::FirstPerson, "Ann"),
        (FormField::SecondPerson, "Bea"),
        (FormField::EventTime, "16:30"),
        (FormField::CeremonyPlace, "Old Chapel"),
        (FormField::CeremonyStreetAddress, "Main St 1"),
        (FormField::CeremonyCityAddress, "Springfield"),
        (FormField::ReceptionPlace, "Garden Hall"),
        (FormField::ReceptionStreetAddress, "Park Ave 2"),
        (FormField::ReceptionCityAddress, "Springfield"),
        (FormField::FirstPersonPhone, "123456"),
        (FormField::SecondPersonPhone, "654321"),
    ];
    for (field, value) in fields {
        store
            .send(PlannerAction::EventFieldChanged {
                field,
                value: value.to_string(),
            })
            .await
            .unwrap();
    }

    let handle = store.send(PlannerAction::SubmitEventForm).await.unwrap();
    handle.wait_with_timeout(WAIT).await.unwrap();

    let errors = store.state(|s| s.event_form.errors.clone()).await;
    assert!(errors.contains_key(&FormField::EventDate));
    assert!(memstore.is_empty(&CollectionId::new("event")));
    assert!(memstore.is_empty(&CollectionId::new("event-id")));
}

#[tokio::test]
async fn guest_submission_writes_one_guest_and_one_registry_record() {
    let memstore = InMemoryDocumentStore::new();
    let store = planner_store(environment(Arc::new(memstore.clone())));

    fill_guest_form(&store, "Ann", "Lee", "ann@x.com").await;

    let result = store
        .send_and_wait_for(
            PlannerAction::SubmitGuestForm,
            |a| matches!(a, PlannerAction::GuestSubmitted { .. }),
            WAIT,
        )
        .await
        .unwrap();

    if let PlannerAction::GuestSubmitted { code, .. } = result {
        assert_eq!(code.value(), 5001);
    }

    assert_eq!(memstore.len(&CollectionId::new("guest")), 1);
    assert_eq!(memstore.len(&CollectionId::new("guest-id")), 1);

    let guests = memstore.find(CollectionId::new("guest"), vec![]).await.unwrap();
    assert_eq!(guests[0].data["firstName"], "Ann");
    assert_eq!(guests[0].data["guestID"], 5001);

    // The draft reset for the next guest.
    let draft = store.state(|s| s.guest_form.draft.clone()).await;
    assert!(draft.first_name.is_empty());
}

#[tokio::test]
async fn second_submission_of_same_triple_is_rejected_with_exists() {
    let memstore = InMemoryDocumentStore::new();
    let store = planner_store(environment(Arc::new(memstore.clone())));

    fill_guest_form(&store, "Ann", "Lee", "ann@x.com").await;
    store
        .send_and_wait_for(
            PlannerAction::SubmitGuestForm,
            |a| matches!(a, PlannerAction::GuestSubmitted { .. }),
            WAIT,
        )
        .await
        .unwrap();

    // Same triple again.
    fill_guest_form(&store, "Ann", "Lee", "ann@x.com").await;
    store
        .send_and_wait_for(
            PlannerAction::SubmitGuestForm,
            |a| matches!(a, PlannerAction::GuestAlreadyExists),
            WAIT,
        )
        .await
        .unwrap();

    // No new records, and the error is surfaced under `exists`.
    assert_eq!(memstore.len(&CollectionId::new("guest")), 1);
    assert_eq!(memstore.len(&CollectionId::new("guest-id")), 1);

    let errors = store.state(|s| s.guest_form.errors.clone()).await;
    assert_eq!(
        errors.get(&FormField::Exists),
        Some(&"Guest already exists".to_string())
    );

    // The rejected draft is preserved for correction.
    let draft = store.state(|s| s.guest_form.draft.clone()).await;
    assert_eq!(draft.first_name, "Ann");
}

#[tokio::test]
async fn different_email_is_not_a_duplicate() {
    let memstore = InMemoryDocumentStore::new();
    let store = planner_store(environment(Arc::new(memstore.clone())));

    fill_guest_form(&store, "Ann", "Lee", "ann@x.com").await;
    store
        .send_and_wait_for(
            PlannerAction::SubmitGuestForm,
            |a| matches!(a, PlannerAction::GuestSubmitted { .. }),
            WAIT,
        )
        .await
        .unwrap();

    fill_guest_form(&store, "Ann", "Lee", "ann.lee@y.org").await;
    store
        .send_and_wait_for(
            PlannerAction::SubmitGuestForm,
            |a| matches!(a, PlannerAction::GuestSubmitted { .. }),
            WAIT,
        )
        .await
        .unwrap();

    assert_eq!(memstore.len(&CollectionId::new("guest")), 2);
}

#[tokio::test]
async fn submitted_guest_carries_the_resolved_user_uid() {
    let memstore = InMemoryDocumentStore::new();
    let store = planner_store(environment(Arc::new(memstore.clone())));

    // The shell observed a signed-in user; the uid lookup settles first.
    store
        .send_and_wait_for(
            PlannerAction::AuthStatusChanged {
                status: AuthStatus::Authenticated,
            },
            |a| matches!(a, PlannerAction::UserUidResolved { .. }),
            WAIT,
        )
        .await
        .unwrap();

    fill_guest_form(&store, "Ann", "Lee", "ann@x.com").await;
    store
        .send_and_wait_for(
            PlannerAction::SubmitGuestForm,
            |a| matches!(a, PlannerAction::GuestSubmitted { .. }),
            WAIT,
        )
        .await
        .unwrap();

    let guests = memstore.find(CollectionId::new("guest"), vec![]).await.unwrap();
    assert_eq!(guests[0].data["userUID"], "uid-test");
}

#[tokio::test]
async fn failed_write_surfaces_a_form_error_and_keeps_the_draft() {
    let memstore = InMemoryDocumentStore::new();
    let flaky = Arc::new(FlakyStore::new(Arc::new(memstore.clone())));
    let store = planner_store(environment(flaky.clone()));

    fill_event_form(&store).await;

    // The registry write fails; with no retries the failure surfaces
    // immediately.
    flaky.fail_adds(1);

    store
        .send_and_wait_for(
            PlannerAction::SubmitEventForm,
            |a| matches!(a, PlannerAction::EventSubmitFailed { .. }),
            WAIT,
        )
        .await
        .unwrap();

    let form = store.state(|s| s.event_form.clone()).await;
    assert_eq!(form.phase, FormPhase::Editing);
    assert_eq!(form.draft.first_person, "Ann"); // draft intact
    let error = form.errors.get(&FormField::Submit);
    assert!(error.is_some_and(|e| e.contains("Could not save your event")));

    // Nothing landed in the store.
    assert!(memstore.is_empty(&CollectionId::new("event")));
    assert!(memstore.is_empty(&CollectionId::new("event-id")));
}

#[tokio::test]
async fn transient_write_failure_is_retried_to_success() {
    let memstore = InMemoryDocumentStore::new();
    let flaky = Arc::new(FlakyStore::new(Arc::new(memstore.clone())));

    // Two attempts allowed, first add fails once.
    let env = PlannerEnvironment::with_config(
        flaky.clone(),
        Arc::new(MockAuthGateway::signed_in("uid-test")),
        PlannerConfig::new().with_retry(
            RetryPolicy::new()
                .with_max_attempts(2)
                .with_initial_delay(Duration::from_millis(1)),
        ),
    );
    let store = planner_store(env);

    fill_event_form(&store).await;
    flaky.fail_adds(1);

    store
        .send_and_wait_for(
            PlannerAction::SubmitEventForm,
            |a| matches!(a, PlannerAction::EventSubmitted { .. }),
            WAIT,
        )
        .await
        .unwrap();

    assert_eq!(memstore.len(&CollectionId::new("event")), 1);
}

#[tokio::test]
async fn duplicate_check_failure_surfaces_instead_of_writing() {
    let memstore = InMemoryDocumentStore::new();
    let flaky = Arc::new(FlakyStore::new(Arc::new(memstore.clone())));
    let store = planner_store(environment(flaky.clone()));

    fill_guest_form(&store, "Ann", "Lee", "ann@x.com").await;
    flaky.fail_finds(1);

    store
        .send_and_wait_for(
            PlannerAction::SubmitGuestForm,
            |a| matches!(a, PlannerAction::GuestSubmitFailed { .. }),
            WAIT,
        )
        .await
        .unwrap();

    // The check failed, so nothing was written at all.
    assert!(memstore.is_empty(&CollectionId::new("guest")));
    assert!(memstore.is_empty(&CollectionId::new("guest-id")));
}
