//! CLI walkthrough of the planning workflows.
//!
//! Creates an event, adds guests (one duplicate gets rejected), watches
//! the live lists, and deletes the event - all against the in-memory
//! document store.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::NaiveDate;

use vowsuite_memstore::InMemoryDocumentStore;
use vowsuite_planner::providers::{AuthGateway, StaticAuthGateway};
use vowsuite_planner::state::FormField;
use vowsuite_planner::{PlannerAction, PlannerEnvironment, PlannerReducer, PlannerState};
use vowsuite_runtime::Store;

const WAIT: Duration = Duration::from_secs(5);

type PlannerStore = Store<PlannerState, PlannerAction, PlannerEnvironment, PlannerReducer>;

async fn set_fields(
    store: &PlannerStore,
    fields: &[(FormField, &str)],
    make: impl Fn(FormField, String) -> PlannerAction,
) -> anyhow::Result<()> {
    for (field, value) in fields {
        store.send(make(*field, (*value).to_string())).await?;
    }
    Ok(())
}

async fn add_guest(store: &PlannerStore, first: &str, last: &str, email: &str) -> anyhow::Result<()> {
    set_fields(
        store,
        &[
            (FormField::FirstName, first),
            (FormField::LastName, last),
            (FormField::Email, email),
        ],
        |field, value| PlannerAction::GuestFieldChanged { field, value },
    )
    .await?;

    let outcome = store
        .send_and_wait_for(
            PlannerAction::SubmitGuestForm,
            |a| {
                matches!(
                    a,
                    PlannerAction::GuestSubmitted { .. }
                        | PlannerAction::GuestAlreadyExists
                        | PlannerAction::GuestSubmitFailed { .. }
                )
            },
            WAIT,
        )
        .await?;

    match outcome {
        PlannerAction::GuestSubmitted { code, .. } => {
            println!("  [+] {first} {last} added (code {code})");
        },
        PlannerAction::GuestAlreadyExists => {
            println!("  [!] {first} {last} rejected: guest already exists");
        },
        PlannerAction::GuestSubmitFailed { reason } => {
            println!("  [!] {first} {last} failed: {reason}");
        },
        _ => {},
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Vowsuite Planner Demo ===\n");

    let auth = Arc::new(StaticAuthGateway::signed_in("demo-user"));
    let status = auth.status();
    let env = PlannerEnvironment::new(Arc::new(InMemoryDocumentStore::new()), auth);
    let store = Store::new(PlannerState::default(), PlannerReducer::new(), env);

    // Sign in and watch both lists.
    store
        .send_and_wait_for(
            PlannerAction::AuthStatusChanged { status },
            |a| matches!(a, PlannerAction::UserUidResolved { .. }),
            WAIT,
        )
        .await?;
    store.send(PlannerAction::WatchEvents).await?;
    store.send(PlannerAction::WatchGuests).await?;

    // Create the event.
    println!("Creating event...");
    set_fields(
        &store,
        &[
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
        ],
        |field, value| PlannerAction::EventFieldChanged { field, value },
    )
    .await?;
    let date = NaiveDate::from_ymd_opt(2026, 9, 12).context("valid demo date")?;
    store.send(PlannerAction::EventDateSelected { date }).await?;

    let submitted = store
        .send_and_wait_for(
            PlannerAction::SubmitEventForm,
            |a| {
                matches!(
                    a,
                    PlannerAction::EventSubmitted { .. } | PlannerAction::EventSubmitFailed { .. }
                )
            },
            WAIT,
        )
        .await?;
    if let PlannerAction::EventSubmitted { code, .. } = submitted {
        println!("  [+] Ann & Bea created (code {code})");
    }

    // Add guests; the duplicate is rejected by the pre-insert check.
    println!("\nAdding guests...");
    add_guest(&store, "Cay", "Miller", "cay@example.com").await?;
    add_guest(&store, "Dee", "Jones", "dee@example.com").await?;
    add_guest(&store, "Cay", "Miller", "cay@example.com").await?;

    // Let the snapshots settle, then render the lists.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let events = store.state(|s| s.events.entries.clone()).await;
    println!("\nEvents ({}):", events.len());
    for entry in &events {
        println!(
            "  {} & {} on {} (in {} days)",
            entry.record.first_person,
            entry.record.second_person,
            entry.record.event_date,
            entry.record.days_until(chrono::Utc::now()),
        );
    }

    let guests = store.state(|s| s.guests.entries.clone()).await;
    println!("\nGuests ({}):", guests.len());
    for entry in &guests {
        println!("  {} {}", entry.record.first_name, entry.record.last_name);
    }

    // Delete the event; the list updates optimistically.
    if let Some(entry) = events.first() {
        println!("\nDeleting {} & {}...", entry.record.first_person, entry.record.second_person);
        store
            .send_and_wait_for(
                PlannerAction::DeleteEvent {
                    id: entry.id.clone(),
                },
                |a| matches!(a, PlannerAction::EventDeleted { .. }),
                WAIT,
            )
            .await?;
    }
    let remaining = store.state(|s| s.events.entries.len()).await;
    println!("Events remaining: {remaining}");

    store.send(PlannerAction::UnwatchEvents).await?;
    store.send(PlannerAction::UnwatchGuests).await?;
    store.shutdown(WAIT).await?;

    println!("\n=== Demo Complete ===");
    Ok(())
}
