//! Mock providers for testing.
//!
//! These mocks let reducer and workflow tests run without any real
//! collaborator: a store whose operations fail on demand, an auth
//! gateway with a scripted identity, and a ready-made test environment.

pub mod auth;
pub mod store;

pub use auth::MockAuthGateway;
pub use store::{FlakyStore, NullStore};

use std::sync::Arc;

use vowsuite_core::environment::FixedClock;
use vowsuite_runtime::RetryPolicy;

use crate::codes::FixedCodes;
use crate::config::PlannerConfig;
use crate::environment::PlannerEnvironment;

/// A deterministic environment for pure reducer tests.
///
/// Effects built against this environment are never executed by
/// `ReducerTest`, so the null store is sufficient; workflow tests swap in
/// a real in-memory store instead.
#[must_use]
pub fn test_environment() -> PlannerEnvironment {
    use chrono::TimeZone;

    let moment = chrono::Utc
        .with_ymd_and_hms(2026, 1, 15, 12, 0, 0)
        .single()
        .unwrap_or_default();

    PlannerEnvironment::with_config(
        Arc::new(NullStore),
        Arc::new(MockAuthGateway::signed_in("uid-test")),
        PlannerConfig::new().with_retry(RetryPolicy::no_retries()),
    )
    .with_clock(Arc::new(FixedClock::new(moment)))
    .with_codes(
        Arc::new(FixedCodes::new(vec![1111, 2222, 3333])),
        Arc::new(FixedCodes::new(vec![5001, 5002, 5003])),
    )
}
