//! Mock auth gateway for testing.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{PlannerError, Result};
use crate::providers::AuthGateway;
use crate::state::{AuthStatus, UserUid};

/// Mock auth gateway with a scripted identity and failure injection.
#[derive(Debug, Default)]
pub struct MockAuthGateway {
    status: AuthStatus,
    uid: Option<UserUid>,
    fail_lookup: AtomicBool,
}

impl MockAuthGateway {
    /// A gateway signed in as the given uid.
    #[must_use]
    pub fn signed_in(uid: impl Into<String>) -> Self {
        Self {
            status: AuthStatus::Authenticated,
            uid: Some(UserUid::new(uid)),
            fail_lookup: AtomicBool::new(false),
        }
    }

    /// A gateway with nobody signed in.
    #[must_use]
    pub const fn signed_out() -> Self {
        Self {
            status: AuthStatus::Unauthenticated,
            uid: None,
            fail_lookup: AtomicBool::new(false),
        }
    }

    /// A gateway that has not settled yet.
    #[must_use]
    pub const fn loading() -> Self {
        Self {
            status: AuthStatus::Loading,
            uid: None,
            fail_lookup: AtomicBool::new(false),
        }
    }

    /// Make the next `user_uid` call fail.
    pub fn fail_next_lookup(&self) {
        self.fail_lookup.store(true, Ordering::SeqCst);
    }
}

impl AuthGateway for MockAuthGateway {
    fn status(&self) -> AuthStatus {
        self.status
    }

    fn user_uid(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Option<UserUid>>> + Send + '_>> {
        let fail = self.fail_lookup.swap(false, Ordering::SeqCst);
        let uid = self.uid.clone();

        Box::pin(async move {
            if fail {
                Err(PlannerError::AuthUnavailable("mock failure".to_string()))
            } else {
                Ok(uid)
            }
        })
    }
}
