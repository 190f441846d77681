//! Authentication gateway trait.
//!
//! The planner never authenticates anyone itself; it only observes the
//! auth collaborator's status and looks up the signed-in user's opaque
//! uid to stamp onto submitted guests.

use std::future::Future;
use std::pin::Pin;

use crate::error::Result;
use crate::state::{AuthStatus, UserUid};

/// Authentication collaborator.
///
/// # Dyn Compatibility
///
/// The uid lookup returns `Pin<Box<dyn Future>>` instead of `async fn`
/// to enable trait object usage (`Arc<dyn AuthGateway>`) inside effect
/// futures.
pub trait AuthGateway: Send + Sync {
    /// The collaborator's current status.
    fn status(&self) -> AuthStatus;

    /// Look up the signed-in user's opaque uid.
    ///
    /// Returns `None` when no user is signed in.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::AuthUnavailable`](crate::error::PlannerError::AuthUnavailable)
    /// if the collaborator cannot be reached.
    fn user_uid(&self)
    -> Pin<Box<dyn Future<Output = Result<Option<UserUid>>> + Send + '_>>;
}

/// Fixed-identity gateway for development and demos.
///
/// Reports `Authenticated` with a constant uid, or `Unauthenticated`
/// when constructed without one.
#[derive(Debug, Clone)]
pub struct StaticAuthGateway {
    uid: Option<UserUid>,
}

impl StaticAuthGateway {
    /// A gateway signed in as the given uid.
    #[must_use]
    pub fn signed_in(uid: impl Into<String>) -> Self {
        Self {
            uid: Some(UserUid::new(uid)),
        }
    }

    /// A gateway with nobody signed in.
    #[must_use]
    pub const fn signed_out() -> Self {
        Self { uid: None }
    }
}

impl AuthGateway for StaticAuthGateway {
    fn status(&self) -> AuthStatus {
        if self.uid.is_some() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Unauthenticated
        }
    }

    fn user_uid(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Option<UserUid>>> + Send + '_>> {
        let uid = self.uid.clone();
        Box::pin(async move { Ok(uid) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn signed_in_gateway_reports_uid() {
        let gateway = StaticAuthGateway::signed_in("uid-1");
        assert_eq!(gateway.status(), AuthStatus::Authenticated);
        assert_eq!(
            gateway.user_uid().await,
            Ok(Some(UserUid::new("uid-1")))
        );
    }

    #[tokio::test]
    async fn signed_out_gateway_reports_none() {
        let gateway = StaticAuthGateway::signed_out();
        assert_eq!(gateway.status(), AuthStatus::Unauthenticated);
        assert_eq!(gateway.user_uid().await, Ok(None));
    }
}
