//! Error types for planning operations.

use thiserror::Error;

use vowsuite_core::document_store::DocumentStoreError;

/// Result type alias for planning operations.
pub type Result<T> = std::result::Result<T, PlannerError>;

/// Error taxonomy for the planning workflows.
///
/// Field-level validation failures never become errors; they live in the
/// per-form error maps. This enum covers the failures that cross the
/// provider boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlannerError {
    // ═══════════════════════════════════════════════════════════
    // Submission Errors
    // ═══════════════════════════════════════════════════════════
    /// A guest with the same first name, last name, and email already
    /// exists.
    #[error("Guest already exists")]
    DuplicateGuest,

    // ═══════════════════════════════════════════════════════════
    // System Errors
    // ═══════════════════════════════════════════════════════════
    /// A document store operation failed.
    #[error(transparent)]
    Store(#[from] DocumentStoreError),

    /// The auth collaborator could not be reached.
    #[error("Authentication unavailable: {0}")]
    AuthUnavailable(String),
}

impl PlannerError {
    /// Returns `true` if this error is caused by the user's input rather
    /// than the system.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vowsuite_planner::error::PlannerError;
    /// assert!(PlannerError::DuplicateGuest.is_user_error());
    /// assert!(!PlannerError::AuthUnavailable("down".into()).is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::DuplicateGuest)
    }
}
