//! Error types for the workflow layer.
//!
//! Every failure leaves prior local state intact: the acted-upon item keeps
//! its place in whatever list holds it, its in-flight token is released, and
//! the caller re-enables the action control and surfaces the message.

use glossary_client::{GlossaryError, ValidationErrors};
use thiserror::Error;

use crate::lifecycle::InvalidTransition;

/// Result type for workflow operations.
pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Workflow errors.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// No session, or the service rejected the credential (401). The caller
    /// routes to the login entry point; nothing was recorded.
    #[error("Authentication required")]
    AuthRequired,

    /// A mutation for this definition is already in flight; the control is
    /// disabled until that round trip resolves.
    #[error("Definition {0} already has an action in flight")]
    ItemBusy(i64),

    /// The requested lifecycle transition is not permitted; no request was
    /// issued.
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    /// Field-level validation failure, raised locally before any network
    /// mutation or surfaced from a 422.
    #[error("Validation failed: {0}")]
    Invalid(ValidationErrors),

    /// Anything else surfaced by the collaborator API.
    #[error(transparent)]
    Api(GlossaryError),
}

impl From<GlossaryError> for WorkflowError {
    fn from(err: GlossaryError) -> Self {
        match err {
            GlossaryError::AuthRequired => Self::AuthRequired,
            GlossaryError::Validation(errors) => Self::Invalid(errors),
            other => Self::Api(other),
        }
    }
}

impl WorkflowError {
    /// True when the only recovery is to authenticate again.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::AuthRequired)
    }

    /// True when the target record no longer exists on the collaborator.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api(GlossaryError::NotFound(_)))
    }
}
