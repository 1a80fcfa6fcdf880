//! Explicit session context.
//!
//! The session is passed to the workflow types instead of read from ambient
//! storage, so the dependency is visible and testable. A 401 from any call
//! clears the context; the caller then routes to the login entry point.

use glossary_client::{AuthSession, GlossaryError, User};
use tracing::debug;

use crate::error::{Result, WorkflowError};

/// An authenticated caller: the bearer token and the account it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    /// Advisory display flag only. Authorization is enforced by the
    /// collaborator on every request and is not re-checked client-side.
    pub fn is_admin(&self) -> bool {
        self.user.is_admin
    }
}

impl From<AuthSession> for Session {
    fn from(auth: AuthSession) -> Self {
        Self {
            token: auth.token,
            user: auth.user,
        }
    }
}

/// Holds the current session, if any. Set at login, cleared at logout or on
/// the first 401.
#[derive(Debug, Default)]
pub struct SessionContext {
    current: Option<Session>,
}

impl SessionContext {
    /// An anonymous context.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context that starts signed in.
    pub fn signed_in(session: Session) -> Self {
        Self {
            current: Some(session),
        }
    }

    pub fn sign_in(&mut self, session: Session) {
        debug!(user_id = session.user.id, "Session established");
        self.current = Some(session);
    }

    pub fn sign_out(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Advisory admin flag; `false` when anonymous.
    pub fn is_admin(&self) -> bool {
        self.current.as_ref().is_some_and(Session::is_admin)
    }

    /// The session, or [`WorkflowError::AuthRequired`] so the caller can
    /// redirect to login before any request is issued.
    pub fn require(&self) -> Result<&Session> {
        self.current
            .as_ref()
            .ok_or(WorkflowError::AuthRequired)
    }

    /// Pass a collaborator result through the session: a 401 clears the
    /// context (the stored credential is no longer valid) before the error
    /// is surfaced.
    pub fn intercept<T>(&mut self, result: glossary_client::Result<T>) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(GlossaryError::AuthRequired) => {
                debug!("Session rejected by the API, clearing local state");
                self.current = None;
                Err(WorkflowError::AuthRequired)
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, is_admin: bool) -> User {
        User {
            id,
            name: format!("user-{id}"),
            email: None,
            is_admin,
            created_at: None,
        }
    }

    fn session(id: i64, is_admin: bool) -> Session {
        Session {
            token: format!("token-{id}"),
            user: user(id, is_admin),
        }
    }

    #[test]
    fn require_fails_when_anonymous() {
        let ctx = SessionContext::new();
        assert!(matches!(ctx.require(), Err(WorkflowError::AuthRequired)));
    }

    #[test]
    fn require_returns_session_when_signed_in() {
        let ctx = SessionContext::signed_in(session(7, false));
        assert_eq!(ctx.require().unwrap().user.id, 7);
        assert!(!ctx.is_admin());
    }

    #[test]
    fn intercept_clears_session_on_401() {
        let mut ctx = SessionContext::signed_in(session(7, true));
        let result: Result<()> = ctx.intercept(Err(GlossaryError::AuthRequired));
        assert!(matches!(result, Err(WorkflowError::AuthRequired)));
        assert!(!ctx.is_authenticated());
    }

    #[test]
    fn intercept_keeps_session_on_other_errors() {
        let mut ctx = SessionContext::signed_in(session(7, true));
        let result: Result<()> =
            ctx.intercept(Err(GlossaryError::NotFound("definition 3".into())));
        assert!(result.unwrap_err().is_not_found());
        assert!(ctx.is_authenticated());
    }
}
