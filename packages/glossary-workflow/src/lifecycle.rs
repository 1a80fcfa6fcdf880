//! Definition lifecycle state machine.
//!
//! Pure and synchronous: no IO, just the permitted moderation transitions.
//! A definition is created pending, an administrator approves it, and an
//! administrator rejection or author self-deletion removes it. There is no
//! path from approved back to pending, and deletion is terminal.

use std::fmt;

use glossary_client::Definition;
use thiserror::Error;

/// Moderation status of a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionStatus {
    /// Awaiting administrator review; not publicly visible.
    Pending,
    /// Visible on the term's public page.
    Approved,
    /// Removed. Terminal.
    Deleted,
}

/// A requested transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    /// Administrator accepts a pending definition.
    Approve,
    /// Administrator rejection or author self-deletion.
    Delete,
}

/// A transition the state machine does not permit. Raised locally; no
/// request is issued for an illegal transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot {action} a {status} definition")]
pub struct InvalidTransition {
    pub status: DefinitionStatus,
    pub action: ModerationAction,
}

impl DefinitionStatus {
    /// Status of a fetched record. The wire carries a boolean approval
    /// flag; deleted records simply stop existing.
    pub fn of(definition: &Definition) -> Self {
        if definition.is_approved {
            Self::Approved
        } else {
            Self::Pending
        }
    }

    /// Whether the definition appears on its term's public page.
    pub fn publicly_visible(self) -> bool {
        self == Self::Approved
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Deleted
    }

    /// Apply an action, yielding the next status or an error.
    pub fn apply(self, action: ModerationAction) -> Result<Self, InvalidTransition> {
        match (self, action) {
            (Self::Pending, ModerationAction::Approve) => Ok(Self::Approved),
            (Self::Pending | Self::Approved, ModerationAction::Delete) => Ok(Self::Deleted),
            (status, action) => Err(InvalidTransition { status, action }),
        }
    }
}

impl fmt::Display for DefinitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Deleted => "deleted",
        };
        write!(f, "{word}")
    }
}

impl fmt::Display for ModerationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            Self::Approve => "approve",
            Self::Delete => "delete",
        };
        write!(f, "{word}")
    }
}
