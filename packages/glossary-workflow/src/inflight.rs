//! Per-definition in-flight tokens.
//!
//! Each lifecycle or vote mutation is a single outstanding round trip, and
//! the workflow never pipelines two mutations against the same definition:
//! the token is claimed before the request is issued and released when the
//! round trip resolves, success or failure.

use std::collections::HashSet;

use crate::error::{Result, WorkflowError};

/// Tracks which definitions currently have a mutation outstanding.
#[derive(Debug, Default)]
pub struct InFlight {
    active: HashSet<i64>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the token for a definition. Refused with
    /// [`WorkflowError::ItemBusy`] while a prior mutation is unresolved.
    pub fn begin(&mut self, id: i64) -> Result<()> {
        if !self.active.insert(id) {
            return Err(WorkflowError::ItemBusy(id));
        }
        Ok(())
    }

    /// Release the token. Safe to call for an id that holds none.
    pub fn finish(&mut self, id: i64) {
        self.active.remove(&id);
    }

    /// Whether the item's action controls should be disabled.
    pub fn is_active(&self, id: i64) -> bool {
        self.active.contains(&id)
    }
}
