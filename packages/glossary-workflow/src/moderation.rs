//! The administrator's pending-definitions queue.
//!
//! The queue holds its own fetched copy of the pending list. A successful
//! approve or reject drops the acted-upon item from that copy without a
//! follow-up read; any failure leaves the list exactly as it was. One
//! mutation per item may be outstanding at a time.

use std::sync::Arc;

use glossary_client::Definition;
use tracing::{debug, info};

use crate::error::{Result, WorkflowError};
use crate::gateway::DefinitionGateway;
use crate::inflight::InFlight;
use crate::lifecycle::{DefinitionStatus, ModerationAction};
use crate::session::SessionContext;

pub struct ModerationQueue {
    gateway: Arc<dyn DefinitionGateway>,
    items: Vec<Definition>,
    in_flight: InFlight,
}

impl ModerationQueue {
    pub fn new(gateway: Arc<dyn DefinitionGateway>) -> Self {
        Self {
            gateway,
            items: Vec::new(),
            in_flight: InFlight::new(),
        }
    }

    /// Reload the pending list. An approved definition can never appear
    /// here, whatever the collaborator returns.
    pub async fn refresh(&mut self, session: &mut SessionContext) -> Result<()> {
        session.require()?;
        let items = session.intercept(self.gateway.pending_definitions().await)?;
        self.items = items
            .into_iter()
            .filter(|d| DefinitionStatus::of(d) == DefinitionStatus::Pending)
            .collect();
        debug!(count = self.items.len(), "Pending queue refreshed");
        Ok(())
    }

    pub fn items(&self) -> &[Definition] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the item's approve/reject controls are disabled.
    pub fn is_processing(&self, id: i64) -> bool {
        self.in_flight.is_active(id)
    }

    /// Approve a pending definition. On success the item leaves the local
    /// list; the returned record is the approved definition.
    pub async fn approve(
        &mut self,
        session: &mut SessionContext,
        id: i64,
    ) -> Result<Definition> {
        self.guard(session, id, ModerationAction::Approve)?;

        let result = session.intercept(self.gateway.approve_definition(id).await);
        self.in_flight.finish(id);

        match result {
            Ok(approved) => {
                self.drop_item(id);
                info!(definition_id = id, "Definition approved");
                Ok(approved)
            }
            Err(err) => Err(self.absorb_failure(id, err)),
        }
    }

    /// Reject a pending definition, deleting it. On success the item leaves
    /// the local list.
    pub async fn reject(&mut self, session: &mut SessionContext, id: i64) -> Result<()> {
        self.guard(session, id, ModerationAction::Delete)?;

        let result = session.intercept(self.gateway.delete_definition(id).await);
        self.in_flight.finish(id);

        match result {
            Ok(()) => {
                self.drop_item(id);
                info!(definition_id = id, "Definition rejected");
                Ok(())
            }
            Err(err) => Err(self.absorb_failure(id, err)),
        }
    }

    /// Pre-request checks shared by both actions: a session must exist, the
    /// item must be in the local list in a state that permits the action,
    /// and no other mutation may be in flight for it. Claims the token.
    fn guard(
        &mut self,
        session: &SessionContext,
        id: i64,
        action: ModerationAction,
    ) -> Result<()> {
        session.require()?;
        let item = self
            .items
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| WorkflowError::Api(not_in_queue(id)))?;
        DefinitionStatus::of(item).apply(action)?;
        self.in_flight.begin(id)
    }

    /// A 404 means the item was already acted on elsewhere: drop the stale
    /// entry, then surface the error.
    fn absorb_failure(&mut self, id: i64, err: WorkflowError) -> WorkflowError {
        if err.is_not_found() {
            self.drop_item(id);
        }
        err
    }

    fn drop_item(&mut self, id: i64) {
        self.items.retain(|d| d.id != id);
    }
}

fn not_in_queue(id: i64) -> glossary_client::GlossaryError {
    glossary_client::GlossaryError::NotFound(format!("definition {id} is not in the pending queue"))
}
