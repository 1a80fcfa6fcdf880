//! Vote casting and local vote-state reconciliation.
//!
//! A user holds at most one vote per definition. Casting the value they
//! already hold removes it; casting the opposite value replaces it. The
//! collaborator applies these semantics and owns the score; the panel's job
//! is to keep its local "my vote" and score copies in step with what the
//! service actually recorded.

use std::collections::HashMap;
use std::sync::Arc;

use glossary_client::{Definition, VoteValue};
use tracing::{debug, warn};

use crate::error::Result;
use crate::gateway::DefinitionGateway;
use crate::inflight::InFlight;
use crate::session::SessionContext;

/// The toggle rule, applied locally only to predict the outcome:
/// no vote + v → v; v + v → none; v + opposite → opposite.
pub fn toggle(current: Option<VoteValue>, cast: VoteValue) -> Option<VoteValue> {
    match current {
        Some(existing) if existing == cast => None,
        _ => Some(cast),
    }
}

/// Result of a completed vote round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteReceipt {
    /// The caller's vote after the toggle: exactly one of absent, up, down.
    pub my_vote: Option<VoteValue>,
    /// The definition's score as the collaborator reports it.
    pub score: i64,
}

/// Vote state for the definitions currently on screen.
pub struct VotePanel {
    gateway: Arc<dyn DefinitionGateway>,
    my_votes: HashMap<i64, VoteValue>,
    scores: HashMap<i64, i64>,
    in_flight: InFlight,
}

impl VotePanel {
    pub fn new(gateway: Arc<dyn DefinitionGateway>) -> Self {
        Self {
            gateway,
            my_votes: HashMap::new(),
            scores: HashMap::new(),
            in_flight: InFlight::new(),
        }
    }

    /// Prime local state for a fetched set of definitions: scores from the
    /// records, the caller's votes from the service when signed in. A
    /// missing vote record means no vote.
    pub async fn load(
        &mut self,
        session: &mut SessionContext,
        definitions: &[Definition],
    ) -> Result<()> {
        for definition in definitions {
            self.scores.insert(definition.id, definition.score);
        }
        if !session.is_authenticated() {
            return Ok(());
        }
        for definition in definitions {
            match session.intercept(self.gateway.my_vote(definition.id).await) {
                Ok(Some(vote)) => {
                    self.my_votes.insert(definition.id, vote.value);
                }
                Ok(None) => {
                    self.my_votes.remove(&definition.id);
                }
                Err(err) if err.is_not_found() => {
                    self.my_votes.remove(&definition.id);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// The caller's locally tracked vote on a definition.
    pub fn my_vote(&self, definition_id: i64) -> Option<VoteValue> {
        self.my_votes.get(&definition_id).copied()
    }

    /// The locally tracked score, when the definition has been loaded.
    pub fn score(&self, definition_id: i64) -> Option<i64> {
        self.scores.get(&definition_id).copied()
    }

    /// Whether the definition's vote controls are disabled.
    pub fn is_processing(&self, definition_id: i64) -> bool {
        self.in_flight.is_active(definition_id)
    }

    /// Cast a vote. Refused without a session (the caller redirects to
    /// login; nothing is recorded). On success, local vote state is
    /// reconciled to what the collaborator recorded and the definition's
    /// aggregates are re-read; on failure, prior vote state and score are
    /// left unchanged and no retry is attempted.
    pub async fn cast(
        &mut self,
        session: &mut SessionContext,
        definition_id: i64,
        value: VoteValue,
    ) -> Result<VoteReceipt> {
        session.require()?;
        self.in_flight.begin(definition_id)?;

        let previous = self.my_vote(definition_id);
        let result = session.intercept(self.gateway.cast_vote(definition_id, value).await);
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                self.in_flight.finish(definition_id);
                return Err(err);
            }
        };

        // The service is authoritative; the local toggle prediction only
        // flags divergence.
        let recorded = outcome.vote.as_ref().map(|v| v.value);
        if recorded != toggle(previous, value) {
            warn!(
                definition_id,
                "Recorded vote differs from the local toggle expectation"
            );
        }
        match recorded {
            Some(vote) => {
                self.my_votes.insert(definition_id, vote);
            }
            None => {
                self.my_votes.remove(&definition_id);
            }
        }

        // The vote landed; now refresh the aggregate counts from the
        // collaborator. If the re-read fails, the POST response's score is
        // the freshest value available.
        let score = match session.intercept(self.gateway.definition(definition_id).await) {
            Ok(record) => record.score,
            Err(err) => {
                warn!(definition_id, error = %err, "Score refresh failed after vote");
                outcome.score
            }
        };
        self.scores.insert(definition_id, score);
        self.in_flight.finish(definition_id);

        debug!(
            definition_id,
            vote = ?recorded.map(VoteValue::as_int),
            score,
            "Vote reconciled"
        );
        Ok(VoteReceipt {
            my_vote: recorded,
            score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_records_a_first_vote() {
        assert_eq!(toggle(None, VoteValue::Up), Some(VoteValue::Up));
        assert_eq!(toggle(None, VoteValue::Down), Some(VoteValue::Down));
    }

    #[test]
    fn toggle_removes_a_repeated_vote() {
        assert_eq!(toggle(Some(VoteValue::Up), VoteValue::Up), None);
        assert_eq!(toggle(Some(VoteValue::Down), VoteValue::Down), None);
    }

    #[test]
    fn toggle_switches_direction_as_a_single_vote() {
        assert_eq!(
            toggle(Some(VoteValue::Up), VoteValue::Down),
            Some(VoteValue::Down)
        );
        assert_eq!(
            toggle(Some(VoteValue::Down), VoteValue::Up),
            Some(VoteValue::Up)
        );
    }

    #[test]
    fn toggling_twice_returns_to_absent() {
        let after_first = toggle(None, VoteValue::Up);
        let after_second = toggle(after_first, VoteValue::Up);
        assert_eq!(after_second, None);
    }
}
