//! The seam between the workflow and the collaborator API.
//!
//! The workflow only ever talks to [`DefinitionGateway`], so tests can
//! substitute an in-memory collaborator that honors the same contract the
//! real service does (toggle votes, approval transitions, 401/403/404).

use async_trait::async_trait;
use glossary_client::{Definition, GlossaryClient, NewDefinition, Vote, VoteOutcome, VoteValue};

/// The operations the moderation and voting workflow needs from the remote
/// service. Results use the client's error taxonomy; the workflow maps them
/// onto its own.
#[async_trait]
pub trait DefinitionGateway: Send + Sync {
    /// Definitions awaiting moderation (admin only).
    async fn pending_definitions(&self) -> glossary_client::Result<Vec<Definition>>;

    /// The caller's own definitions, all statuses.
    async fn my_definitions(&self) -> glossary_client::Result<Vec<Definition>>;

    /// Submit a new definition; the record comes back pending.
    async fn submit_definition(
        &self,
        new_definition: &NewDefinition,
    ) -> glossary_client::Result<Definition>;

    /// Transition a pending definition to approved (admin only).
    async fn approve_definition(&self, id: i64) -> glossary_client::Result<Definition>;

    /// Remove a definition: admin rejection or author self-deletion.
    /// Ownership is enforced by the collaborator, not re-checked here.
    async fn delete_definition(&self, id: i64) -> glossary_client::Result<()>;

    /// Apply a vote with toggle semantics (server-side).
    async fn cast_vote(
        &self,
        definition_id: i64,
        value: VoteValue,
    ) -> glossary_client::Result<VoteOutcome>;

    /// The caller's current vote on a definition, if any.
    async fn my_vote(&self, definition_id: i64) -> glossary_client::Result<Option<Vote>>;

    /// Re-read a single definition; source of truth for score and views.
    async fn definition(&self, id: i64) -> glossary_client::Result<Definition>;
}

#[async_trait]
impl DefinitionGateway for GlossaryClient {
    async fn pending_definitions(&self) -> glossary_client::Result<Vec<Definition>> {
        GlossaryClient::pending_definitions(self).await
    }

    async fn my_definitions(&self) -> glossary_client::Result<Vec<Definition>> {
        GlossaryClient::my_definitions(self).await
    }

    async fn submit_definition(
        &self,
        new_definition: &NewDefinition,
    ) -> glossary_client::Result<Definition> {
        self.create_definition(new_definition).await
    }

    async fn approve_definition(&self, id: i64) -> glossary_client::Result<Definition> {
        GlossaryClient::approve_definition(self, id).await
    }

    async fn delete_definition(&self, id: i64) -> glossary_client::Result<()> {
        GlossaryClient::delete_definition(self, id).await
    }

    async fn cast_vote(
        &self,
        definition_id: i64,
        value: VoteValue,
    ) -> glossary_client::Result<VoteOutcome> {
        GlossaryClient::cast_vote(self, definition_id, value).await
    }

    async fn my_vote(&self, definition_id: i64) -> glossary_client::Result<Option<Vote>> {
        GlossaryClient::my_vote(self, definition_id).await
    }

    async fn definition(&self, id: i64) -> glossary_client::Result<Definition> {
        GlossaryClient::definition(self, id).await
    }
}
