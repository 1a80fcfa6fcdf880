//! The author side: drafting, submitting, and managing own definitions.
//!
//! Drafts are validated locally so an empty explanation never reaches the
//! network. The personal view holds the author's full set of definitions
//! and partitions it by status; deletion follows the same optimistic
//! discipline as the moderation queue.

use std::sync::Arc;

use glossary_client::{Definition, NewDefinition, ValidationErrors};
use tracing::{debug, info};

use crate::error::{Result, WorkflowError};
use crate::gateway::DefinitionGateway;
use crate::inflight::InFlight;
use crate::lifecycle::{DefinitionStatus, ModerationAction};
use crate::session::SessionContext;
use crate::visibility::{filtered, partition_counts, PartitionCounts, StatusFilter};

/// An unsubmitted definition.
#[derive(Debug, Clone)]
pub struct DefinitionDraft {
    pub term_id: i64,
    pub title: Option<String>,
    pub explanation: String,
    pub code_example: Option<String>,
    pub demo_url: Option<String>,
}

impl DefinitionDraft {
    pub fn new(term_id: i64, explanation: impl Into<String>) -> Self {
        Self {
            term_id,
            title: None,
            explanation: explanation.into(),
            code_example: None,
            demo_url: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_code_example(mut self, code_example: impl Into<String>) -> Self {
        self.code_example = Some(code_example.into());
        self
    }

    pub fn with_demo_url(mut self, demo_url: impl Into<String>) -> Self {
        self.demo_url = Some(demo_url.into());
        self
    }

    /// Field-level checks applied before any network mutation.
    pub fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.term_id <= 0 {
            errors
                .errors
                .entry("term_id".to_string())
                .or_default()
                .push("A term must be selected.".to_string());
        }
        if self.explanation.trim().is_empty() {
            errors
                .errors
                .entry("explanation".to_string())
                .or_default()
                .push("The explanation field is required.".to_string());
        }
        if let Some(url) = &self.demo_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                errors
                    .errors
                    .entry("demo_url".to_string())
                    .or_default()
                    .push("The demo URL must start with http:// or https://.".to_string());
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            errors.message = "The given data was invalid.".to_string();
            Err(errors)
        }
    }

    /// Wire form of the draft. Blank optional fields are dropped rather
    /// than sent as empty strings.
    fn into_request(self) -> NewDefinition {
        NewDefinition {
            term_id: self.term_id,
            title: self.title.filter(|t| !t.trim().is_empty()),
            explanation: self.explanation,
            code_example: self.code_example.filter(|c| !c.trim().is_empty()),
            demo_url: self.demo_url.filter(|u| !u.trim().is_empty()),
        }
    }
}

/// The author's personal definitions view: full set, filter tabs, counts,
/// submission and self-deletion.
pub struct Contributions {
    gateway: Arc<dyn DefinitionGateway>,
    items: Vec<Definition>,
    filter: StatusFilter,
    in_flight: InFlight,
}

impl Contributions {
    pub fn new(gateway: Arc<dyn DefinitionGateway>) -> Self {
        Self {
            gateway,
            items: Vec::new(),
            filter: StatusFilter::All,
            in_flight: InFlight::new(),
        }
    }

    /// Reload the caller's own definitions, all statuses.
    pub async fn refresh(&mut self, session: &mut SessionContext) -> Result<()> {
        session.require()?;
        self.items = session.intercept(self.gateway.my_definitions().await)?;
        debug!(count = self.items.len(), "Own definitions refreshed");
        Ok(())
    }

    pub fn items(&self) -> &[Definition] {
        &self.items
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    /// Tab counts, computed over the full local set.
    pub fn counts(&self) -> PartitionCounts {
        partition_counts(&self.items)
    }

    /// The definitions the active tab shows.
    pub fn visible(&self) -> Vec<&Definition> {
        filtered(&self.items, self.filter)
    }

    pub fn is_processing(&self, id: i64) -> bool {
        self.in_flight.is_active(id)
    }

    /// Validate and submit a draft. The created record joins the local set
    /// in pending state with score 0 and no views.
    pub async fn submit(
        &mut self,
        session: &mut SessionContext,
        draft: DefinitionDraft,
    ) -> Result<Definition> {
        session.require()?;
        draft.validate().map_err(WorkflowError::Invalid)?;

        let request = draft.into_request();
        let created = session.intercept(self.gateway.submit_definition(&request).await)?;
        info!(
            definition_id = created.id,
            term_id = created.term_id,
            "Definition submitted for review"
        );
        self.items.push(created.clone());
        Ok(created)
    }

    /// Delete one of the caller's own definitions. Ownership is enforced by
    /// the collaborator; a 403 comes back untouched. On success, and on a
    /// 404 for an already-gone record, the item leaves the local set.
    pub async fn delete(&mut self, session: &mut SessionContext, id: i64) -> Result<()> {
        session.require()?;
        if let Some(item) = self.items.iter().find(|d| d.id == id) {
            DefinitionStatus::of(item).apply(ModerationAction::Delete)?;
        }
        self.in_flight.begin(id)?;

        let result = session.intercept(self.gateway.delete_definition(id).await);
        self.in_flight.finish(id);

        match result {
            Ok(()) => {
                self.items.retain(|d| d.id != id);
                info!(definition_id = id, "Definition deleted");
                Ok(())
            }
            Err(err) => {
                if err.is_not_found() {
                    self.items.retain(|d| d.id != id);
                }
                Err(err)
            }
        }
    }
}
