//! Client-side moderation and voting workflow for the WhatIsDev glossary.
//!
//! Definitions are submitted pending, approved by an administrator, and
//! removed by rejection or author self-deletion; votes toggle per
//! user/definition pair. This crate models that workflow on the client:
//! the lifecycle state machine, the vote reconciliation rules, the
//! visibility partitions, an explicit session context, and the
//! one-mutation-per-item in-flight discipline. All persistence, vote
//! tallying, and authorization live on the remote service, reached through
//! the [`DefinitionGateway`] seam (implemented by
//! `glossary_client::GlossaryClient`).
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use glossary_workflow::{ModerationQueue, SessionContext};
//!
//! let gateway = Arc::new(client);
//! let mut session = SessionContext::signed_in(admin_session);
//! let mut queue = ModerationQueue::new(gateway);
//!
//! queue.refresh(&mut session).await?;
//! if let Some(first) = queue.items().first().map(|d| d.id) {
//!     queue.approve(&mut session, first).await?;
//! }
//! ```

pub mod contributions;
pub mod error;
pub mod gateway;
pub mod inflight;
pub mod lifecycle;
pub mod moderation;
pub mod session;
pub mod visibility;
pub mod votes;

pub use contributions::{Contributions, DefinitionDraft};
pub use error::{Result, WorkflowError};
pub use gateway::DefinitionGateway;
pub use inflight::InFlight;
pub use lifecycle::{DefinitionStatus, InvalidTransition, ModerationAction};
pub use moderation::ModerationQueue;
pub use session::{Session, SessionContext};
pub use visibility::{
    filtered, moderation_view, partition_counts, public_view, PartitionCounts, StatusFilter,
};
pub use votes::{toggle, VotePanel, VoteReceipt};
