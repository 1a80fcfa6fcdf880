//! Status-based visibility filters.
//!
//! The public term page shows approved definitions only; the moderation
//! queue shows pending only; the author's personal view partitions the full
//! locally held set with counts computed over that set, no further fetch.

use std::str::FromStr;

use glossary_client::Definition;

use crate::lifecycle::DefinitionStatus;

/// Filter tabs of the author's personal view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Approved,
    Pending,
}

impl StatusFilter {
    pub fn matches(self, definition: &Definition) -> bool {
        match self {
            Self::All => true,
            Self::Approved => definition.is_approved,
            Self::Pending => !definition.is_approved,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "approved" => Ok(Self::Approved),
            "pending" => Ok(Self::Pending),
            other => Err(format!(
                "unknown filter '{other}' (expected all, approved, or pending)"
            )),
        }
    }
}

/// Per-tab counts over one locally held set of definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionCounts {
    pub all: usize,
    pub approved: usize,
    pub pending: usize,
}

pub fn partition_counts(definitions: &[Definition]) -> PartitionCounts {
    let approved = definitions.iter().filter(|d| d.is_approved).count();
    PartitionCounts {
        all: definitions.len(),
        approved,
        pending: definitions.len() - approved,
    }
}

/// What the public term page exposes.
pub fn public_view(definitions: &[Definition]) -> Vec<&Definition> {
    definitions
        .iter()
        .filter(|d| DefinitionStatus::of(d).publicly_visible())
        .collect()
}

/// What the moderation view exposes.
pub fn moderation_view(definitions: &[Definition]) -> Vec<&Definition> {
    definitions
        .iter()
        .filter(|d| DefinitionStatus::of(d) == DefinitionStatus::Pending)
        .collect()
}

pub fn filtered(definitions: &[Definition], filter: StatusFilter) -> Vec<&Definition> {
    definitions.iter().filter(|d| filter.matches(d)).collect()
}
