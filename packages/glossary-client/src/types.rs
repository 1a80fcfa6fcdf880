use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// A glossary category (e.g. "Backend", "DevOps").
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// A glossary headword as listed on the terms index.
#[derive(Debug, Clone, Deserialize)]
pub struct TermSummary {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description_short: Option<String>,
    pub category: Option<Category>,
    pub creator: Option<User>,
    pub created_at: Option<DateTime<Utc>>,
}

/// A term with its publicly visible definitions.
#[derive(Debug, Clone, Deserialize)]
pub struct TermDetail {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description_short: Option<String>,
    pub category: Option<Category>,
    pub creator: Option<User>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub approved_definitions: Vec<Definition>,
}

/// A community-submitted explanation of a term.
#[derive(Debug, Clone, Deserialize)]
pub struct Definition {
    pub id: i64,
    pub term_id: i64,
    pub user_id: i64,
    pub title: Option<String>,
    pub explanation: String,
    pub code_example: Option<String>,
    pub demo_url: Option<String>,
    pub is_approved: bool,
    #[serde(default)]
    pub views_count: i64,
    #[serde(default)]
    pub score: i64,
    pub created_at: Option<DateTime<Utc>>,
    /// Owning term summary, present on moderation and profile listings.
    pub term: Option<TermSummary>,
    /// Author summary, present on moderation listings.
    pub user: Option<User>,
    /// Raw vote collection, present on moderation listings.
    #[serde(default)]
    pub votes: Vec<Vote>,
}

impl Definition {
    /// Display title: the definition's own title, falling back to the
    /// owning term's title when absent.
    pub fn display_title(&self) -> &str {
        match (&self.title, &self.term) {
            (Some(title), _) => title,
            (None, Some(term)) => &term.title,
            (None, None) => "",
        }
    }

    pub fn up_votes(&self) -> usize {
        self.votes.iter().filter(|v| v.value == VoteValue::Up).count()
    }

    pub fn down_votes(&self) -> usize {
        self.votes.iter().filter(|v| v.value == VoteValue::Down).count()
    }
}

/// One user's +1/-1 judgment on one definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Vote {
    pub user_id: i64,
    pub definition_id: i64,
    pub value: VoteValue,
}

/// Direction of a vote. Serialized as the integer `1` or `-1` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum VoteValue {
    Up,
    Down,
}

impl VoteValue {
    pub fn as_int(self) -> i8 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }

    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

impl From<VoteValue> for i8 {
    fn from(value: VoteValue) -> Self {
        value.as_int()
    }
}

impl TryFrom<i8> for VoteValue {
    type Error = String;

    fn try_from(value: i8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Up),
            -1 => Ok(Self::Down),
            other => Err(format!("vote value must be 1 or -1, got {other}")),
        }
    }
}

/// Response of a vote POST: the caller's vote after the toggle was applied
/// (absent when the vote was removed) and the definition's updated score.
#[derive(Debug, Clone, Deserialize)]
pub struct VoteOutcome {
    pub vote: Option<Vote>,
    #[serde(default)]
    pub score: i64,
}

/// Response of `GET definitions/{id}/my-vote`.
#[derive(Debug, Clone, Deserialize)]
pub struct MyVoteResponse {
    pub vote: Option<Vote>,
}

/// Body of `POST definitions/{id}/vote`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NewVote {
    pub value: VoteValue,
}

/// A token plus the account it belongs to, returned by login and register.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

/// Body of `POST /login`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Body of `POST /register`.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Body of `POST /definitions`.
#[derive(Debug, Clone, Serialize)]
pub struct NewDefinition {
    pub term_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_example: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
}

/// Body of `PUT /definitions/{id}`. Only the provided fields change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DefinitionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_example: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
}

/// Wrapper for `{ "data": ... }` resource envelopes.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// One page of a paginated collection.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default = "default_page")]
    pub current_page: u32,
    #[serde(default = "default_page")]
    pub last_page: u32,
    #[serde(default)]
    pub total: u64,
}

fn default_page() -> u32 {
    1
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        self.current_page < self.last_page
    }
}
