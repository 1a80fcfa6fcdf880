//! Pure REST API client for the WhatIsDev glossary service.
//!
//! A minimal client with no domain logic: every call is a single round trip
//! against the glossary API, with non-2xx responses mapped onto a typed
//! error taxonomy. Moderation and voting behavior live in the
//! `glossary-workflow` crate; persistence, authorization, and vote tallying
//! are owned by the remote service.
//!
//! # Example
//!
//! ```rust,ignore
//! use glossary_client::{GlossaryClient, VoteValue};
//!
//! let mut client = GlossaryClient::new("http://127.0.0.1:8000/api");
//!
//! let session = client.login("ada@example.com", "hunter2").await?;
//! client.set_token(session.token);
//!
//! let pending = client.pending_definitions().await?;
//! client.approve_definition(pending[0].id).await?;
//!
//! client.cast_vote(17, VoteValue::Up).await?;
//! ```

pub mod error;
pub mod types;

pub use error::{GlossaryError, Result, ValidationErrors};
pub use types::{
    AuthSession, Category, Credentials, Definition, DefinitionPatch, Envelope, MyVoteResponse,
    NewDefinition, NewUser, NewVote, Page, TermDetail, TermSummary, User, Vote, VoteOutcome,
    VoteValue,
};

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// Glossary API client. Carries an optional bearer token; endpoints that
/// need a session return [`GlossaryError::AuthRequired`] when the service
/// rejects the credential.
#[derive(Debug, Clone)]
pub struct GlossaryClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GlossaryClient {
    /// Create a client against the given API base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            token: None,
        }
    }

    /// Create from environment: `GLOSSARY_API_URL` (default
    /// `http://127.0.0.1:8000/api`) and optional `GLOSSARY_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("GLOSSARY_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let mut client = Self::new(base_url);
        if let Ok(token) = std::env::var("GLOSSARY_TOKEN") {
            if !token.is_empty() {
                client.set_token(token);
            }
        }
        Ok(client)
    }

    /// Attach a bearer token to all subsequent requests.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Drop the bearer token (logout, or a rejected session).
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Register a new account. Returns a fresh token and the created user.
    pub async fn register(&self, new_user: &NewUser) -> Result<AuthSession> {
        self.request_json(Method::POST, "/register", Some(new_user))
            .await
    }

    /// Exchange credentials for a token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let session: AuthSession = self
            .request_json(Method::POST, "/login", Some(&credentials))
            .await?;
        debug!(user_id = session.user.id, "Logged in");
        Ok(session)
    }

    /// Revoke the current token server-side. The local token is kept; the
    /// caller decides when to clear it.
    pub async fn logout(&self) -> Result<()> {
        self.request_empty(Method::POST, "/logout", None::<&()>).await
    }

    /// The account behind the current token.
    pub async fn current_user(&self) -> Result<User> {
        self.request_json(Method::GET, "/user", None::<&()>).await
    }

    // =========================================================================
    // Terms & categories
    // =========================================================================

    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.request_json(Method::GET, "/categories", None::<&()>)
            .await
    }

    /// One page of the terms index, optionally filtered by search text and
    /// category.
    pub async fn terms(
        &self,
        search: Option<&str>,
        category_id: Option<i64>,
        page: u32,
    ) -> Result<Page<TermSummary>> {
        let mut query: Vec<(&str, String)> = vec![("page", page.to_string())];
        if let Some(search) = search {
            query.push(("search", search.to_string()));
        }
        if let Some(category_id) = category_id {
            query.push(("category_id", category_id.to_string()));
        }

        let builder = self
            .builder(Method::GET, "/terms")
            .query(&query);
        let response = self.send(builder).await?;
        Self::decode(response).await
    }

    /// A term with its approved definitions, by slug.
    pub async fn term_by_slug(&self, slug: &str) -> Result<TermDetail> {
        self.request_json(Method::GET, &format!("/terms/{slug}"), None::<&()>)
            .await
    }

    /// Record a view of the given definitions on a term page.
    pub async fn record_views(&self, slug: &str, definition_ids: &[i64]) -> Result<()> {
        #[derive(Serialize)]
        struct Body<'a> {
            definition_ids: &'a [i64],
        }
        self.request_empty(
            Method::POST,
            &format!("/terms/{slug}/view"),
            Some(&Body { definition_ids }),
        )
        .await
    }

    // =========================================================================
    // Definitions
    // =========================================================================

    /// Submit a new definition. The record comes back pending.
    pub async fn create_definition(&self, new_definition: &NewDefinition) -> Result<Definition> {
        let definition: Envelope<Definition> = self
            .request_json(Method::POST, "/definitions", Some(new_definition))
            .await?;
        debug!(
            definition_id = definition.data.id,
            term_id = definition.data.term_id,
            "Definition submitted"
        );
        Ok(definition.data)
    }

    pub async fn definition(&self, id: i64) -> Result<Definition> {
        let definition: Envelope<Definition> = self
            .request_json(Method::GET, &format!("/definitions/{id}"), None::<&()>)
            .await?;
        Ok(definition.data)
    }

    /// Edit an owned definition. Only provided fields change.
    pub async fn update_definition(&self, id: i64, patch: &DefinitionPatch) -> Result<Definition> {
        let definition: Envelope<Definition> = self
            .request_json(Method::PUT, &format!("/definitions/{id}"), Some(patch))
            .await?;
        Ok(definition.data)
    }

    /// Remove a definition: author self-deletion or admin rejection.
    pub async fn delete_definition(&self, id: i64) -> Result<()> {
        self.request_empty(Method::DELETE, &format!("/definitions/{id}"), None::<&()>)
            .await
    }

    /// Transition a pending definition to approved (admin only).
    pub async fn approve_definition(&self, id: i64) -> Result<Definition> {
        let definition: Envelope<Definition> = self
            .request_json(
                Method::PATCH,
                &format!("/definitions/{id}/approve"),
                None::<&()>,
            )
            .await?;
        debug!(definition_id = id, "Definition approved");
        Ok(definition.data)
    }

    /// The caller's own definitions, all statuses.
    pub async fn my_definitions(&self) -> Result<Vec<Definition>> {
        let definitions: Envelope<Vec<Definition>> = self
            .request_json(Method::GET, "/my-definitions", None::<&()>)
            .await?;
        Ok(definitions.data)
    }

    /// Definitions awaiting moderation, with nested term and author
    /// summaries and vote collections (admin only).
    pub async fn pending_definitions(&self) -> Result<Vec<Definition>> {
        let definitions: Envelope<Vec<Definition>> = self
            .request_json(Method::GET, "/pending-definitions", None::<&()>)
            .await?;
        Ok(definitions.data)
    }

    // =========================================================================
    // Votes
    // =========================================================================

    /// Cast a vote. The service applies toggle semantics: a repeated value
    /// removes the vote, an opposite value replaces it. Returns the caller's
    /// resulting vote and the definition's updated score.
    pub async fn cast_vote(&self, definition_id: i64, value: VoteValue) -> Result<VoteOutcome> {
        let outcome: VoteOutcome = self
            .request_json(
                Method::POST,
                &format!("/definitions/{definition_id}/vote"),
                Some(&NewVote { value }),
            )
            .await?;
        debug!(
            definition_id,
            value = value.as_int(),
            score = outcome.score,
            "Vote applied"
        );
        Ok(outcome)
    }

    /// The caller's current vote on a definition, if any.
    pub async fn my_vote(&self, definition_id: i64) -> Result<Option<Vote>> {
        let response: MyVoteResponse = self
            .request_json(
                Method::GET,
                &format!("/definitions/{definition_id}/my-vote"),
                None::<&()>,
            )
            .await?;
        Ok(response.vote)
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .header("Accept", "application/json");
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "Glossary API error");
        Err(GlossaryError::from_response(status.as_u16(), &body))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GlossaryError::Parse(e.to_string()))
    }

    async fn request_json<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut builder = self.builder(method, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = self.send(builder).await?;
        Self::decode(response).await
    }

    async fn request_empty<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self.builder(method, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = self.send(builder).await?;
        // 204s and `{ "message": ... }` acks both land here; drain the body.
        if response.status() != StatusCode::NO_CONTENT {
            let _ = response.text().await;
        }
        Ok(())
    }
}

impl Default for GlossaryClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
