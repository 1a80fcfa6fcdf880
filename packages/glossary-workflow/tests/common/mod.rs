//! In-memory stand-in for the glossary collaborator API.
//!
//! `FakeGlossary` honors the service contract the workflow depends on:
//! definitions are created pending, approval flips the flag, deletion
//! removes the record, votes toggle per (user, definition) pair, and the
//! score is the signed sum of recorded votes. Auth behaves like the real
//! thing: no caller means 401, non-admin moderation means 403, missing
//! records mean 404.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use glossary_client::{
    Definition, GlossaryError, NewDefinition, User, ValidationErrors, Vote, VoteOutcome, VoteValue,
};
use glossary_workflow::{DefinitionGateway, Session, SessionContext};

#[derive(Clone, Copy)]
struct Caller {
    user_id: i64,
    admin: bool,
}

#[derive(Default)]
struct State {
    definitions: Vec<Definition>,
    votes: Vec<Vote>,
    caller: Option<Caller>,
    fail_next: Option<GlossaryError>,
    calls: Vec<String>,
    next_id: i64,
}

pub struct FakeGlossary {
    state: Mutex<State>,
}

impl FakeGlossary {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(State {
                next_id: 1,
                ..State::default()
            }),
        })
    }

    /// Authenticate the fake's caller, mirroring the bearer token the real
    /// client would attach.
    pub fn sign_in(&self, user_id: i64, admin: bool) {
        self.state.lock().unwrap().caller = Some(Caller { user_id, admin });
    }

    pub fn sign_out(&self) {
        self.state.lock().unwrap().caller = None;
    }

    pub fn seed_definition(&self, definition: Definition) {
        let mut state = self.state.lock().unwrap();
        state.next_id = state.next_id.max(definition.id + 1);
        state.definitions.push(definition);
    }

    /// Record a pre-existing vote, keeping the definition's score in step.
    pub fn seed_vote(&self, user_id: i64, definition_id: i64, value: VoteValue) {
        let mut state = self.state.lock().unwrap();
        state.votes.push(Vote {
            user_id,
            definition_id,
            value,
        });
        refresh_score(&mut state, definition_id);
    }

    /// Fail the next gateway call with this error.
    pub fn fail_next(&self, err: GlossaryError) {
        self.state.lock().unwrap().fail_next = Some(err);
    }

    /// Gateway method names in call order, for asserting that a refused
    /// action never reached the network.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// The stored record, for asserting server-side state.
    pub fn definition_record(&self, id: i64) -> Option<Definition> {
        self.state
            .lock()
            .unwrap()
            .definitions
            .iter()
            .find(|d| d.id == id)
            .cloned()
    }

    /// All recorded votes on one definition.
    pub fn votes_for(&self, definition_id: i64) -> Vec<Vote> {
        self.state
            .lock()
            .unwrap()
            .votes
            .iter()
            .filter(|v| v.definition_id == definition_id)
            .cloned()
            .collect()
    }
}

fn score_of(state: &State, definition_id: i64) -> i64 {
    state
        .votes
        .iter()
        .filter(|v| v.definition_id == definition_id)
        .map(|v| i64::from(v.value.as_int()))
        .sum()
}

fn refresh_score(state: &mut State, definition_id: i64) {
    let score = score_of(state, definition_id);
    if let Some(def) = state.definitions.iter_mut().find(|d| d.id == definition_id) {
        def.score = score;
    }
}

fn require_caller(state: &State) -> Result<Caller, GlossaryError> {
    state.caller.ok_or(GlossaryError::AuthRequired)
}

fn take_failure(state: &mut State) -> Result<(), GlossaryError> {
    match state.fail_next.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[async_trait]
impl DefinitionGateway for FakeGlossary {
    async fn pending_definitions(&self) -> glossary_client::Result<Vec<Definition>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("pending_definitions".into());
        take_failure(&mut state)?;
        let caller = require_caller(&state)?;
        if !caller.admin {
            return Err(GlossaryError::PermissionDenied(
                "This action is unauthorized.".into(),
            ));
        }
        Ok(state
            .definitions
            .iter()
            .filter(|d| !d.is_approved)
            .cloned()
            .collect())
    }

    async fn my_definitions(&self) -> glossary_client::Result<Vec<Definition>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("my_definitions".into());
        take_failure(&mut state)?;
        let caller = require_caller(&state)?;
        Ok(state
            .definitions
            .iter()
            .filter(|d| d.user_id == caller.user_id)
            .cloned()
            .collect())
    }

    async fn submit_definition(
        &self,
        new_definition: &NewDefinition,
    ) -> glossary_client::Result<Definition> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("submit_definition".into());
        take_failure(&mut state)?;
        let caller = require_caller(&state)?;
        if new_definition.explanation.trim().is_empty() {
            return Err(GlossaryError::Validation(ValidationErrors::field(
                "explanation",
                "The explanation field is required.",
            )));
        }
        let id = state.next_id;
        state.next_id += 1;
        let mut created = definition_with(
            id,
            new_definition.term_id,
            caller.user_id,
            &new_definition.explanation,
            false,
        );
        created.title = new_definition.title.clone();
        created.code_example = new_definition.code_example.clone();
        created.demo_url = new_definition.demo_url.clone();
        state.definitions.push(created.clone());
        Ok(created)
    }

    async fn approve_definition(&self, id: i64) -> glossary_client::Result<Definition> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("approve_definition".into());
        take_failure(&mut state)?;
        let caller = require_caller(&state)?;
        if !caller.admin {
            return Err(GlossaryError::PermissionDenied(
                "This action is unauthorized.".into(),
            ));
        }
        let def = state
            .definitions
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| GlossaryError::NotFound(format!("definition {id}")))?;
        def.is_approved = true;
        Ok(def.clone())
    }

    async fn delete_definition(&self, id: i64) -> glossary_client::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("delete_definition".into());
        take_failure(&mut state)?;
        let caller = require_caller(&state)?;
        let position = state
            .definitions
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| GlossaryError::NotFound(format!("definition {id}")))?;
        let owner = state.definitions[position].user_id;
        if !caller.admin && owner != caller.user_id {
            return Err(GlossaryError::PermissionDenied(
                "This action is unauthorized.".into(),
            ));
        }
        state.definitions.remove(position);
        state.votes.retain(|v| v.definition_id != id);
        Ok(())
    }

    async fn cast_vote(
        &self,
        definition_id: i64,
        value: VoteValue,
    ) -> glossary_client::Result<VoteOutcome> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("cast_vote".into());
        take_failure(&mut state)?;
        let caller = require_caller(&state)?;
        if !state.definitions.iter().any(|d| d.id == definition_id) {
            return Err(GlossaryError::NotFound(format!(
                "definition {definition_id}"
            )));
        }

        let existing = state
            .votes
            .iter()
            .position(|v| v.user_id == caller.user_id && v.definition_id == definition_id);
        let vote = match existing {
            // Same value again: toggle off.
            Some(i) if state.votes[i].value == value => {
                state.votes.remove(i);
                None
            }
            // Opposite value: replace, never duplicate.
            Some(i) => {
                state.votes[i].value = value;
                Some(state.votes[i].clone())
            }
            None => {
                let vote = Vote {
                    user_id: caller.user_id,
                    definition_id,
                    value,
                };
                state.votes.push(vote.clone());
                Some(vote)
            }
        };
        refresh_score(&mut state, definition_id);
        Ok(VoteOutcome {
            vote,
            score: score_of(&state, definition_id),
        })
    }

    async fn my_vote(&self, definition_id: i64) -> glossary_client::Result<Option<Vote>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("my_vote".into());
        take_failure(&mut state)?;
        let caller = require_caller(&state)?;
        if !state.definitions.iter().any(|d| d.id == definition_id) {
            return Err(GlossaryError::NotFound(format!(
                "definition {definition_id}"
            )));
        }
        Ok(state
            .votes
            .iter()
            .find(|v| v.user_id == caller.user_id && v.definition_id == definition_id)
            .cloned())
    }

    async fn definition(&self, id: i64) -> glossary_client::Result<Definition> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("definition".into());
        take_failure(&mut state)?;
        state
            .definitions
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| GlossaryError::NotFound(format!("definition {id}")))
    }
}

// =============================================================================
// Builders
// =============================================================================

/// A bare definition record as the API would return it.
pub fn definition_with(
    id: i64,
    term_id: i64,
    user_id: i64,
    explanation: &str,
    is_approved: bool,
) -> Definition {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "term_id": term_id,
        "user_id": user_id,
        "explanation": explanation,
        "is_approved": is_approved,
    }))
    .expect("definition fixture should deserialize")
}

fn user_with(id: i64, admin: bool) -> User {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": format!("user-{id}"),
        "is_admin": admin,
    }))
    .expect("user fixture should deserialize")
}

/// A signed-in session context, paired with `FakeGlossary::sign_in`.
pub fn session_for(user_id: i64, admin: bool) -> SessionContext {
    SessionContext::signed_in(Session {
        token: format!("token-{user_id}"),
        user: user_with(user_id, admin),
    })
}

/// A 503 standing in for a transient network failure; the taxonomy treats
/// both as retry-by-hand.
pub fn transient_failure() -> GlossaryError {
    GlossaryError::Api {
        status: 503,
        message: "service unavailable".into(),
    }
}
