//! Credential gating for the token-gated map engine.
//!
//! The credential is process-wide state: read-shared by every surface, but
//! only ever mutated through [`TokenGate::commit`] and [`TokenGate::clear`].
//! A candidate moves `Unset → Validating → {Valid, Invalid}`; rejection
//! clears anything persisted and decays straight back to `Unset`.

pub mod store;
pub mod validator;

pub use store::{CredentialStore, FileStore, MemoryStore};
pub use validator::{RemoteTokenValidator, StaticValidator, TokenValidator};

use std::sync::{Arc, Mutex};

use crate::{MapError, Result};

/// Opaque map-engine credential. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccessToken(…)")
    }
}

/// Where a candidate credential stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Unset,
    Validating,
    Valid,
    Invalid,
}

impl std::fmt::Display for TokenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenState::Unset => write!(f, "unset"),
            TokenState::Validating => write!(f, "validating"),
            TokenState::Valid => write!(f, "valid"),
            TokenState::Invalid => write!(f, "invalid"),
        }
    }
}

struct GateState {
    state: TokenState,
    validated: Option<AccessToken>,
}

/// Validates and persists the map-engine credential, gating surface
/// initialization until satisfied.
pub struct TokenGate {
    store: Arc<dyn CredentialStore>,
    validator: Arc<dyn TokenValidator>,
    state: Mutex<GateState>,
}

impl TokenGate {
    pub fn new(store: Arc<dyn CredentialStore>, validator: Arc<dyn TokenValidator>) -> Self {
        Self {
            store,
            validator,
            state: Mutex::new(GateState {
                state: TokenState::Unset,
                validated: None,
            }),
        }
    }

    /// Presence check against the local store; no network involved.
    pub fn has_credential(&self) -> bool {
        self.store.load().is_some()
    }

    /// The persisted credential, for engine construction and geocoding.
    pub fn access_token(&self) -> Option<AccessToken> {
        self.store.load().map(AccessToken::new)
    }

    pub fn state(&self) -> TokenState {
        self.state.lock().unwrap().state
    }

    /// Probes the backend with `candidate`. On acceptance the gate moves to
    /// `Valid` and the candidate becomes eligible for [`TokenGate::commit`].
    /// On rejection (including any network failure) the persisted credential
    /// is cleared and the gate decays to `Unset`. Never errors.
    pub async fn validate(&self, candidate: &str) -> bool {
        self.transition(TokenState::Validating, None);

        let accepted = self.validator.probe(candidate).await;
        if accepted {
            self.transition(TokenState::Valid, Some(AccessToken::new(candidate)));
        } else {
            log::warn!("invalid map token, clearing stored credential");
            self.transition(TokenState::Invalid, None);
            self.store.clear();
            self.transition(TokenState::Unset, None);
        }
        accepted
    }

    /// Persists a candidate that has passed [`TokenGate::validate`].
    /// Committing anything else is a contract violation and is refused.
    pub fn commit(&self, candidate: &str) -> Result<()> {
        let state = self.state.lock().unwrap();
        match (&state.state, &state.validated) {
            (TokenState::Valid, Some(validated)) if validated.as_str() == candidate => {
                self.store.save(candidate);
                log::info!("map token committed");
                Ok(())
            }
            _ => {
                log::error!("refusing to persist an unvalidated credential");
                Err(MapError::TokenInvalid)
            }
        }
    }

    /// `validate` then `commit` in one step; the shape most screens want.
    pub async fn validate_and_commit(&self, candidate: &str) -> bool {
        if self.validate(candidate).await {
            self.commit(candidate).is_ok()
        } else {
            false
        }
    }

    /// Re-validates a credential found persisted at startup, clearing it if
    /// the backend no longer accepts it. Returns whether a usable credential
    /// remains.
    pub async fn restore(&self) -> bool {
        let Some(persisted) = self.store.load() else {
            return false;
        };
        self.validate(&persisted).await
    }

    /// Drops any persisted credential and resets the gate.
    pub fn clear(&self) {
        self.store.clear();
        self.transition(TokenState::Unset, None);
    }

    fn transition(&self, next: TokenState, validated: Option<AccessToken>) {
        let mut state = self.state.lock().unwrap();
        log::debug!("token gate: {} -> {}", state.state, next);
        state.state = next;
        state.validated = validated;
    }
}
