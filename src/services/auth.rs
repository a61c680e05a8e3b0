//! Authenticator — turns an optional token into a classified outcome.
//!
//! ARCHITECTURE
//! ============
//! One [`AuthStrategy`] is picked at startup from `AUTH_MODE` and never
//! changes for the life of the process:
//! - `Database`: validate against `access_tokens`, then load from `users`.
//! - `Fixed`: development stub that always yields the configured user.
//!
//! The session holder only sees [`AuthOutcome`]; which strategy produced it
//! is invisible to the rest of the app.

use std::sync::Arc;

use uuid::Uuid;

use super::clock::Clock;
use super::loader::load_session_user;
use super::store::{CredentialStore, StoreError, User};
use super::validator::{Validation, validate_token};
use crate::config::TokenPolicy;

pub enum AuthStrategy {
    Database(Arc<dyn CredentialStore>),
    Fixed(User),
}

/// How a resolution ended. Only `Authenticated` produces a user.
#[derive(Debug)]
pub enum AuthOutcome {
    Authenticated(User),
    /// No token in the URL or the cache.
    NoToken,
    /// Token present but not found, expired, or used.
    InvalidToken,
    /// Token valid but its user row is gone.
    MissingUser(Uuid),
    /// The store round trip failed.
    StoreFailure(StoreError),
}

impl AuthOutcome {
    #[must_use]
    pub fn into_user(self) -> Option<User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Authenticated(_) => "authenticated",
            Self::NoToken => "no_token",
            Self::InvalidToken => "invalid_token",
            Self::MissingUser(_) => "missing_user",
            Self::StoreFailure(_) => "store_failure",
        }
    }
}

pub struct Authenticator {
    strategy: AuthStrategy,
    policy: TokenPolicy,
    clock: Arc<dyn Clock>,
}

impl Authenticator {
    #[must_use]
    pub fn new(strategy: AuthStrategy, policy: TokenPolicy, clock: Arc<dyn Clock>) -> Self {
        Self { strategy, policy, clock }
    }

    #[must_use]
    pub fn strategy_name(&self) -> &'static str {
        match self.strategy {
            AuthStrategy::Database(_) => "database",
            AuthStrategy::Fixed(_) => "fixed",
        }
    }

    /// Validate `token` and load its user. Runs the two lookups in sequence.
    pub async fn authenticate(&self, token: Option<&str>) -> AuthOutcome {
        let store = match &self.strategy {
            AuthStrategy::Fixed(user) => return AuthOutcome::Authenticated(user.clone()),
            AuthStrategy::Database(store) => store.as_ref(),
        };

        let Some(token) = token else {
            return AuthOutcome::NoToken;
        };

        let user_id = match validate_token(store, self.clock.as_ref(), self.policy, token).await {
            Ok(Validation::Valid { user_id }) => user_id,
            Ok(Validation::Rejected) => return AuthOutcome::InvalidToken,
            Err(e) => return AuthOutcome::StoreFailure(e),
        };

        match load_session_user(store, user_id).await {
            Ok(Some(user)) => AuthOutcome::Authenticated(user),
            Ok(None) => AuthOutcome::MissingUser(user_id),
            Err(e) => AuthOutcome::StoreFailure(e),
        }
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
