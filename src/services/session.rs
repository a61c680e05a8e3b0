//! Session state holder — owns `{user, loading}` for one application load.
//!
//! DESIGN
//! ======
//! A holder starts at `{user: None, loading: true}` and moves to a terminal
//! state exactly once. The state lives in a `tokio::sync::watch` channel so
//! the route guard can wait for `loading == false` instead of polling.
//!
//! Resolution runs once per holder. A second `resolve` call waits for the
//! first to settle and returns its result. There is no timeout: a store call
//! that never returns leaves the holder loading.
//!
//! Cache upkeep after resolution:
//! - rejected token: evicted, so the next load does not retry it;
//! - store failure or missing user: left alone;
//! - success: kept, so the next load re-validates it.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::auth::{AuthOutcome, Authenticator};
use super::locator::{PageLocation, TokenCache, locate_token, redact};
use super::store::User;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user: Option<User>,
    pub loading: bool,
}

impl Session {
    #[must_use]
    pub fn initial() -> Self {
        Self { user: None, loading: true }
    }

    #[must_use]
    pub fn settled(user: Option<User>) -> Self {
        Self { user, loading: false }
    }
}

pub struct SessionHolder {
    state: watch::Sender<Session>,
    started: AtomicBool,
}

impl SessionHolder {
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(Session::initial());
        Self { state, started: AtomicBool::new(false) }
    }

    /// Current state, possibly still loading.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Wait until the holder leaves the loading state.
    pub async fn settled(&self) -> Session {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|s| !s.loading).await {
            Ok(session) => session.clone(),
            Err(_) => self.snapshot(),
        }
    }

    /// Locate, validate and load. Runs the sequence at most once per holder.
    pub async fn resolve<C: TokenCache + ?Sized>(
        &self,
        auth: &Authenticator,
        location: &PageLocation,
        cache: &mut C,
    ) -> Session {
        if self.started.swap(true, Ordering::AcqRel) {
            return self.settled().await;
        }

        let located = locate_token(location, cache);
        let outcome = auth
            .authenticate(located.as_ref().map(|t| t.value.as_str()))
            .await;

        let source = located.as_ref().map_or("none", |t| t.source.as_str());
        let token = located.as_ref().map(|t| redact(&t.value)).unwrap_or_default();
        debug!(outcome = outcome.label(), source, "session resolved");
        match &outcome {
            AuthOutcome::Authenticated(user) => info!(user_id = %user.id, source, "session authenticated"),
            AuthOutcome::NoToken => info!("no access token for this load"),
            AuthOutcome::InvalidToken => {
                warn!(source, token = %token, "access token invalid, expired or used");
                cache.clear();
            }
            AuthOutcome::MissingUser(user_id) => error!(%user_id, source, "access token references a missing user"),
            AuthOutcome::StoreFailure(e) => error!(error = %e, source, "session resolution failed"),
        }

        let session = Session::settled(outcome.into_user());
        self.state.send_replace(session.clone());
        session
    }

    /// Drop the user and forget the cached token.
    pub fn sign_out<C: TokenCache + ?Sized>(&self, cache: &mut C) {
        self.started.store(true, Ordering::Release);
        cache.clear();
        self.state.send_replace(Session::settled(None));
    }
}

impl Default for SessionHolder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
