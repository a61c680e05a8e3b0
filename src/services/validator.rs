//! Credential validator — one point lookup per token.

use uuid::Uuid;

use super::clock::Clock;
use super::store::{CredentialStore, StoreError};
use crate::config::TokenPolicy;

/// Result of checking a token. A rejected token is an expected outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    Valid { user_id: Uuid },
    /// Not found, expired, or already used.
    Rejected,
}

/// Check that `token` exists, is unused and expires strictly after the clock's now.
///
/// Under [`TokenPolicy::SingleUse`] the same lookup also marks the token used.
///
/// # Errors
///
/// Returns a [`StoreError`] only when the store round trip fails.
pub async fn validate_token(
    store: &dyn CredentialStore,
    clock: &dyn Clock,
    policy: TokenPolicy,
    token: &str,
) -> Result<Validation, StoreError> {
    let token = token.trim();
    if token.is_empty() {
        return Ok(Validation::Rejected);
    }

    let now = clock.now();
    let user_id = match policy {
        TokenPolicy::Reusable => store.find_active_token(token, now).await?,
        TokenPolicy::SingleUse => store.consume_token(token, now).await?,
    };

    Ok(user_id.map_or(Validation::Rejected, |user_id| Validation::Valid { user_id }))
}

#[cfg(test)]
#[path = "validator_test.rs"]
mod tests;
