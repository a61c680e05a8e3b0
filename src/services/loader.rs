//! Session loader — fetches the profile a validated token points at.

use tracing::error;
use uuid::Uuid;

use super::store::{CredentialStore, StoreError, User};

/// Load `{id, name, phone}` for a validated user id.
///
/// A missing user means a live token references a deleted or never-created
/// row. That is logged and reported as `None`, not as an error.
///
/// # Errors
///
/// Returns a [`StoreError`] only when the store round trip fails.
pub async fn load_session_user(store: &dyn CredentialStore, user_id: Uuid) -> Result<Option<User>, StoreError> {
    let user = store.find_user(user_id).await?;
    if user.is_none() {
        error!(%user_id, "validated token references a missing user");
    }
    Ok(user)
}
