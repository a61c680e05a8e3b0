//! Auth routes — session resolution, current user, sign-out.
//!
//! DESIGN
//! ======
//! The server never sees the URL fragment, so the browser posts its full
//! location to `POST /api/session` once per application load. Every other
//! request authenticates from its own query string plus the
//! `auth_token_temp` cookie.
//!
//! Only `POST /api/session`, `POST /api/auth/logout` and the page middleware
//! write the cookie. [`AuthUser`] reads it: a URL token on an API call is not
//! cached and a rejected cookie is not evicted there.

use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::services::guard::{GuardDecision, decide};
use crate::services::locator::{CookieTokenCache, PageLocation};
use crate::services::session::{Session, SessionHolder};
use crate::services::store::User;
use crate::state::AppState;

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// User resolved from the request's token.
/// Use as a handler parameter to require an authenticated session.
pub struct AuthUser {
    pub user: User,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let mut cache = CookieTokenCache::new(CookieJar::from_headers(&parts.headers), app_state.cookie_secure);
        let location = PageLocation::from_uri(&parts.uri);

        // Extractors cannot set response headers; cache writes are dropped.
        let holder = SessionHolder::new();
        let session = holder.resolve(&app_state.auth, &location, &mut cache).await;
        match decide(&session) {
            GuardDecision::Render(user) => Ok(Self { user }),
            GuardDecision::Pending | GuardDecision::Redirect(_) => Err(StatusCode::UNAUTHORIZED),
        }
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    /// Full page URL as the browser sees it, fragment included.
    pub location: String,
}

/// `POST /api/session` — resolve the session for one application load.
pub async fn resolve_session(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<ResolveRequest>,
) -> (CookieJar, Json<Session>) {
    let mut cache = CookieTokenCache::new(jar, state.cookie_secure);
    let location = PageLocation::parse(&body.location);

    let holder = SessionHolder::new();
    let session = holder.resolve(&state.auth, &location, &mut cache).await;
    (cache.into_jar(), Json(session))
}

/// `GET /api/auth/me` — return the current user.
pub async fn me(auth: AuthUser) -> Json<User> {
    Json(auth.user)
}

/// `POST /api/auth/logout` — forget the cached token.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, StatusCode) {
    let mut cache = CookieTokenCache::new(jar, state.cookie_secure);
    SessionHolder::new().sign_out(&mut cache);
    (cache.into_jar(), StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct EntryNotice {
    pub authenticated: bool,
    pub message: &'static str,
}

/// `GET /auth` — where unauthenticated visitors land.
pub async fn entry() -> Json<EntryNotice> {
    Json(EntryNotice {
        authenticated: false,
        message: "Acesse pelo link enviado no WhatsApp para entrar.",
    })
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
