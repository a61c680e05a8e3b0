//! Page guard — protects the dashboard pages.
//!
//! Each guarded page load gets its own `SessionHolder`. The middleware waits
//! for it to settle before choosing between the page and a redirect, so no
//! redirect is ever issued mid-resolution.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use tracing::error;

use crate::services::guard::{GuardDecision, decide};
use crate::services::locator::{CookieTokenCache, PageLocation};
use crate::services::session::SessionHolder;
use crate::state::AppState;

const LOADING_PAGE: &str = "<!doctype html><html><body><p>Carregando...</p></body></html>";

/// Middleware for guarded pages.
pub async fn require_session(State(state): State<AppState>, jar: CookieJar, request: Request, next: Next) -> Response {
    let mut cache = CookieTokenCache::new(jar, state.cookie_secure);
    let location = PageLocation::from_uri(request.uri());

    let holder = SessionHolder::new();
    holder.resolve(&state.auth, &location, &mut cache).await;
    let session = holder.settled().await;

    let response = match decide(&session) {
        GuardDecision::Render(_) => next.run(request).await,
        GuardDecision::Redirect(to) => Redirect::temporary(to).into_response(),
        GuardDecision::Pending => Html(LOADING_PAGE).into_response(),
    };
    (cache.into_jar(), response).into_response()
}

/// Single-page app shell served for every guarded path.
pub async fn spa_shell(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    let index = state.frontend_dir.join("index.html");
    match tokio::fs::read_to_string(&index).await {
        Ok(body) => Ok(Html(body)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!(error = %e, path = %index.display(), "failed to read app shell");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
