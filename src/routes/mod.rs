//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! JSON API routes, the guarded dashboard pages and the static frontend live
//! under a single Axum router. Pages under `/dashboard` pass through the
//! session middleware; everything else is served from `FRONTEND_DIR`.

pub mod auth;
pub mod dashboard;
pub mod guard;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::services::guard::UNAUTHENTICATED_ENTRY;
use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let pages = Router::new()
        .route("/dashboard", get(guard::spa_shell))
        .route("/dashboard/{*path}", get(guard::spa_shell))
        .route_layer(middleware::from_fn_with_state(state.clone(), guard::require_session));

    let frontend = ServeDir::new(&state.frontend_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/healthz", get(healthz))
        .route(UNAUTHENTICATED_ENTRY, get(auth::entry))
        .route("/api/session", post(auth::resolve_session))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/dashboard", get(dashboard::home))
        .route("/api/finances", get(dashboard::finances_page))
        .route("/api/health", get(dashboard::health_page))
        .route("/api/academic", get(dashboard::academic_page))
        .route("/api/academic/{id}", delete(dashboard::delete_document))
        .route("/api/schedule", get(dashboard::schedule_page))
        .route("/api/schedule/{id}", delete(dashboard::delete_event))
        .merge(pages)
        .fallback_service(frontend)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
