//! Dashboard routes — one JSON endpoint per page, scoped to the session user.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::{DateTime, FixedOffset, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use super::auth::AuthUser;
use crate::services::academic::{self, AcademicSummary};
use crate::services::dashboard::{self, DashboardContext, DashboardSummary};
use crate::services::finances::{self, FinanceSummary, Transaction};
use crate::services::health::{self, HealthSummary};
use crate::services::period::{DateRange, RangeError, RangeQuery};
use crate::services::schedule::{self, ScheduleSummary};
use crate::state::AppState;

fn range_error_to_status(err: RangeError) -> StatusCode {
    match err {
        RangeError::Inverted { .. } => StatusCode::BAD_REQUEST,
    }
}

fn db_error_to_status(err: sqlx::Error) -> StatusCode {
    error!(error = %err, "dashboard query failed");
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Current time on the configured wall clock.
fn local_now(state: &AppState) -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&state.utc_offset)
}

fn local_today(state: &AppState) -> NaiveDate {
    local_now(state).date_naive()
}

// =============================================================================
// HOME
// =============================================================================

/// `GET /api/dashboard` — summary across all domains.
pub async fn home(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<DashboardSummary>, StatusCode> {
    let local = local_now(&state);
    let range = query.resolve(local.date_naive()).map_err(range_error_to_status)?;
    let rows = dashboard::load_rows(&state.pool, &auth.user, range, &state.utc_offset)
        .await
        .map_err(db_error_to_status)?;

    let ctx = DashboardContext {
        user: &auth.user,
        range,
        now: local.with_timezone(&Utc),
        today: local.date_naive(),
        local_hour: local.hour(),
    };
    Ok(Json(dashboard::build(&ctx, rows)))
}

// =============================================================================
// FINANCES
// =============================================================================

#[derive(Debug, Serialize)]
pub struct FinancePage {
    pub range: DateRange,
    pub summary: FinanceSummary,
    pub transactions: Vec<Transaction>,
}

/// `GET /api/finances`
pub async fn finances_page(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<FinancePage>, StatusCode> {
    let range = query.resolve(local_today(&state)).map_err(range_error_to_status)?;
    let rows = finances::list_transactions(&state.pool, auth.user.id, range)
        .await
        .map_err(db_error_to_status)?;
    let summary = finances::summarize(&rows);
    let transactions = finances::recent(&rows, rows.len());
    Ok(Json(FinancePage { range, summary, transactions }))
}

// =============================================================================
// HEALTH
// =============================================================================

#[derive(Debug, Serialize)]
pub struct HealthPage {
    pub range: DateRange,
    pub summary: HealthSummary,
}

/// `GET /api/health`
pub async fn health_page(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<HealthPage>, StatusCode> {
    let today = local_today(&state);
    let range = query.resolve(today).map_err(range_error_to_status)?;
    let entries = health::list_entries(&state.pool, auth.user.id, range)
        .await
        .map_err(db_error_to_status)?;
    Ok(Json(HealthPage { range, summary: health::summarize(&entries, today) }))
}

// =============================================================================
// ACADEMIC
// =============================================================================

#[derive(Debug, Serialize)]
pub struct AcademicPage {
    pub range: DateRange,
    pub summary: AcademicSummary,
}

/// `GET /api/academic`
pub async fn academic_page(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<AcademicPage>, StatusCode> {
    let range = query.resolve(local_today(&state)).map_err(range_error_to_status)?;
    let documents = academic::list_documents(&state.pool, auth.user.id, range, &state.utc_offset)
        .await
        .map_err(db_error_to_status)?;
    Ok(Json(AcademicPage { range, summary: academic::summarize(documents) }))
}

/// `DELETE /api/academic/{id}`
pub async fn delete_document(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let deleted = academic::delete_document(&state.pool, auth.user.id, id)
        .await
        .map_err(db_error_to_status)?;
    Ok(if deleted { StatusCode::NO_CONTENT } else { StatusCode::NOT_FOUND })
}

// =============================================================================
// SCHEDULE
// =============================================================================

/// Range filter plus the calendar day picked in the UI.
#[derive(Debug, Default, Deserialize)]
pub struct ScheduleQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub day: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct SchedulePage {
    pub range: DateRange,
    pub summary: ScheduleSummary,
}

/// `GET /api/schedule`
pub async fn schedule_page(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<SchedulePage>, StatusCode> {
    let today = local_today(&state);
    let range = RangeQuery { from: query.from, to: query.to }
        .resolve(today)
        .map_err(range_error_to_status)?;
    let events = schedule::list_events(&state.pool, auth.user.id, range, &state.utc_offset)
        .await
        .map_err(db_error_to_status)?;
    let summary = schedule::summarize(&events, Utc::now(), query.day.unwrap_or(today), &state.utc_offset);
    Ok(Json(SchedulePage { range, summary }))
}

/// `DELETE /api/schedule/{id}`
pub async fn delete_event(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let deleted = schedule::delete_event(&state.pool, auth.user.id, id)
        .await
        .map_err(db_error_to_status)?;
    Ok(if deleted { StatusCode::NO_CONTENT } else { StatusCode::NOT_FOUND })
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
