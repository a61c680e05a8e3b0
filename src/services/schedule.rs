//! Schedule events, including their Google Calendar sync state.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::period::DateRange;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEvent {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub google_event_id: Option<String>,
    pub reminder_sent: bool,
}

impl ScheduleEvent {
    #[must_use]
    pub fn is_synced(&self) -> bool {
        self.google_event_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Calendar day the event starts on, as seen on the `tz` wall clock.
    #[must_use]
    pub fn local_day(&self, tz: &FixedOffset) -> NaiveDate {
        self.start_time.with_timezone(tz).date_naive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleSummary {
    pub upcoming: usize,
    pub synced: usize,
    pub pending: usize,
    pub event_dates: Vec<NaiveDate>,
    pub selected_day: NaiveDate,
    pub day_events: Vec<ScheduleEvent>,
    pub upcoming_events: Vec<ScheduleEvent>,
}

/// Events starting inside `range`, earliest first.
pub async fn list_events(
    pool: &PgPool,
    user_id: Uuid,
    range: DateRange,
    tz: &FixedOffset,
) -> Result<Vec<ScheduleEvent>, sqlx::Error> {
    let rows = sqlx::query(
        r"SELECT id, title, description, start_time, end_time, google_event_id,
                 COALESCE(lembrete_1h_enviado, false) AS reminder_sent
          FROM agendamento
          WHERE user_id = $1 AND start_time >= $2 AND start_time < $3
          ORDER BY start_time ASC",
    )
    .bind(user_id)
    .bind(range.start_instant(tz))
    .bind(range.end_exclusive(tz))
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|r| ScheduleEvent {
            id: r.get("id"),
            title: r.get("title"),
            description: r.get("description"),
            start_time: r.get("start_time"),
            end_time: r.get("end_time"),
            google_event_id: r.get("google_event_id"),
            reminder_sent: r.get("reminder_sent"),
        })
        .collect())
}

/// Delete one of the user's events. Returns `false` when no row matched.
pub async fn delete_event(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM agendamento WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Events that have not started yet at `now`, in start order.
#[must_use]
pub fn upcoming(events: &[ScheduleEvent], now: DateTime<Utc>) -> Vec<ScheduleEvent> {
    events.iter().filter(|e| e.start_time >= now).cloned().collect()
}

/// Summarize an ascending event list for the calendar view. Days are taken
/// on the `tz` wall clock.
#[must_use]
pub fn summarize(
    events: &[ScheduleEvent],
    now: DateTime<Utc>,
    selected_day: NaiveDate,
    tz: &FixedOffset,
) -> ScheduleSummary {
    let upcoming_events = upcoming(events, now);
    let synced = events.iter().filter(|e| e.is_synced()).count();

    let mut event_dates: Vec<NaiveDate> = events.iter().map(|e| e.local_day(tz)).collect();
    event_dates.dedup();

    ScheduleSummary {
        upcoming: upcoming_events.len(),
        synced,
        pending: events.len() - synced,
        event_dates,
        selected_day,
        day_events: events
            .iter()
            .filter(|e| e.local_day(tz) == selected_day)
            .cloned()
            .collect(),
        upcoming_events,
    }
}

#[cfg(test)]
#[path = "schedule_test.rs"]
mod tests;
