//! Home dashboard — one summary across all four domains.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use sqlx::PgPool;

use super::academic::{self, TagCount};
use super::finances::{self, CategoryTotal, Transaction};
use super::health;
use super::period::DateRange;
use super::schedule::{self, ScheduleEvent};
use super::store::User;

const RECENT_TRANSACTIONS: usize = 5;
const NEXT_EVENTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinanceTotals {
    pub balance: f64,
    pub income: f64,
    pub expenses: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSnapshot {
    pub water_today: f64,
    pub last_sleep: Option<f64>,
    pub water_goal: f64,
    pub sleep_goal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcademicSnapshot {
    pub total_docs: usize,
    pub tag_counts: Vec<TagCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleSnapshot {
    pub upcoming_events: usize,
    pub synced_events: usize,
    pub next_events: Vec<ScheduleEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub greeting: &'static str,
    pub user_name: String,
    pub range: DateRange,
    pub finances: FinanceTotals,
    pub expenses_by_category: Vec<CategoryTotal>,
    pub recent_transactions: Vec<Transaction>,
    pub health: HealthSnapshot,
    pub academic: AcademicSnapshot,
    pub schedule: ScheduleSnapshot,
}

/// Portuguese greeting for a local hour of day.
#[must_use]
pub fn greeting(hour: u32) -> &'static str {
    match hour {
        0..12 => "Bom dia",
        12..18 => "Boa tarde",
        _ => "Boa noite",
    }
}

/// Everything the dashboard needs besides the database rows.
pub struct DashboardContext<'a> {
    pub user: &'a User,
    pub range: DateRange,
    pub now: DateTime<Utc>,
    pub today: NaiveDate,
    pub local_hour: u32,
}

pub struct DomainRows {
    pub transactions: Vec<Transaction>,
    pub health: Vec<health::HealthEntry>,
    pub documents: Vec<academic::AcademicDocument>,
    pub events: Vec<ScheduleEvent>,
}

/// Fetch the four domains for the range, one query at a time.
pub async fn load_rows(
    pool: &PgPool,
    user: &User,
    range: DateRange,
    tz: &FixedOffset,
) -> Result<DomainRows, sqlx::Error> {
    Ok(DomainRows {
        transactions: finances::list_transactions(pool, user.id, range).await?,
        health: health::list_entries(pool, user.id, range).await?,
        documents: academic::list_documents(pool, user.id, range, tz).await?,
        events: schedule::list_events(pool, user.id, range, tz).await?,
    })
}

#[must_use]
pub fn build(ctx: &DashboardContext<'_>, rows: DomainRows) -> DashboardSummary {
    let finance = finances::summarize(&rows.transactions);
    let health = health::summarize(&rows.health, ctx.today);
    let upcoming = schedule::upcoming(&rows.events, ctx.now);

    DashboardSummary {
        greeting: greeting(ctx.local_hour),
        user_name: ctx.user.name.clone(),
        range: ctx.range,
        finances: FinanceTotals {
            balance: finance.balance,
            income: finance.total_income,
            expenses: finance.total_expenses,
        },
        expenses_by_category: finance.category_data,
        recent_transactions: finances::recent(&rows.transactions, RECENT_TRANSACTIONS),
        health: HealthSnapshot {
            water_today: health.water_today,
            last_sleep: health.last_sleep,
            water_goal: health.water_goal,
            sleep_goal: health.sleep_goal,
        },
        academic: AcademicSnapshot {
            total_docs: rows.documents.len(),
            tag_counts: academic::tag_counts(&rows.documents),
        },
        schedule: ScheduleSnapshot {
            upcoming_events: upcoming.len(),
            synced_events: rows.events.iter().filter(|e| e.is_synced()).count(),
            next_events: upcoming.into_iter().take(NEXT_EVENTS).collect(),
        },
    }
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
