//! Health log — water, sleep, weight and workouts.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::period::DateRange;

pub const WATER_GOAL_ML: f64 = 2500.0;
pub const SLEEP_GOAL_HOURS: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthCategory {
    Agua,
    Treino,
    Sono,
    Peso,
}

impl HealthCategory {
    fn from_db(raw: &str) -> Option<Self> {
        match raw {
            "Agua" => Some(Self::Agua),
            "Treino" => Some(Self::Treino),
            "Sono" => Some(Self::Sono),
            "Peso" => Some(Self::Peso),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthEntry {
    pub id: Uuid,
    pub category: HealthCategory,
    pub value: f64,
    pub item: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyValue {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workout {
    pub item: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSummary {
    pub water_today: f64,
    pub water_goal: f64,
    pub sleep_goal: f64,
    pub last_sleep: Option<f64>,
    pub last_weight: Option<f64>,
    pub water_history: Vec<DailyValue>,
    pub sleep_history: Vec<DailyValue>,
    pub workout_log: Vec<Workout>,
    pub recent_workouts: usize,
}

/// Entries for `user_id` inside `range`, oldest first. Unknown categories are skipped.
pub async fn list_entries(pool: &PgPool, user_id: Uuid, range: DateRange) -> Result<Vec<HealthEntry>, sqlx::Error> {
    let rows = sqlx::query(
        r"SELECT id, category::text AS category, value::float8 AS value, item, calendario, created_at
          FROM health
          WHERE user_id = $1 AND calendario >= $2 AND calendario <= $3
          ORDER BY calendario ASC, created_at ASC",
    )
    .bind(user_id)
    .bind(range.from)
    .bind(range.to)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .filter_map(|r| {
            let category = HealthCategory::from_db(r.get::<&str, _>("category"))?;
            Some(HealthEntry {
                id: r.get("id"),
                category,
                value: r.get("value"),
                item: r.get("item"),
                date: r.get("calendario"),
                created_at: r.get("created_at"),
            })
        })
        .collect())
}

fn daily_sums(entries: &[HealthEntry], category: HealthCategory) -> Vec<DailyValue> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for e in entries.iter().filter(|e| e.category == category) {
        *by_day.entry(e.date).or_insert(0.0) += e.value;
    }
    by_day
        .into_iter()
        .map(|(date, value)| DailyValue { date, value })
        .collect()
}

fn latest(entries: &[HealthEntry], category: HealthCategory) -> Option<f64> {
    entries
        .iter()
        .filter(|e| e.category == category)
        .max_by_key(|e| (e.date, e.created_at))
        .map(|e| e.value)
}

/// Aggregate entries as seen on `today`.
#[must_use]
pub fn summarize(entries: &[HealthEntry], today: NaiveDate) -> HealthSummary {
    let water_today = entries
        .iter()
        .filter(|e| e.category == HealthCategory::Agua && e.date == today)
        .map(|e| e.value)
        .sum::<f64>();

    let mut workouts: Vec<&HealthEntry> = entries
        .iter()
        .filter(|e| e.category == HealthCategory::Treino)
        .collect();
    workouts.sort_by_key(|e| std::cmp::Reverse((e.date, e.created_at)));
    let workout_log: Vec<Workout> = workouts
        .into_iter()
        .map(|e| Workout { item: e.item.clone().unwrap_or_default(), date: e.date })
        .collect();

    HealthSummary {
        water_today,
        water_goal: WATER_GOAL_ML,
        sleep_goal: SLEEP_GOAL_HOURS,
        last_sleep: latest(entries, HealthCategory::Sono),
        last_weight: latest(entries, HealthCategory::Peso),
        water_history: daily_sums(entries, HealthCategory::Agua),
        sleep_history: daily_sums(entries, HealthCategory::Sono),
        recent_workouts: workout_log.len(),
        workout_log,
    }
}

#[cfg(test)]
#[path = "health_test.rs"]
mod tests;
