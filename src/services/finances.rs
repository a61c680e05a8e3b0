//! Finance transactions — range fetch plus totals, category and daily breakdowns.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::period::DateRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    fn from_db(raw: &str) -> Self {
        if raw == "income" { Self::Income } else { Self::Expense }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    pub description: Option<String>,
    pub category: String,
    pub transaction_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyFlow {
    pub date: NaiveDate,
    pub income: f64,
    pub expense: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinanceSummary {
    pub balance: f64,
    pub total_income: f64,
    pub total_expenses: f64,
    /// Expense totals in order of first appearance.
    pub category_data: Vec<CategoryTotal>,
    pub daily_data: Vec<DailyFlow>,
}

/// Transactions for `user_id` inside `range`, oldest first.
pub async fn list_transactions(pool: &PgPool, user_id: Uuid, range: DateRange) -> Result<Vec<Transaction>, sqlx::Error> {
    let rows = sqlx::query(
        r"SELECT id, type::text AS kind, amount::float8 AS amount, description,
                 category::text AS category, transaction_date, created_at
          FROM finances
          WHERE user_id = $1 AND transaction_date >= $2 AND transaction_date <= $3
          ORDER BY transaction_date ASC, created_at ASC",
    )
    .bind(user_id)
    .bind(range.from)
    .bind(range.to)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|r| Transaction {
            id: r.get("id"),
            kind: TransactionKind::from_db(r.get::<&str, _>("kind")),
            amount: r.get("amount"),
            description: r.get("description"),
            category: r.get("category"),
            transaction_date: r.get("transaction_date"),
            created_at: r.get("created_at"),
        })
        .collect())
}

/// Aggregate a chronologically ordered transaction list.
#[must_use]
pub fn summarize(transactions: &[Transaction]) -> FinanceSummary {
    let mut total_income = 0.0;
    let mut total_expenses = 0.0;
    let mut category_data: Vec<CategoryTotal> = Vec::new();
    let mut daily: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();

    for t in transactions {
        let day = daily.entry(t.transaction_date).or_insert((0.0, 0.0));
        match t.kind {
            TransactionKind::Income => {
                total_income += t.amount;
                day.0 += t.amount;
            }
            TransactionKind::Expense => {
                total_expenses += t.amount;
                day.1 += t.amount;
                match category_data.iter_mut().find(|c| c.name == t.category) {
                    Some(c) => c.value += t.amount,
                    None => category_data.push(CategoryTotal { name: t.category.clone(), value: t.amount }),
                }
            }
        }
    }

    let daily_data = daily
        .into_iter()
        .map(|(date, (income, expense))| DailyFlow { date, income, expense })
        .collect();

    FinanceSummary { balance: total_income - total_expenses, total_income, total_expenses, category_data, daily_data }
}

/// Most recent `limit` transactions, newest first. Same-day entries are
/// ordered by when they were recorded.
#[must_use]
pub fn recent(transactions: &[Transaction], limit: usize) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by_key(|t| std::cmp::Reverse((t.transaction_date, t.created_at)));
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
#[path = "finances_test.rs"]
mod tests;
