//! Academic documents — summaries grouped by subject tag.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::period::DateRange;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcademicDocument {
    pub id: Uuid,
    pub doc_name: String,
    pub summary: Option<String>,
    /// One of `prova`, `trabalho`, `leitura`, `estudo`.
    pub tags: String,
    pub file_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcademicSummary {
    pub total_docs: usize,
    pub with_summary: usize,
    pub active_subjects: usize,
    pub last_updated: Option<DateTime<Utc>>,
    pub tag_counts: Vec<TagCount>,
    pub documents: Vec<AcademicDocument>,
}

/// Documents created inside `range`, newest first.
pub async fn list_documents(
    pool: &PgPool,
    user_id: Uuid,
    range: DateRange,
    tz: &FixedOffset,
) -> Result<Vec<AcademicDocument>, sqlx::Error> {
    let rows = sqlx::query(
        r"SELECT id, doc_name, summary, tags::text AS tags, file_url, created_at
          FROM academic
          WHERE user_id = $1 AND created_at >= $2 AND created_at < $3
          ORDER BY created_at DESC",
    )
    .bind(user_id)
    .bind(range.start_instant(tz))
    .bind(range.end_exclusive(tz))
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|r| AcademicDocument {
            id: r.get("id"),
            doc_name: r.get("doc_name"),
            summary: r.get("summary"),
            tags: r.get("tags"),
            file_url: r.get("file_url"),
            created_at: r.get("created_at"),
        })
        .collect())
}

/// Delete one of the user's documents. Returns `false` when no row matched.
pub async fn delete_document(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM academic WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Per-tag counts, most frequent first, ties by tag name.
#[must_use]
pub fn tag_counts(documents: &[AcademicDocument]) -> Vec<TagCount> {
    let mut counts: Vec<TagCount> = Vec::new();
    for doc in documents {
        match counts.iter_mut().find(|c| c.tag == doc.tags) {
            Some(c) => c.count += 1,
            None => counts.push(TagCount { tag: doc.tags.clone(), count: 1 }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    counts
}

#[must_use]
pub fn summarize(documents: Vec<AcademicDocument>) -> AcademicSummary {
    let tag_counts = tag_counts(&documents);
    AcademicSummary {
        total_docs: documents.len(),
        with_summary: documents
            .iter()
            .filter(|d| d.summary.as_deref().is_some_and(|s| !s.is_empty()))
            .count(),
        active_subjects: tag_counts.len(),
        last_updated: documents.iter().map(|d| d.created_at).max(),
        tag_counts,
        documents,
    }
}
