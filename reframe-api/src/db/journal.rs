//! Journal entry operations

use reframe_common::models::{JournalEntry, JournalEntryUpdate, NewJournalEntry};
use reframe_common::time::{from_db_timestamp, now, to_db_timestamp};
use reframe_common::Result;
use sqlx::{Row, SqlitePool};

const ENTRY_COLUMNS: &str = "id, user_id, content, reflection, micro_advice, created_at";

fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<JournalEntry> {
    let created_at: String = row.get("created_at");

    Ok(JournalEntry {
        id: row.get("id"),
        user_id: row.get("user_id"),
        content: row.get("content"),
        reflection: row.get("reflection"),
        micro_advice: row.get("micro_advice"),
        created_at: from_db_timestamp(&created_at)?,
    })
}

pub async fn create_journal_entry(
    pool: &SqlitePool,
    entry: &NewJournalEntry,
) -> Result<JournalEntry> {
    let sql = format!(
        "INSERT INTO journal_entries (user_id, content, created_at) VALUES (?, ?, ?) RETURNING {}",
        ENTRY_COLUMNS
    );

    let row = sqlx::query(&sql)
        .bind(entry.user_id)
        .bind(&entry.content)
        .bind(to_db_timestamp(&now()))
        .fetch_one(pool)
        .await?;

    row_to_entry(&row)
}

pub async fn get_journal_entries_by_user_id(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<JournalEntry>> {
    let sql = format!(
        "SELECT {} FROM journal_entries WHERE user_id = ? ORDER BY created_at, id",
        ENTRY_COLUMNS
    );

    let rows = sqlx::query(&sql).bind(user_id).fetch_all(pool).await?;

    rows.iter().map(row_to_entry).collect()
}

/// Apply a partial update; `None` fields keep their stored value
pub async fn update_journal_entry(
    pool: &SqlitePool,
    id: i64,
    updates: &JournalEntryUpdate,
) -> Result<Option<JournalEntry>> {
    let sql = format!(
        r#"
        UPDATE journal_entries SET
            reflection = COALESCE(?, reflection),
            micro_advice = COALESCE(?, micro_advice)
        WHERE id = ?
        RETURNING {}
        "#,
        ENTRY_COLUMNS
    );

    let row = sqlx::query(&sql)
        .bind(&updates.reflection)
        .bind(&updates.micro_advice)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(row_to_entry).transpose()
}
