//! Nudge operations

use rand::Rng;
use reframe_common::models::{NewNudge, Nudge};
use reframe_common::time::{from_db_timestamp, now, to_db_timestamp};
use reframe_common::Result;
use sqlx::{Row, SqlitePool};

/// Index of the nudge shown on `day_of_month`, or `None` for an empty list
///
/// The same day always yields the same nudge; consecutive days walk the
/// list in id order.
pub fn daily_index(day_of_month: u32, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(day_of_month as usize % len)
}

/// Uniform random index, or `None` for an empty list
pub fn random_index(len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(rand::thread_rng().gen_range(0..len))
}

fn row_to_nudge(row: &sqlx::sqlite::SqliteRow) -> Result<Nudge> {
    let created_at: String = row.get("created_at");

    Ok(Nudge {
        id: row.get("id"),
        message: row.get("message"),
        category: row.get("category"),
        created_at: from_db_timestamp(&created_at)?,
    })
}

pub async fn list_nudges(pool: &SqlitePool) -> Result<Vec<Nudge>> {
    let rows = sqlx::query("SELECT id, message, category, created_at FROM nudges ORDER BY id")
        .fetch_all(pool)
        .await?;

    rows.iter().map(row_to_nudge).collect()
}

pub async fn get_todays_nudge(pool: &SqlitePool, day_of_month: u32) -> Result<Option<Nudge>> {
    let mut all = list_nudges(pool).await?;
    Ok(daily_index(day_of_month, all.len()).map(|i| all.swap_remove(i)))
}

pub async fn get_random_nudge(pool: &SqlitePool) -> Result<Option<Nudge>> {
    let mut all = list_nudges(pool).await?;
    Ok(random_index(all.len()).map(|i| all.swap_remove(i)))
}

pub async fn create_nudge(pool: &SqlitePool, nudge: &NewNudge) -> Result<Nudge> {
    let row = sqlx::query(
        r#"
        INSERT INTO nudges (message, category, created_at) VALUES (?, ?, ?)
        RETURNING id, message, category, created_at
        "#,
    )
    .bind(&nudge.message)
    .bind(&nudge.category)
    .bind(to_db_timestamp(&now()))
    .fetch_one(pool)
    .await?;

    row_to_nudge(&row)
}
