//! Problem-analysis session operations

use reframe_common::models::{NewSession, Session};
use reframe_common::time::{from_db_timestamp, now, to_db_timestamp};
use reframe_common::Result;
use sqlx::{Row, SqlitePool};

const SESSION_COLUMNS: &str = "id, user_id, title, problem, duration, impact, root_cause, \
     quick_fix, new_habit, mindset_shift, long_term_advice, created_at";

fn row_to_session(row: &sqlx::sqlite::SqliteRow) -> Result<Session> {
    let created_at: String = row.get("created_at");

    Ok(Session {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        problem: row.get("problem"),
        duration: row.get("duration"),
        impact: row.get("impact"),
        root_cause: row.get("root_cause"),
        quick_fix: row.get("quick_fix"),
        new_habit: row.get("new_habit"),
        mindset_shift: row.get("mindset_shift"),
        long_term_advice: row.get("long_term_advice"),
        created_at: from_db_timestamp(&created_at)?,
    })
}

pub async fn create_session(pool: &SqlitePool, session: &NewSession) -> Result<Session> {
    let sql = format!(
        r#"
        INSERT INTO sessions (
            user_id, title, problem, duration, impact, root_cause,
            quick_fix, new_habit, mindset_shift, long_term_advice, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {}
        "#,
        SESSION_COLUMNS
    );

    let row = sqlx::query(&sql)
        .bind(session.user_id)
        .bind(&session.title)
        .bind(&session.problem)
        .bind(&session.duration)
        .bind(&session.impact)
        .bind(&session.root_cause)
        .bind(&session.quick_fix)
        .bind(&session.new_habit)
        .bind(&session.mindset_shift)
        .bind(&session.long_term_advice)
        .bind(to_db_timestamp(&now()))
        .fetch_one(pool)
        .await?;

    row_to_session(&row)
}

pub async fn get_sessions_by_user_id(pool: &SqlitePool, user_id: i64) -> Result<Vec<Session>> {
    let sql = format!(
        "SELECT {} FROM sessions WHERE user_id = ? ORDER BY created_at, id",
        SESSION_COLUMNS
    );

    let rows = sqlx::query(&sql).bind(user_id).fetch_all(pool).await?;

    rows.iter().map(row_to_session).collect()
}

pub async fn get_session(pool: &SqlitePool, id: i64) -> Result<Option<Session>> {
    let sql = format!("SELECT {} FROM sessions WHERE id = ?", SESSION_COLUMNS);

    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;

    row.as_ref().map(row_to_session).transpose()
}
