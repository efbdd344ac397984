//! Default rows written on first start

use crate::time::{now, to_db_timestamp};
use crate::Result;
use sqlx::SqlitePool;
use tracing::info;

pub const DEFAULT_USERNAME: &str = "demo_user";
pub const DEFAULT_PASSWORD: &str = "demo_password";
pub const DEFAULT_NUDGE_CATEGORY: &str = "motivation";

/// Motivational messages seeded into an empty `nudges` table
pub const DEFAULT_NUDGES: [&str; 12] = [
    "Small consistent actions create extraordinary results. What one tiny step can you take today?",
    "Progress, not perfection. Every small step forward is a victory worth celebrating.",
    "Your future self is counting on the choices you make today. Make them proud.",
    "The best time to plant a tree was 20 years ago. The second best time is now.",
    "You don't have to be great to get started, but you have to get started to be great.",
    "Every expert was once a beginner. Every pro was once an amateur.",
    "The journey of a thousand miles begins with a single step. Take yours today.",
    "Success is not final, failure is not fatal: it is the courage to continue that counts.",
    "The only way to do great work is to love what you do. Find your passion and pursue it.",
    "Believe you can and you're halfway there. Confidence is the first step to achievement.",
    "What lies behind us and what lies before us are tiny matters compared to what lies within us.",
    "The future belongs to those who believe in the beauty of their dreams.",
];

/// Seed the default user and nudges if they are missing
pub async fn seed_defaults(pool: &SqlitePool) -> Result<()> {
    seed_default_user(pool).await?;
    seed_default_nudges(pool).await?;
    Ok(())
}

/// Create user id 1 unless it already exists
///
/// Requests running as the development identity attach their rows to it.
async fn seed_default_user(pool: &SqlitePool) -> Result<()> {
    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = 1")
        .fetch_optional(pool)
        .await?;

    if existing.is_none() {
        sqlx::query("INSERT INTO users (id, username, password) VALUES (1, ?, ?)")
            .bind(DEFAULT_USERNAME)
            .bind(DEFAULT_PASSWORD)
            .execute(pool)
            .await?;
        info!("Created default user");
    }

    Ok(())
}

async fn seed_default_nudges(pool: &SqlitePool) -> Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM nudges")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        return Ok(());
    }

    let created_at = to_db_timestamp(&now());
    let mut tx = pool.begin().await?;
    for message in DEFAULT_NUDGES {
        sqlx::query("INSERT INTO nudges (message, category, created_at) VALUES (?, ?, ?)")
            .bind(message)
            .bind(DEFAULT_NUDGE_CATEGORY)
            .bind(&created_at)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    info!("Created {} default nudges", DEFAULT_NUDGES.len());
    Ok(())
}
