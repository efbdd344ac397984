//! User table operations

use reframe_common::models::{NewUser, User};
use reframe_common::{Error, Result};
use sqlx::{Row, SqlitePool};
use tracing::info;

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        password: row.get("password"),
    }
}

pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<Option<User>> {
    let row = sqlx::query("SELECT id, username, password FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(row_to_user))
}

pub async fn get_user_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    let row = sqlx::query("SELECT id, username, password FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(row_to_user))
}

pub async fn create_user(pool: &SqlitePool, user: &NewUser) -> Result<User> {
    let row = sqlx::query(
        "INSERT INTO users (username, password) VALUES (?, ?) RETURNING id, username, password",
    )
    .bind(&user.username)
    .bind(&user.password)
    .fetch_one(pool)
    .await?;

    Ok(row_to_user(&row))
}

/// Insert a user row with a fixed id unless one already exists
///
/// If `username` is already taken by a different id, the row is created as
/// `user-<id>` instead.
pub async fn ensure_user(pool: &SqlitePool, id: i64, username: &str) -> Result<User> {
    if let Some(user) = get_user(pool, id).await? {
        return Ok(user);
    }

    let fallback_name = format!("user-{}", id);
    for name in [username, fallback_name.as_str()] {
        let inserted = sqlx::query("INSERT OR IGNORE INTO users (id, username, password) VALUES (?, ?, '')")
            .bind(id)
            .bind(name)
            .execute(pool)
            .await?
            .rows_affected();

        if inserted > 0 {
            info!(user_id = id, username = %name, "Registered user for authenticated identity");
        }

        if let Some(user) = get_user(pool, id).await? {
            return Ok(user);
        }
    }

    Err(Error::Internal(format!("Could not register user {}", id)))
}
