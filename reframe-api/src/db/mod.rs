//! Storage layer
//!
//! [`Storage`] is the seam between route handlers and persistence. Two
//! implementations exist:
//! - [`SqliteStorage`]: table reader/writer over the shared SQLite schema
//! - [`MemoryStorage`]: key-by-id maps, used by tests and `--memory` runs

pub mod journal;
pub mod memory;
pub mod nudges;
pub mod sessions;
pub mod users;

pub use memory::MemoryStorage;
pub use nudges::daily_index;

use async_trait::async_trait;
use chrono::Datelike;
use reframe_common::models::{
    JournalEntry, JournalEntryUpdate, NewJournalEntry, NewNudge, NewSession, NewUser, Nudge,
    Session, User,
};
use reframe_common::Result;
use sqlx::SqlitePool;

/// Persistence operations used by the HTTP layer
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_user(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn create_user(&self, user: NewUser) -> Result<User>;

    /// Create the row for an authenticated identity if it is missing
    ///
    /// Sessions and journal entries reference `users.id`, so every identity
    /// that writes must exist first.
    async fn ensure_user(&self, id: i64, username: &str) -> Result<User>;

    async fn create_session(&self, session: NewSession) -> Result<Session>;
    /// Sessions for a user, oldest first
    async fn get_sessions_by_user_id(&self, user_id: i64) -> Result<Vec<Session>>;
    async fn get_session(&self, id: i64) -> Result<Option<Session>>;

    /// New entries start without reflection or micro advice
    async fn create_journal_entry(&self, entry: NewJournalEntry) -> Result<JournalEntry>;
    /// Journal entries for a user, oldest first
    async fn get_journal_entries_by_user_id(&self, user_id: i64) -> Result<Vec<JournalEntry>>;
    /// Returns `None` when no entry has this id
    async fn update_journal_entry(
        &self,
        id: i64,
        updates: JournalEntryUpdate,
    ) -> Result<Option<JournalEntry>>;

    /// Nudge for the current day of the month, `None` when there are none
    async fn get_todays_nudge(&self) -> Result<Option<Nudge>>;
    async fn create_nudge(&self, nudge: NewNudge) -> Result<Nudge>;
    /// Uniformly random nudge, `None` when there are none
    async fn get_random_nudge(&self) -> Result<Option<Nudge>>;
}

/// Current day of the month (1-31), UTC
pub(crate) fn today_day_of_month() -> u32 {
    reframe_common::time::now().day()
}

/// SQLite-backed storage
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        users::get_user(&self.pool, id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        users::get_user_by_username(&self.pool, username).await
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        users::create_user(&self.pool, &user).await
    }

    async fn ensure_user(&self, id: i64, username: &str) -> Result<User> {
        users::ensure_user(&self.pool, id, username).await
    }

    async fn create_session(&self, session: NewSession) -> Result<Session> {
        sessions::create_session(&self.pool, &session).await
    }

    async fn get_sessions_by_user_id(&self, user_id: i64) -> Result<Vec<Session>> {
        sessions::get_sessions_by_user_id(&self.pool, user_id).await
    }

    async fn get_session(&self, id: i64) -> Result<Option<Session>> {
        sessions::get_session(&self.pool, id).await
    }

    async fn create_journal_entry(&self, entry: NewJournalEntry) -> Result<JournalEntry> {
        journal::create_journal_entry(&self.pool, &entry).await
    }

    async fn get_journal_entries_by_user_id(&self, user_id: i64) -> Result<Vec<JournalEntry>> {
        journal::get_journal_entries_by_user_id(&self.pool, user_id).await
    }

    async fn update_journal_entry(
        &self,
        id: i64,
        updates: JournalEntryUpdate,
    ) -> Result<Option<JournalEntry>> {
        journal::update_journal_entry(&self.pool, id, &updates).await
    }

    async fn get_todays_nudge(&self) -> Result<Option<Nudge>> {
        nudges::get_todays_nudge(&self.pool, today_day_of_month()).await
    }

    async fn create_nudge(&self, nudge: NewNudge) -> Result<Nudge> {
        nudges::create_nudge(&self.pool, &nudge).await
    }

    async fn get_random_nudge(&self) -> Result<Option<Nudge>> {
        nudges::get_random_nudge(&self.pool).await
    }
}
