//! In-memory storage
//!
//! Key-by-id maps behind a single async lock. Ids are assigned per table
//! from 1, mirroring SQLite's AUTOINCREMENT. Nothing is persisted.

use async_trait::async_trait;
use reframe_common::db::{DEFAULT_NUDGES, DEFAULT_NUDGE_CATEGORY, DEFAULT_PASSWORD, DEFAULT_USERNAME};
use reframe_common::models::{
    JournalEntry, JournalEntryUpdate, NewJournalEntry, NewNudge, NewSession, NewUser, Nudge,
    Session, User,
};
use reframe_common::time::now;
use reframe_common::{Error, Result};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::nudges::{daily_index, random_index};
use super::{today_day_of_month, Storage};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    sessions: BTreeMap<i64, Session>,
    journal_entries: BTreeMap<i64, JournalEntry>,
    nudges: BTreeMap<i64, Nudge>,
    next_user_id: i64,
    next_session_id: i64,
    next_entry_id: i64,
    next_nudge_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// Storage held entirely in process memory
#[derive(Default)]
pub struct MemoryStorage {
    tables: RwLock<Tables>,
}

impl MemoryStorage {
    /// Empty storage: no users, no nudges
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage holding the same default user and nudges as a fresh database
    pub fn with_defaults() -> Self {
        let mut tables = Tables::default();
        let created_at = now();

        tables.users.insert(
            1,
            User {
                id: 1,
                username: DEFAULT_USERNAME.to_string(),
                password: DEFAULT_PASSWORD.to_string(),
            },
        );
        tables.next_user_id = 1;

        for message in DEFAULT_NUDGES {
            let id = next_id(&mut tables.next_nudge_id);
            tables.nudges.insert(
                id,
                Nudge {
                    id,
                    message: message.to_string(),
                    category: DEFAULT_NUDGE_CATEGORY.to_string(),
                    created_at,
                },
            );
        }

        Self {
            tables: RwLock::new(tables),
        }
    }
}

fn require_user(tables: &Tables, user_id: i64) -> Result<()> {
    if tables.users.contains_key(&user_id) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!("Unknown user id {}", user_id)))
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.username == user.username) {
            return Err(Error::InvalidInput(format!(
                "Username already exists: {}",
                user.username
            )));
        }

        // Next id stays above any explicitly inserted id, as AUTOINCREMENT does
        let max_id = tables.users.keys().next_back().copied().unwrap_or(0);
        tables.next_user_id = tables.next_user_id.max(max_id);
        let id = next_id(&mut tables.next_user_id);

        let user = User {
            id,
            username: user.username,
            password: user.password,
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn ensure_user(&self, id: i64, username: &str) -> Result<User> {
        let mut tables = self.tables.write().await;

        if let Some(user) = tables.users.get(&id) {
            return Ok(user.clone());
        }

        let taken = tables.users.values().any(|u| u.username == username);
        let user = User {
            id,
            username: if taken {
                format!("user-{}", id)
            } else {
                username.to_string()
            },
            password: String::new(),
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn create_session(&self, session: NewSession) -> Result<Session> {
        let mut tables = self.tables.write().await;
        require_user(&tables, session.user_id)?;

        let id = next_id(&mut tables.next_session_id);
        let session = Session {
            id,
            user_id: session.user_id,
            title: session.title,
            problem: session.problem,
            duration: session.duration,
            impact: session.impact,
            root_cause: session.root_cause,
            quick_fix: session.quick_fix,
            new_habit: session.new_habit,
            mindset_shift: session.mindset_shift,
            long_term_advice: session.long_term_advice,
            created_at: now(),
        };
        tables.sessions.insert(id, session.clone());
        Ok(session)
    }

    async fn get_sessions_by_user_id(&self, user_id: i64) -> Result<Vec<Session>> {
        let tables = self.tables.read().await;
        let mut sessions: Vec<Session> = tables
            .sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(sessions)
    }

    async fn get_session(&self, id: i64) -> Result<Option<Session>> {
        Ok(self.tables.read().await.sessions.get(&id).cloned())
    }

    async fn create_journal_entry(&self, entry: NewJournalEntry) -> Result<JournalEntry> {
        let mut tables = self.tables.write().await;
        require_user(&tables, entry.user_id)?;

        let id = next_id(&mut tables.next_entry_id);
        let entry = JournalEntry {
            id,
            user_id: entry.user_id,
            content: entry.content,
            reflection: None,
            micro_advice: None,
            created_at: now(),
        };
        tables.journal_entries.insert(id, entry.clone());
        Ok(entry)
    }

    async fn get_journal_entries_by_user_id(&self, user_id: i64) -> Result<Vec<JournalEntry>> {
        let tables = self.tables.read().await;
        let mut entries: Vec<JournalEntry> = tables
            .journal_entries
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(entries)
    }

    async fn update_journal_entry(
        &self,
        id: i64,
        updates: JournalEntryUpdate,
    ) -> Result<Option<JournalEntry>> {
        let mut tables = self.tables.write().await;

        let Some(entry) = tables.journal_entries.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(reflection) = updates.reflection {
            entry.reflection = Some(reflection);
        }
        if let Some(micro_advice) = updates.micro_advice {
            entry.micro_advice = Some(micro_advice);
        }

        Ok(Some(entry.clone()))
    }

    async fn get_todays_nudge(&self) -> Result<Option<Nudge>> {
        let tables = self.tables.read().await;
        let index = daily_index(today_day_of_month(), tables.nudges.len());
        Ok(index.and_then(|i| tables.nudges.values().nth(i).cloned()))
    }

    async fn create_nudge(&self, nudge: NewNudge) -> Result<Nudge> {
        let mut tables = self.tables.write().await;

        let id = next_id(&mut tables.next_nudge_id);
        let nudge = Nudge {
            id,
            message: nudge.message,
            category: nudge.category,
            created_at: now(),
        };
        tables.nudges.insert(id, nudge.clone());
        Ok(nudge)
    }

    async fn get_random_nudge(&self) -> Result<Option<Nudge>> {
        let tables = self.tables.read().await;
        let index = random_index(tables.nudges.len());
        Ok(index.and_then(|i| tables.nudges.values().nth(i).cloned()))
    }
}
