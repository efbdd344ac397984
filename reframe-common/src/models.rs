//! Domain models
//!
//! Field names are serialized in camelCase, which is what the web client reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Problems longer than this are truncated when used as a session title
pub const TITLE_MAX_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

/// A single problem-analysis interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub problem: String,
    pub duration: String,
    pub impact: String,
    pub root_cause: String,
    pub quick_fix: String,
    pub new_habit: String,
    pub mindset_shift: String,
    pub long_term_advice: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSession {
    pub user_id: i64,
    pub title: String,
    pub problem: String,
    pub duration: String,
    pub impact: String,
    pub root_cause: String,
    pub quick_fix: String,
    pub new_habit: String,
    pub mindset_shift: String,
    pub long_term_advice: String,
}

impl NewSession {
    /// Build a session from the user's intake answers and the coach's analysis
    pub fn from_analysis(
        user_id: i64,
        problem: &str,
        duration: &str,
        impact: &str,
        analysis: &Analysis,
    ) -> Self {
        Self {
            user_id,
            title: session_title(problem),
            problem: problem.to_string(),
            duration: duration.to_string(),
            impact: impact.to_string(),
            root_cause: analysis.root_cause.clone(),
            quick_fix: analysis.quick_fix.clone(),
            new_habit: analysis.new_habit.clone(),
            mindset_shift: analysis.mindset_shift.clone(),
            long_term_advice: analysis.long_term_advice.clone(),
        }
    }
}

/// Derive a session title from the problem statement
///
/// Truncation counts characters, not bytes, so multi-byte text is never
/// split mid-character.
pub fn session_title(problem: &str) -> String {
    match problem.char_indices().nth(TITLE_MAX_CHARS) {
        Some((cut, _)) => format!("{}...", &problem[..cut]),
        None => problem.to_string(),
    }
}

/// The five advice fields produced for a problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub root_cause: String,
    pub quick_fix: String,
    pub new_habit: String,
    pub mindset_shift: String,
    pub long_term_advice: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub reflection: Option<String>,
    pub micro_advice: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewJournalEntry {
    pub user_id: i64,
    pub content: String,
}

/// Partial update of a journal entry; `None` leaves a column untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JournalEntryUpdate {
    pub reflection: Option<String>,
    pub micro_advice: Option<String>,
}

impl From<&Reflection> for JournalEntryUpdate {
    fn from(reflection: &Reflection) -> Self {
        Self {
            reflection: Some(reflection.reflection.clone()),
            micro_advice: Some(reflection.micro_advice.clone()),
        }
    }
}

/// Coach commentary on a journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reflection {
    pub reflection: String,
    pub micro_advice: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nudge {
    pub id: i64,
    pub message: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewNudge {
    pub message: String,
    pub category: String,
}
