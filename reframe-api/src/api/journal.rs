//! Journal endpoints

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use reframe_common::models::{JournalEntry, JournalEntryUpdate, NewJournalEntry, Reflection};
use reframe_common::time::short_date;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{json_body, required_field, AuthUser, Dated};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct JournalEntryRequest {
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JournalEntryResponse {
    pub success: bool,
    pub entry: JournalEntry,
    pub reflection: Reflection,
}

#[derive(Debug, Serialize)]
pub struct JournalListResponse {
    pub success: bool,
    pub entries: Vec<Dated<JournalEntry>>,
}

/// POST /api/journal-entry
///
/// Stores the entry first, then attaches the coach's reflection to it.
pub async fn create_journal_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<JournalEntryRequest>, JsonRejection>,
) -> ApiResult<Json<JournalEntryResponse>> {
    let request = json_body(payload)?;
    let content = required_field(request.content, "Content is required")?;

    const FAILED: &str = "Failed to create journal entry";

    let entry = state
        .storage
        .create_journal_entry(NewJournalEntry {
            user_id,
            content: content.clone(),
        })
        .await
        .map_err(ApiError::internal(FAILED))?;

    let reflection = state.coach.reflect_on_journal(&content).await;

    let updated = state
        .storage
        .update_journal_entry(entry.id, JournalEntryUpdate::from(&reflection))
        .await
        .map_err(ApiError::internal(FAILED))?;

    let entry = match updated {
        Some(updated) => updated,
        None => {
            warn!(entry_id = entry.id, "Journal entry vanished before reflection was saved");
            entry
        }
    };

    info!(user_id, entry_id = entry.id, "Journal entry created");

    Ok(Json(JournalEntryResponse {
        success: true,
        entry,
        reflection,
    }))
}

/// GET /api/journal
pub async fn get_journal_entries(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<JournalListResponse>> {
    let entries = state
        .storage
        .get_journal_entries_by_user_id(user_id)
        .await
        .map_err(ApiError::internal("Failed to fetch journal entries"))?;

    let entries = entries
        .into_iter()
        .map(|entry| Dated {
            date: short_date(&entry.created_at),
            item: entry,
        })
        .collect();

    Ok(Json(JournalListResponse {
        success: true,
        entries,
    }))
}
