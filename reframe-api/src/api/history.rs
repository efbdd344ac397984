//! Session history endpoint

use axum::{extract::State, Json};
use reframe_common::models::Session;
use reframe_common::time::short_date;
use serde::Serialize;

use super::{AuthUser, Dated};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub sessions: Vec<Dated<Session>>,
}

/// GET /api/history
///
/// All of the caller's analysis sessions, oldest first.
pub async fn get_history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<HistoryResponse>> {
    let sessions = state
        .storage
        .get_sessions_by_user_id(user_id)
        .await
        .map_err(ApiError::internal("Failed to fetch history"))?;

    let sessions = sessions
        .into_iter()
        .map(|session| Dated {
            date: short_date(&session.created_at),
            item: session,
        })
        .collect();

    Ok(Json(HistoryResponse {
        success: true,
        sessions,
    }))
}
