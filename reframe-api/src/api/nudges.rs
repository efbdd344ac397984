//! Nudge endpoints

use axum::{extract::State, Json};
use reframe_common::models::Nudge;
use reframe_common::time::{long_date, now};
use serde::Serialize;

use super::{AuthUser, Dated};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct NudgeResponse {
    pub success: bool,
    pub nudge: Dated<Nudge>,
}

/// Nudges are dated with the day they are shown, not the day they were stored
fn respond(nudge: Option<Nudge>) -> ApiResult<Json<NudgeResponse>> {
    let nudge = nudge.ok_or_else(|| ApiError::NotFound("No nudge available".to_string()))?;

    Ok(Json(NudgeResponse {
        success: true,
        nudge: Dated {
            date: long_date(&now()),
            item: nudge,
        },
    }))
}

/// GET /api/nudges
///
/// Same nudge for every caller on a given day.
pub async fn get_todays_nudge(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<NudgeResponse>> {
    let nudge = state
        .storage
        .get_todays_nudge()
        .await
        .map_err(ApiError::internal("Failed to fetch nudge"))?;

    respond(nudge)
}

/// POST /api/nudges/random
pub async fn get_random_nudge(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<NudgeResponse>> {
    let nudge = state
        .storage
        .get_random_nudge()
        .await
        .map_err(ApiError::internal("Failed to fetch nudge"))?;

    respond(nudge)
}
