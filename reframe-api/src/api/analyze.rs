//! Problem analysis endpoint

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use reframe_common::models::{Analysis, NewSession, Session};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{json_body, required_field, AuthUser};
use crate::{ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct AnalyzeProblemRequest {
    pub problem: Option<String>,
    pub duration: Option<String>,
    pub impact: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeProblemResponse {
    pub success: bool,
    pub session: Session,
    pub analysis: Analysis,
}

/// POST /api/analyze-problem
///
/// Asks the coach for an analysis (static advice when the model is
/// unavailable) and records it as a new session.
pub async fn analyze_problem(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<AnalyzeProblemRequest>, JsonRejection>,
) -> ApiResult<Json<AnalyzeProblemResponse>> {
    const MISSING: &str = "Problem, duration, and impact are required";

    let request = json_body(payload)?;
    let problem = required_field(request.problem, MISSING)?;
    let duration = required_field(request.duration, MISSING)?;
    let impact = required_field(request.impact, MISSING)?;

    let analysis = state.coach.analyze_problem(&problem, &duration, &impact).await;

    let session = state
        .storage
        .create_session(NewSession::from_analysis(
            user_id, &problem, &duration, &impact, &analysis,
        ))
        .await
        .map_err(crate::ApiError::internal("Failed to analyze problem"))?;

    info!(user_id, session_id = session.id, "Problem analysis session created");

    Ok(Json(AnalyzeProblemResponse {
        success: true,
        session,
        analysis,
    }))
}
