//! HTTP API handlers for reframe-api

pub mod analyze;
pub mod auth;
pub mod health;
pub mod history;
pub mod journal;
pub mod nudges;
pub mod ui;
pub mod user;

pub use analyze::analyze_problem;
pub use auth::{auth_middleware, AuthUser};
pub use health::health_routes;
pub use history::get_history;
pub use journal::{create_journal_entry, get_journal_entries};
pub use nudges::{get_random_nudge, get_todays_nudge};
pub use ui::attach_static_assets;
pub use user::get_current_user;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::Serialize;

use crate::ApiError;

/// A listed item plus its display date
#[derive(Debug, Serialize)]
pub struct Dated<T> {
    #[serde(flatten)]
    pub item: T,
    pub date: String,
}

/// Unwrap a JSON body, turning extractor rejections into the API envelope
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// A required, non-empty string field
pub(crate) fn required_field(value: Option<String>, message: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(message.to_string()))
}
