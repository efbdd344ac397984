//! Current user endpoint

use axum::Json;
use serde::Serialize;

use super::AuthUser;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
    pub success: bool,
    pub user_id: i64,
}

/// GET /api/user
pub async fn get_current_user(AuthUser(user_id): AuthUser) -> Json<CurrentUserResponse> {
    Json(CurrentUserResponse {
        success: true,
        user_id,
    })
}
