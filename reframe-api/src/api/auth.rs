//! Authentication middleware
//!
//! Resolves the calling user's numeric id and stores it in the request
//! extensions as [`AuthUser`]:
//! - no token secret configured: development identity (user 1)
//! - otherwise: `Authorization: Bearer <token>` verified against the secret,
//!   subject mapped through [`numeric_user_id`]
//!
//! The user row is created on first sight so later inserts satisfy the
//! `users.id` foreign key.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use std::time::Duration;
use reframe_common::db::DEFAULT_USERNAME;
use reframe_common::identity::{numeric_user_id, verify_token, DEVELOPMENT_USER_ID};
use tracing::{debug, warn};

use crate::{ApiError, AppState};

/// Numeric id of the authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub i64);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthUser>().copied().ok_or_else(|| {
            ApiError::Unauthorized("User ID not found in authenticated request".to_string())
        })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Token lifetime in milliseconds, saturating at `i64::MAX`
fn max_age_millis(max_age: Duration) -> i64 {
    i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX)
}

fn unauthorized() -> ApiError {
    ApiError::Unauthorized("Authentication required".to_string())
}

/// Authentication middleware, applied to every `/api` route
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (user_id, username) = match &state.auth.token_secret {
        None => {
            debug!("Token verification disabled - using development identity");
            (DEVELOPMENT_USER_ID, DEFAULT_USERNAME.to_string())
        }
        Some(secret) => {
            let token = bearer_token(request.headers()).ok_or_else(unauthorized)?;
            let max_age_ms = max_age_millis(state.auth.token_max_age);

            let subject = verify_token(&token, secret, max_age_ms, Utc::now().timestamp_millis())
                .map_err(|e| {
                    warn!("Authentication error: {}", e);
                    unauthorized()
                })?;

            (numeric_user_id(&subject), subject)
        }
    };

    state
        .storage
        .ensure_user(user_id, &username)
        .await
        .map_err(ApiError::internal("Failed to resolve user"))?;

    request.extensions_mut().insert(AuthUser(user_id));

    Ok(next.run(request).await)
}
