//! reframe-api library
//!
//! HTTP service for the Reframe coaching app: problem analysis, journaling
//! with reflection, session history and daily nudges.

pub mod api;
pub mod coach;
pub mod db;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::coach::Coach;
use crate::db::Storage;

/// Identity token settings
#[derive(Clone, Debug)]
pub struct AuthSettings {
    /// `None` disables verification; every request runs as the development user
    pub token_secret: Option<String>,
    pub token_max_age: Duration,
}

impl AuthSettings {
    pub fn disabled() -> Self {
        Self {
            token_secret: None,
            token_max_age: Duration::from_secs(86_400),
        }
    }

    pub fn with_secret(secret: impl Into<String>, token_max_age: Duration) -> Self {
        Self {
            token_secret: Some(secret.into()),
            token_max_age,
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub coach: Coach,
    pub auth: AuthSettings,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, coach: Coach, auth: AuthSettings) -> Self {
        Self {
            storage,
            coach,
            auth,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// `/health` is public; everything under `/api` passes the auth middleware.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    let protected = Router::new()
        .route("/api/user", get(api::get_current_user))
        .route("/api/analyze-problem", post(api::analyze_problem))
        .route("/api/journal-entry", post(api::create_journal_entry))
        .route("/api/journal", get(api::get_journal_entries))
        .route("/api/nudges", get(api::get_todays_nudge))
        .route("/api/nudges/random", post(api::get_random_nudge))
        .route("/api/history", get(api::get_history))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    Router::new()
        .merge(protected)
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
