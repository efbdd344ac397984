//! Integration tests for reframe-api endpoints
//!
//! Requests go through the full router (auth middleware included) via
//! `oneshot`, against in-memory storage and a scripted language model.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use reframe_api::coach::{fallback, Coach, CoachError, LanguageModel};
use reframe_api::db::{MemoryStorage, SqliteStorage, Storage};
use reframe_api::{build_router, AppState, AuthSettings};
use reframe_common::identity::{numeric_user_id, sign_token};
use reframe_common::models::{
    JournalEntry, JournalEntryUpdate, NewJournalEntry, NewNudge, NewSession, NewUser, Nudge,
    Session, User,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt; // for `oneshot` method

const SECRET: &str = "integration-secret";

const ANALYSIS_JSON: &str = r#"Sure! {"rootCause":"Fear of judgment","quickFix":"Write one line",
"newHabit":"Daily 5-minute draft","mindsetShift":"Drafts are allowed to be bad",
"longTermAdvice":"Track streaks weekly"}"#;

const REFLECTION_JSON: &str =
    r#"{"reflection":"You were honest with yourself.","microAdvice":"Take a short walk."}"#;

/// Answers analysis prompts and reflection prompts with fixed JSON
struct ScriptedModel;

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> Result<String, CoachError> {
        if prompt.contains("Journal Entry:") {
            Ok(REFLECTION_JSON.to_string())
        } else {
            Ok(ANALYSIS_JSON.to_string())
        }
    }
}

/// Always unavailable
struct DownModel;

#[async_trait]
impl LanguageModel for DownModel {
    async fn generate(&self, _prompt: &str) -> Result<String, CoachError> {
        Err(CoachError::Api(503, "Service Unavailable".to_string()))
    }
}

fn setup_app_with(storage: Arc<dyn Storage>, model: Arc<dyn LanguageModel>, auth: AuthSettings) -> Router {
    build_router(AppState::new(storage, Coach::new(model), auth))
}

/// Test helper: app with default data, scripted model, auth disabled
fn setup_app() -> Router {
    setup_app_with(
        Arc::new(MemoryStorage::with_defaults()),
        Arc::new(ScriptedModel),
        AuthSettings::disabled(),
    )
}

fn setup_auth_app() -> Router {
    setup_app_with(
        Arc::new(MemoryStorage::with_defaults()),
        Arc::new(ScriptedModel),
        AuthSettings::with_secret(SECRET, Duration::from_secs(3600)),
    )
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn with_token(mut request: Request<Body>, token: &str) -> Request<Body> {
    request.headers_mut().insert(
        "authorization",
        format!("Bearer {}", token).parse().unwrap(),
    );
    request
}

fn token_for(subject: &str) -> String {
    sign_token(subject, chrono::Utc::now().timestamp_millis(), SECRET)
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, extract_json(response.into_body()).await)
}

fn problem_body(problem: &str) -> Value {
    json!({"problem": problem, "duration": "6 months", "impact": "high"})
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint_no_auth_required() {
    let app = setup_auth_app();

    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "reframe-api");
    assert!(body["version"].is_string());
    assert!(body["uptime_seconds"].is_u64());
}

// =============================================================================
// Identity
// =============================================================================

#[tokio::test]
async fn test_development_identity_when_auth_disabled() {
    let app = setup_app();

    let (status, body) = send(&app, get("/api/user")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["userId"], 1);
}

#[tokio::test]
async fn test_missing_token_rejected() {
    let app = setup_auth_app();

    let (status, body) = send(&app, get("/api/user")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Authentication required");
}

#[tokio::test]
async fn test_forged_token_rejected() {
    let app = setup_auth_app();
    let forged = sign_token("someone", chrono::Utc::now().timestamp_millis(), "wrong-secret");

    let (status, body) = send(&app, with_token(get("/api/history"), &forged)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication required");
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let app = setup_auth_app();
    let two_hours_ago = chrono::Utc::now().timestamp_millis() - 2 * 3600 * 1000;
    let stale = sign_token("someone", two_hours_ago, SECRET);

    let (status, _) = send(&app, with_token(get("/api/user"), &stale)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_token_maps_subject_to_numeric_id() {
    let app = setup_auth_app();
    let subject = "user_2abcDEFghi";

    let (status, body) = send(&app, with_token(get("/api/user"), &token_for(subject))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userId"], numeric_user_id(subject));
}

#[tokio::test]
async fn test_mock_subject_is_development_user() {
    let app = setup_auth_app();

    let (_, body) = send(&app, with_token(get("/api/user"), &token_for("mock-user-id"))).await;

    assert_eq!(body["userId"], 1);
}

#[tokio::test]
async fn test_history_isolated_between_users() {
    let app = setup_auth_app();
    let alice = token_for("alice");
    let bob = token_for("bob");

    let (status, _) = send(
        &app,
        with_token(post_json("/api/analyze-problem", problem_body("Alice's problem")), &alice),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, alice_history) = send(&app, with_token(get("/api/history"), &alice)).await;
    let (_, bob_history) = send(&app, with_token(get("/api/history"), &bob)).await;

    assert_eq!(alice_history["sessions"].as_array().unwrap().len(), 1);
    assert_eq!(
        alice_history["sessions"][0]["userId"],
        numeric_user_id("alice")
    );
    assert!(bob_history["sessions"].as_array().unwrap().is_empty());
}

// =============================================================================
// Problem analysis
// =============================================================================

#[tokio::test]
async fn test_analyze_problem_creates_session() {
    let app = setup_app();

    let (status, body) = send(
        &app,
        post_json("/api/analyze-problem", problem_body("I procrastinate on writing")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["analysis"]["rootCause"], "Fear of judgment");
    assert_eq!(body["analysis"]["longTermAdvice"], "Track streaks weekly");

    let session = &body["session"];
    assert_eq!(session["userId"], 1);
    assert_eq!(session["title"], "I procrastinate on writing");
    assert_eq!(session["problem"], "I procrastinate on writing");
    assert_eq!(session["duration"], "6 months");
    assert_eq!(session["impact"], "high");
    assert_eq!(session["quickFix"], "Write one line");
    assert!(session["createdAt"].is_string());
}

#[tokio::test]
async fn test_long_problem_title_truncated() {
    let app = setup_app();
    let problem = "x".repeat(80);

    let (_, body) = send(&app, post_json("/api/analyze-problem", problem_body(&problem))).await;

    assert_eq!(body["session"]["title"], format!("{}...", "x".repeat(50)));
    assert_eq!(body["session"]["problem"], problem);
}

#[tokio::test]
async fn test_analyze_problem_uses_fallback_when_model_down() {
    let app = setup_app_with(
        Arc::new(MemoryStorage::with_defaults()),
        Arc::new(DownModel),
        AuthSettings::disabled(),
    );

    let (status, body) = send(&app, post_json("/api/analyze-problem", problem_body("p"))).await;

    assert_eq!(status, StatusCode::OK);
    let expected = fallback::analysis();
    assert_eq!(body["analysis"]["rootCause"], expected.root_cause);
    assert_eq!(body["session"]["newHabit"], expected.new_habit);
}

#[tokio::test]
async fn test_analyze_problem_requires_all_fields() {
    let app = setup_app();

    for body in [
        json!({"duration": "d", "impact": "i"}),
        json!({"problem": "p", "impact": "i"}),
        json!({"problem": "p", "duration": "d", "impact": ""}),
    ] {
        let (status, response) = send(&app, post_json("/api/analyze-problem", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["success"], false);
        assert_eq!(response["message"], "Problem, duration, and impact are required");
    }

    let (_, history) = send(&app, get("/api/history")).await;
    assert!(history["sessions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_whitespace_fields_count_as_present() {
    let app = setup_app();

    let (status, body) = send(
        &app,
        post_json("/api/analyze-problem", json!({"problem": " ", "duration": "d", "impact": "i"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["title"], " ");

    let (status, _) = send(&app, post_json("/api/journal-entry", json!({"content": "\n\t "}))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_json_body_rejected_in_envelope() {
    let app = setup_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/analyze-problem")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}

// =============================================================================
// History
// =============================================================================

#[tokio::test]
async fn test_history_lists_sessions_oldest_first_with_date() {
    let app = setup_app();

    send(&app, post_json("/api/analyze-problem", problem_body("first"))).await;
    send(&app, post_json("/api/analyze-problem", problem_body("second"))).await;

    let (status, body) = send(&app, get("/api/history")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let sessions = body["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0]["problem"], "first");
    assert_eq!(sessions[1]["problem"], "second");

    let expected_date = reframe_common::time::short_date(&chrono::Utc::now());
    assert_eq!(sessions[0]["date"], expected_date);
}

// =============================================================================
// Journal
// =============================================================================

#[tokio::test]
async fn test_journal_entry_gets_reflection() {
    let app = setup_app();

    let (status, body) = send(
        &app,
        post_json("/api/journal-entry", json!({"content": "Skipped the gym again"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["reflection"]["reflection"], "You were honest with yourself.");
    assert_eq!(body["reflection"]["microAdvice"], "Take a short walk.");

    let entry = &body["entry"];
    assert_eq!(entry["content"], "Skipped the gym again");
    assert_eq!(entry["reflection"], "You were honest with yourself.");
    assert_eq!(entry["microAdvice"], "Take a short walk.");

    let (_, list) = send(&app, get("/api/journal")).await;
    let entries = list["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["reflection"], "You were honest with yourself.");
    assert!(entries[0]["date"].is_string());
}

#[tokio::test]
async fn test_journal_entry_fallback_reflection() {
    let app = setup_app_with(
        Arc::new(MemoryStorage::with_defaults()),
        Arc::new(DownModel),
        AuthSettings::disabled(),
    );

    let (status, body) = send(&app, post_json("/api/journal-entry", json!({"content": "hi"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reflection"]["reflection"], fallback::reflection().reflection);
    assert_eq!(body["entry"]["microAdvice"], fallback::reflection().micro_advice);
}

#[tokio::test]
async fn test_journal_entry_requires_content() {
    let app = setup_app();

    for body in [json!({}), json!({"content": ""}), json!({"content": null})] {
        let (status, response) = send(&app, post_json("/api/journal-entry", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["message"], "Content is required");
    }
}

// =============================================================================
// Nudges
// =============================================================================

#[tokio::test]
async fn test_todays_nudge_stable_within_day() {
    let app = setup_app();

    let (status, first) = send(&app, get("/api/nudges")).await;
    let (_, second) = send(&app, get("/api/nudges")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["success"], true);
    assert_eq!(first["nudge"]["id"], second["nudge"]["id"]);
    assert_eq!(first["nudge"]["category"], "motivation");
    assert_eq!(
        first["nudge"]["date"],
        reframe_common::time::long_date(&chrono::Utc::now())
    );
}

#[tokio::test]
async fn test_random_nudge() {
    let app = setup_app();

    let (status, body) = send(&app, post_json("/api/nudges/random", json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    let id = body["nudge"]["id"].as_i64().unwrap();
    assert!((1..=12).contains(&id));
    assert!(body["nudge"]["message"].is_string());
}

#[tokio::test]
async fn test_no_nudges_is_not_found() {
    let app = setup_app_with(
        Arc::new(MemoryStorage::new()),
        Arc::new(ScriptedModel),
        AuthSettings::disabled(),
    );

    for request in [get("/api/nudges"), post_json("/api/nudges/random", json!({}))] {
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "No nudge available");
    }
}

// =============================================================================
// SQLite-backed router
// =============================================================================

#[tokio::test]
async fn test_full_flow_against_sqlite() {
    let pool = reframe_common::db::init_memory_database().await.unwrap();
    let app = setup_app_with(
        Arc::new(SqliteStorage::new(pool)),
        Arc::new(ScriptedModel),
        AuthSettings::with_secret(SECRET, Duration::from_secs(3600)),
    );
    let token = token_for("sqlite-user");

    let (status, _) = send(
        &app,
        with_token(post_json("/api/analyze-problem", problem_body("Late nights")), &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        with_token(post_json("/api/journal-entry", json!({"content": "Slept at 2am"})), &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, history) = send(&app, with_token(get("/api/history"), &token)).await;
    assert_eq!(history["sessions"][0]["title"], "Late nights");

    let (_, journal) = send(&app, with_token(get("/api/journal"), &token)).await;
    assert_eq!(journal["entries"][0]["microAdvice"], "Take a short walk.");

    let (status, nudge) = send(&app, with_token(get("/api/nudges"), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(nudge["nudge"]["message"].is_string());
}

// =============================================================================
// Storage failures
// =============================================================================

/// Accepts identities, fails every other operation
struct BrokenStorage;

fn broken<T>() -> reframe_common::Result<T> {
    Err(reframe_common::Error::Internal("database is locked".to_string()))
}

#[async_trait]
impl Storage for BrokenStorage {
    async fn get_user(&self, _id: i64) -> reframe_common::Result<Option<User>> {
        broken()
    }
    async fn get_user_by_username(&self, _username: &str) -> reframe_common::Result<Option<User>> {
        broken()
    }
    async fn create_user(&self, _user: NewUser) -> reframe_common::Result<User> {
        broken()
    }
    async fn ensure_user(&self, id: i64, username: &str) -> reframe_common::Result<User> {
        Ok(User {
            id,
            username: username.to_string(),
            password: String::new(),
        })
    }
    async fn create_session(&self, _session: NewSession) -> reframe_common::Result<Session> {
        broken()
    }
    async fn get_sessions_by_user_id(&self, _user_id: i64) -> reframe_common::Result<Vec<Session>> {
        broken()
    }
    async fn get_session(&self, _id: i64) -> reframe_common::Result<Option<Session>> {
        broken()
    }
    async fn create_journal_entry(&self, _entry: NewJournalEntry) -> reframe_common::Result<JournalEntry> {
        broken()
    }
    async fn get_journal_entries_by_user_id(
        &self,
        _user_id: i64,
    ) -> reframe_common::Result<Vec<JournalEntry>> {
        broken()
    }
    async fn update_journal_entry(
        &self,
        _id: i64,
        _updates: JournalEntryUpdate,
    ) -> reframe_common::Result<Option<JournalEntry>> {
        broken()
    }
    async fn get_todays_nudge(&self) -> reframe_common::Result<Option<Nudge>> {
        broken()
    }
    async fn create_nudge(&self, _nudge: NewNudge) -> reframe_common::Result<Nudge> {
        broken()
    }
    async fn get_random_nudge(&self) -> reframe_common::Result<Option<Nudge>> {
        broken()
    }
}

#[tokio::test]
async fn test_storage_failures_return_operation_message() {
    let app = setup_app_with(
        Arc::new(BrokenStorage),
        Arc::new(ScriptedModel),
        AuthSettings::disabled(),
    );

    let cases = [
        (get("/api/history"), "Failed to fetch history"),
        (get("/api/journal"), "Failed to fetch journal entries"),
        (get("/api/nudges"), "Failed to fetch nudge"),
        (post_json("/api/nudges/random", json!({})), "Failed to fetch nudge"),
        (
            post_json("/api/analyze-problem", problem_body("p")),
            "Failed to analyze problem",
        ),
        (
            post_json("/api/journal-entry", json!({"content": "c"})),
            "Failed to create journal entry",
        ),
    ];

    for (request, message) in cases {
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], message);
    }
}
