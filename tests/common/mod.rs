#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use ahadi_client::config::ApiConfig;
use ahadi_client::storage::{MemoryStore, SharedStore};
use ahadi_client::ApiClient;

pub const FRESH_ACCESS: &str = "a-fresh";
pub const STALE_ACCESS: &str = "a-stale";
pub const VALID_REFRESH: &str = "r-valid";

/// Knobs and counters shared between a test and its mock backend.
pub struct MockState {
    pub accepted_access: Mutex<String>,
    pub refresh_ok: AtomicBool,
    pub reject_everything: AtomicBool,
    pub fail_public_events: AtomicBool,
    pub refresh_calls: AtomicUsize,
    pub me_calls: AtomicUsize,
    pub me_patch_calls: AtomicUsize,
    pub public_queries: Mutex<Vec<HashMap<String, String>>>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            accepted_access: Mutex::new(FRESH_ACCESS.to_string()),
            refresh_ok: AtomicBool::new(true),
            reject_everything: AtomicBool::new(false),
            fail_public_events: AtomicBool::new(false),
            refresh_calls: AtomicUsize::new(0),
            me_calls: AtomicUsize::new(0),
            me_patch_calls: AtomicUsize::new(0),
            public_queries: Mutex::new(Vec::new()),
        }
    }
}

impl MockState {
    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn me_calls(&self) -> usize {
        self.me_calls.load(Ordering::SeqCst)
    }

    pub fn me_patch_calls(&self) -> usize {
        self.me_patch_calls.load(Ordering::SeqCst)
    }

    pub fn last_public_query(&self) -> Option<HashMap<String, String>> {
        self.public_queries.lock().unwrap().last().cloned()
    }

    pub fn public_query_count(&self) -> usize {
        self.public_queries.lock().unwrap().len()
    }
}

pub struct MockBackend {
    pub port: u16,
    pub api_url: String,
    pub state: Arc<MockState>,
}

impl MockBackend {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(MockState::default()).await
    }

    pub async fn spawn_with(state: MockState) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let state = Arc::new(state);

        let app = Router::new()
            .route("/health", get(|| async { "ok" }))
            .route("/api/auth/token/refresh/", post(refresh))
            .route("/api/auth/me/", get(me).patch(update_me))
            .route("/api/events/public_events/", get(public_events))
            .route("/api/events/:id/", delete(delete_event))
            .route("/api/event-types/", get(event_types))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind mock backend")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let backend = Self {
            port,
            api_url: format!("http://127.0.0.1:{}/api", port),
            state,
        };
        backend.wait_ready(Duration::from_secs(5)).await?;
        Ok(backend)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        let url = format!("http://127.0.0.1:{}/health", self.port);
        while Instant::now() < deadline {
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status().is_success() {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("mock backend did not become ready on port {} within {:?}", self.port, timeout)
    }

    /// Client against this backend over a fresh in-memory store.
    pub fn client(&self) -> Result<(Arc<ApiClient>, SharedStore)> {
        let store = MemoryStore::shared();
        let client = ApiClient::new(ApiConfig::with_base_url(&self.api_url), store.clone())?;
        Ok((Arc::new(client), store))
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Given token not valid for any token type", "code": "token_not_valid"})),
    )
        .into_response()
}

async fn refresh(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    // Widen the window in which concurrent 401s pile up behind the refresh
    tokio::time::sleep(Duration::from_millis(50)).await;

    let ok = state.refresh_ok.load(Ordering::SeqCst) && body.get("refresh") == Some(&json!(VALID_REFRESH));
    if !ok {
        return unauthorized();
    }

    *state.accepted_access.lock().unwrap() = FRESH_ACCESS.to_string();
    Json(json!({"access": FRESH_ACCESS})).into_response()
}

async fn me(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.me_calls.fetch_add(1, Ordering::SeqCst);
    if state.reject_everything.load(Ordering::SeqCst) {
        return unauthorized();
    }

    if !is_authorized(&state, &headers) {
        return unauthorized();
    }
    Json(json!({"id": 1, "full_name": "Amina Juma", "phone": "255700000001"})).into_response()
}

fn is_authorized(state: &MockState, headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {}", state.accepted_access.lock().unwrap());
    headers.get("authorization").and_then(|v| v.to_str().ok()) == Some(expected.as_str())
}

/// Multipart profile update; reports which parts arrived so replays can be checked.
async fn update_me(State(state): State<Arc<MockState>>, headers: HeaderMap, body: Bytes) -> Response {
    state.me_patch_calls.fetch_add(1, Ordering::SeqCst);
    if !is_authorized(&state, &headers) {
        return unauthorized();
    }

    let multipart = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&body);
    Json(json!({
        "multipart": multipart,
        "has_name": body.contains("name=\"full_name\"") && body.contains("Amina Juma"),
        "has_file": body.contains("filename=\"me.png\"") && body.contains("PNGDATA"),
    }))
    .into_response()
}

fn event(id: i64, title: &str) -> Value {
    json!({"id": id, "title": title, "start_date": "2026-12-05", "status": "published"})
}

async fn public_events(
    State(state): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.public_queries.lock().unwrap().push(query.clone());
    if state.fail_public_events.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"detail": "boom"}))).into_response();
    }

    let page = query.get("page").map(String::as_str).unwrap_or("1");
    let body = match page {
        "1" => json!({
            "count": 3,
            "next": "http://backend/api/events/public_events/?page=2",
            "previous": null,
            "results": [event(1, "Harusi ya Juma"), event(2, "Send-off ya Neema")]
        }),
        "2" => json!({
            "count": 3,
            "next": null,
            "previous": "http://backend/api/events/public_events/?page=1",
            "results": [event(3, "Kitchen Party")]
        }),
        _ => return (StatusCode::NOT_FOUND, Json(json!({"detail": "Invalid page."}))).into_response(),
    };
    Json(body).into_response()
}

async fn event_types() -> Json<Value> {
    // This endpoint answers with a bare array instead of a paginated object
    Json(json!([
        {"id": 1, "name": "Wedding", "slug": "wedding"},
        {"id": 2, "name": "Send-off", "slug": "send-off"}
    ]))
}

async fn delete_event() -> StatusCode {
    StatusCode::NO_CONTENT
}
