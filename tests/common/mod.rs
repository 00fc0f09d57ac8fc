// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test helpers.
//!
//! [`FakeUpstream`] is a local axum server standing in for both Hevy and
//! Fitbit. It records every request and answers from per-endpoint queues of
//! scripted responses, falling back to a canned success.

#![allow(dead_code)]

use axum::{
    extract::{Form, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Router,
};
use hevy_fitbit_relay::config::Config;
use hevy_fitbit_relay::db::FirestoreTokenStore;
use hevy_fitbit_relay::routes::create_router;
use hevy_fitbit_relay::AppState;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

pub const TOKEN_PATH: &str = "/oauth2/token";
pub const ACTIVITY_PATH: &str = "/1/user/-/activities.json";
pub const WORKOUTS_PATH: &str = "/v1/workouts";

/// Token pair handed out by the fake token endpoint.
pub const FRESH_ACCESS_TOKEN: &str = "fresh-access-token";
pub const FRESH_REFRESH_TOKEN: &str = "fresh-refresh-token";

/// Check if emulator is available via environment variable.
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a Firestore token store against the emulator.
pub async fn test_firestore_store() -> FirestoreTokenStore {
    FirestoreTokenStore::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// A request as seen by the fake upstream.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub api_key: Option<String>,
    /// Form fields (token endpoint) or query parameters (activity endpoint)
    pub params: HashMap<String, String>,
}

impl RecordedRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

#[derive(Default)]
pub struct FakeState {
    responses: Mutex<HashMap<&'static str, VecDeque<(StatusCode, String)>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeState {
    fn record(&self, path: String, headers: &HeaderMap, params: HashMap<String, String>) {
        let header_str = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        self.requests.lock().unwrap().push(RecordedRequest {
            path,
            authorization: header_str(header::AUTHORIZATION.as_str()),
            api_key: header_str("api-key"),
            params,
        });
    }

    fn next_response(
        &self,
        endpoint: &'static str,
        default: fn() -> String,
    ) -> (StatusCode, String) {
        self.responses
            .lock()
            .unwrap()
            .get_mut(endpoint)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| (StatusCode::OK, default()))
    }
}

/// Local stand-in for the Hevy and Fitbit APIs.
pub struct FakeUpstream {
    pub base_url: String,
    state: Arc<FakeState>,
}

impl FakeUpstream {
    /// Start the fake on an ephemeral port.
    pub async fn spawn() -> Self {
        let state = Arc::new(FakeState::default());

        let app = Router::new()
            .route(TOKEN_PATH, post(token_endpoint))
            .route(ACTIVITY_PATH, post(activity_endpoint))
            .route("/v1/workouts/{id}", get(workout_endpoint))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake upstream");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Queue a response for the next request to `endpoint`.
    pub fn push_response(&self, endpoint: &'static str, status: StatusCode, body: &str) {
        self.state
            .responses
            .lock()
            .unwrap()
            .entry(endpoint)
            .or_default()
            .push_back((status, body.to_string()));
    }

    /// Requests whose path starts with `prefix`, in arrival order.
    pub fn requests_to(&self, prefix: &str) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path.starts_with(prefix))
            .cloned()
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    /// Config pointing every upstream URL at this fake, in UTC.
    pub fn config(&self) -> Config {
        Config {
            hevy_workouts_url: format!("{}{}", self.base_url, WORKOUTS_PATH),
            fitbit_token_url: format!("{}{}", self.base_url, TOKEN_PATH),
            fitbit_activity_url: format!("{}{}", self.base_url, ACTIVITY_PATH),
            target_timezone: chrono_tz::Tz::UTC,
            ..Config::default()
        }
    }
}

/// Serve one connection whose response promises a longer body than it sends.
/// Returns the URL to point a client at.
pub async fn spawn_truncated_body_server(status_line: &'static str) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind truncated-body server");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        // Consume the whole request so closing the socket is a clean FIN.
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request);
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or(0);
                if request.len() >= end + 4 + content_length {
                    break;
                }
            }
        }

        let response = format!("{status_line}\r\nContent-Length: 100\r\n\r\npartial");
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    format!("http://{}", addr)
}

/// HTTP client that ignores proxy settings from the environment.
pub fn test_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("Failed to build HTTP client")
}

/// Create a test app wired to the given config and store.
/// Returns the router and the shared state.
pub fn create_test_app<S: hevy_fitbit_relay::db::TokenStore>(
    config: Config,
    store: S,
) -> (Router, Arc<AppState<S>>) {
    let state = Arc::new(AppState::with_http_client(config, store, test_http_client()));
    (create_router(state.clone()), state)
}

pub fn default_token_response() -> String {
    serde_json::json!({
        "access_token": FRESH_ACCESS_TOKEN,
        "refresh_token": FRESH_REFRESH_TOKEN,
        "expires_in": 28800,
        "scope": "activity",
        "token_type": "Bearer",
        "user_id": "ABC123"
    })
    .to_string()
}

pub fn default_activity_response() -> String {
    serde_json::json!({
        "activityLog": {
            "activityId": 2050,
            "name": "Weight lifting",
            "duration": 2634000
        }
    })
    .to_string()
}

pub fn default_workout_response() -> String {
    serde_json::json!({
        "id": "123",
        "title": "Push Day",
        "description": "",
        "start_time": "2025-07-04T05:41:12+00:00",
        "end_time": "2025-07-04T06:25:06+00:00",
        "is_private": false,
        "exercises": [{
            "exercise_template_id": "79D0BB3A",
            "superset_id": null,
            "notes": "",
            "sets": [{
                "type": "normal",
                "weight_kg": 60.0,
                "reps": 8,
                "distance_meters": null,
                "duration_seconds": null,
                "custom_metric": null,
                "rpe": null
            }]
        }]
    })
    .to_string()
}

async fn token_endpoint(
    State(fake): State<Arc<FakeState>>,
    headers: HeaderMap,
    Form(params): Form<HashMap<String, String>>,
) -> (StatusCode, String) {
    fake.record(TOKEN_PATH.to_string(), &headers, params);
    fake.next_response(TOKEN_PATH, default_token_response)
}

async fn activity_endpoint(
    State(fake): State<Arc<FakeState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    fake.record(ACTIVITY_PATH.to_string(), &headers, params);
    fake.next_response(ACTIVITY_PATH, default_activity_response)
}

async fn workout_endpoint(
    State(fake): State<Arc<FakeState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    fake.record(format!("{}/{}", WORKOUTS_PATH, id), &headers, HashMap::new());
    fake.next_response(WORKOUTS_PATH, default_workout_response)
}
