//! A minimal in-process stand-in for the platform backend.
//!
//! Binds to an ephemeral loopback port and serves just enough of the API
//! surface to exercise the client's auth pipeline: bearer-gated resource
//! routes, the login/refresh/profile endpoints, and a binary download. Every
//! route records what it saw so tests can assert on call counts and headers.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// How the mock answers `POST /auth/refresh`.
pub enum RefreshBehavior {
    /// Issue a fresh pair and start accepting its access token.
    Issue { access: String, refresh: String },
    /// Report the refresh token as revoked.
    Reject,
}

pub struct BackendState {
    /// The access token the protected routes accept. `None` rejects all.
    pub accepted_access: Mutex<Option<String>>,
    /// When set, protected routes answer 401 no matter which token arrives,
    /// even one freshly issued by the refresh endpoint.
    pub reject_all: AtomicBool,
    pub refresh_behavior: Mutex<RefreshBehavior>,
    pub refresh_calls: AtomicUsize,
    pub portfolio_calls: AtomicUsize,
    pub profile_calls: AtomicUsize,
    /// The Authorization header of every request to /portfolios, in order.
    pub seen_auth_headers: Mutex<Vec<Option<String>>>,
}

impl BackendState {
    pub fn new(accepted_access: Option<&str>, refresh_behavior: RefreshBehavior) -> Arc<Self> {
        Arc::new(Self {
            accepted_access: Mutex::new(accepted_access.map(str::to_string)),
            reject_all: AtomicBool::new(false),
            refresh_behavior: Mutex::new(refresh_behavior),
            refresh_calls: AtomicUsize::new(0),
            portfolio_calls: AtomicUsize::new(0),
            profile_calls: AtomicUsize::new(0),
            seen_auth_headers: Mutex::new(Vec::new()),
        })
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn portfolio_calls(&self) -> usize {
        self.portfolio_calls.load(Ordering::SeqCst)
    }

    pub fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        if self.reject_all.load(Ordering::SeqCst) {
            return false;
        }
        let accepted = self.accepted_access.lock().unwrap();
        match accepted.as_deref() {
            Some(token) => {
                headers
                    .get("authorization")
                    .and_then(|value| value.to_str().ok())
                    == Some(&format!("Bearer {token}"))
            }
            None => false,
        }
    }
}

/// Starts the mock backend and returns its base URL.
pub async fn spawn(state: Arc<BackendState>) -> String {
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/profile", get(profile))
        .route("/auth/logout", post(logout))
        .route("/portfolios", get(portfolios))
        .route("/reports/:id/download", get(download))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn user_json() -> Value {
    json!({
        "id": "7b7f6a2e-5b0e-4f6a-9f2a-0c9d1c2b3a4d",
        "email": "trader@example.com",
        "displayName": "Test Trader",
        "role": "TRADER",
        "createdAt": "2025-01-15T09:30:00Z"
    })
}

fn ok_envelope(data: Value) -> Json<Value> {
    Json(json!({ "success": true, "message": "", "data": data }))
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "message": "access token expired" })),
    )
}

async fn login(State(state): State<Arc<BackendState>>, Json(body): Json<Value>) -> Json<Value> {
    if body["password"] == "hunter2" {
        let pair = ("acc-login", "ref-login");
        *state.accepted_access.lock().unwrap() = Some(pair.0.to_string());
        ok_envelope(json!({
            "accessToken": pair.0,
            "refreshToken": pair.1,
            "user": user_json(),
        }))
    } else {
        Json(json!({ "success": false, "message": "invalid credentials" }))
    }
}

async fn refresh(State(state): State<Arc<BackendState>>, Json(_body): Json<Value>) -> Json<Value> {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    let behavior = state.refresh_behavior.lock().unwrap();
    match &*behavior {
        RefreshBehavior::Issue { access, refresh } => {
            *state.accepted_access.lock().unwrap() = Some(access.clone());
            ok_envelope(json!({ "accessToken": access, "refreshToken": refresh }))
        }
        RefreshBehavior::Reject => {
            Json(json!({ "success": false, "message": "refresh token revoked" }))
        }
    }
}

async fn profile(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.profile_calls.fetch_add(1, Ordering::SeqCst);
    if !state.authorized(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, ok_envelope(user_json()))
}

async fn logout(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, ok_envelope(Value::Null))
}

async fn portfolios(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.portfolio_calls.fetch_add(1, Ordering::SeqCst);
    state.seen_auth_headers.lock().unwrap().push(
        headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
    );
    if !state.authorized(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, ok_envelope(json!([])))
}

async fn download(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
) -> Result<Vec<u8>, StatusCode> {
    if !state.authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(b"%PDF-1.7 report body".to_vec())
}
