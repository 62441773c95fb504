// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process fake of the workout service, served over real HTTP so the
//! client is exercised end to end.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use workout_tracker::config::Config;
use workout_tracker::storage::{MemoryTokenStore, TokenStore};
use workout_tracker::AppContext;

#[allow(dead_code)]
pub const EMAIL: &str = "runner@example.com";
#[allow(dead_code)]
pub const PASSWORD: &str = "hunter22";

#[derive(Default)]
struct FakeState {
    /// email -> (user id, password)
    users: HashMap<String, (String, String)>,
    /// token -> user id
    tokens: HashMap<String, String>,
    /// user id -> workouts, stored as raw JSON like the real service
    workouts: HashMap<String, Vec<Value>>,
    /// endpoint -> (forced error status, requests answered normally first)
    failures: HashMap<&'static str, (u16, usize)>,
    /// endpoint -> delay before answering
    delays: HashMap<&'static str, Duration>,
    requests: HashMap<&'static str, usize>,
    next_id: u64,
}

impl FakeState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{}", prefix, self.next_id)
    }

    fn hit(&mut self, endpoint: &'static str) -> Option<Response> {
        let count = self.requests.entry(endpoint).or_default();
        *count += 1;
        let count = *count;

        self.failures
            .get(endpoint)
            .filter(|&&(_, after)| count > after)
            .map(|&(status, _)| {
                error(
                    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                    "Forced failure",
                )
            })
    }

    fn user_for(&self, headers: &HeaderMap) -> Result<String, Response> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Authentication failed"))?;

        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Authentication failed"))
    }
}

/// Handle to a running fake service.
#[derive(Clone)]
pub struct FakeService {
    state: Arc<Mutex<FakeState>>,
    pub base_url: String,
}

#[allow(dead_code)]
impl FakeService {
    /// Bind on an ephemeral port and start serving.
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake service");
        let addr = listener.local_addr().expect("No local address");

        let service = Self {
            state: Arc::new(Mutex::new(FakeState::default())),
            base_url: format!("http://{}", addr),
        };

        let app = Router::new()
            .route("/users/register", post(register))
            .route("/users/login", post(login))
            .route("/users/profile", get(profile))
            .route("/workouts/getMyWorkouts", get(get_my_workouts))
            .route("/workouts/addWorkout", post(add_workout))
            .route("/workouts/deleteWorkout/{id}", delete(delete_workout))
            .route("/workouts/completeWorkoutStatus/{id}", patch(complete_workout))
            .route("/workouts/updateWorkout/{id}", patch(update_workout))
            .with_state(service.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Fake service failed");
        });

        service
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().expect("Fake state poisoned")
    }

    /// Create an account directly, returning the user id.
    pub fn add_user(&self, email: &str, password: &str) -> String {
        let mut state = self.state();
        let id = state.next_id("user-");
        state
            .users
            .insert(email.to_string(), (id.clone(), password.to_string()));
        id
    }

    /// Mint a token for an existing account without going through login.
    pub fn issue_token(&self, email: &str) -> String {
        let mut state = self.state();
        let (user_id, _) = state.users.get(email).cloned().expect("Unknown user");
        let token = state.next_id("token-");
        state.tokens.insert(token.clone(), user_id);
        token
    }

    /// Insert a workout as raw JSON for `email`, returning its id.
    pub fn seed(&self, email: &str, name: &str, duration: Value, status: &str) -> String {
        let mut state = self.state();
        let (user_id, _) = state.users.get(email).cloned().expect("Unknown user");
        let id = state.next_id("w-");
        let workout = json!({
            "_id": id,
            "userId": user_id,
            "name": name,
            "duration": duration,
            "status": status,
            "dateAdded": "2026-01-05T10:00:00.000Z",
        });
        state.workouts.entry(user_id).or_default().push(workout);
        id
    }

    /// Invalidate every token the service has issued.
    pub fn revoke_all_tokens(&self) {
        self.state().tokens.clear();
    }

    /// Make every call to `endpoint` fail with `status`.
    pub fn fail(&self, endpoint: &'static str, status: u16) {
        self.fail_after(endpoint, status, 0);
    }

    /// Answer the next `after` calls to `endpoint` normally, then fail with
    /// `status`.
    pub fn fail_after(&self, endpoint: &'static str, status: u16, after: usize) {
        let mut state = self.state();
        let seen = state.requests.get(endpoint).copied().unwrap_or(0);
        state.failures.insert(endpoint, (status, seen + after));
    }

    /// Hold every response from `endpoint` back by `delay`.
    pub fn slow(&self, endpoint: &'static str, delay: Duration) {
        self.state().delays.insert(endpoint, delay);
    }

    pub fn recover(&self, endpoint: &'static str) {
        self.state().failures.remove(endpoint);
    }

    /// How many requests `endpoint` has received.
    pub fn count(&self, endpoint: &'static str) -> usize {
        self.state().requests.get(endpoint).copied().unwrap_or(0)
    }

    /// Raw stored workouts for `email`.
    pub fn workouts_of(&self, email: &str) -> Vec<Value> {
        let state = self.state();
        let (user_id, _) = state.users.get(email).cloned().expect("Unknown user");
        state.workouts.get(&user_id).cloned().unwrap_or_default()
    }

    /// Client context against this service with the given token store.
    pub fn context(&self, tokens: Arc<dyn TokenStore>) -> AppContext {
        let config = Config::new(
            self.base_url.clone(),
            std::env::temp_dir().join("tracked-tests"),
            Duration::from_secs(5),
        )
        .expect("Invalid test config");
        AppContext::new(config, tokens).expect("Failed to build context")
    }

    /// Register the standard account, store a valid token for it and restore
    /// a session from that token.
    pub async fn signed_in(&self) -> (AppContext, Arc<MemoryTokenStore>) {
        self.add_user(EMAIL, PASSWORD);
        let token = self.issue_token(EMAIL);
        let store = Arc::new(MemoryTokenStore::with_token(token));
        let ctx = self.context(store.clone());
        let session = ctx.session.restore().await;
        assert!(session.is_authenticated(), "Seeded token should restore");
        (ctx, store)
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn str_field<'a>(body: &'a Value, field: &str) -> &'a str {
    body.get(field).and_then(Value::as_str).unwrap_or_default()
}

// ─── Handlers ────────────────────────────────────────────────

async fn register(State(svc): State<FakeService>, Json(body): Json<Value>) -> Response {
    let mut state = svc.state();
    if let Some(failure) = state.hit("register") {
        return failure;
    }

    let email = str_field(&body, "email").to_string();
    let password = str_field(&body, "password").to_string();
    if state.users.contains_key(&email) {
        return error(StatusCode::CONFLICT, "Email already registered");
    }

    let id = state.next_id("user-");
    state.users.insert(email, (id, password));
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Registered successfully!" })),
    )
        .into_response()
}

async fn login(State(svc): State<FakeService>, Json(body): Json<Value>) -> Response {
    let mut state = svc.state();
    if let Some(failure) = state.hit("login") {
        return failure;
    }

    let Some((user_id, password)) = state.users.get(str_field(&body, "email")).cloned() else {
        return error(StatusCode::NOT_FOUND, "No email found");
    };
    if password != str_field(&body, "password") {
        return error(StatusCode::UNAUTHORIZED, "Incorrect email or password");
    }

    let token = state.next_id("token-");
    state.tokens.insert(token.clone(), user_id);
    Json(json!({ "access": token })).into_response()
}

async fn profile(State(svc): State<FakeService>, headers: HeaderMap) -> Response {
    let mut state = svc.state();
    if let Some(failure) = state.hit("profile") {
        return failure;
    }

    let user_id = match state.user_for(&headers) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let email = state
        .users
        .iter()
        .find(|(_, (id, _))| *id == user_id)
        .map(|(email, _)| email.clone());

    Json(json!({
        "user": { "_id": user_id, "email": email, "isAdmin": false }
    }))
    .into_response()
}

async fn get_my_workouts(State(svc): State<FakeService>, headers: HeaderMap) -> Response {
    let delay = svc.state().delays.get("list").copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let mut state = svc.state();
    if let Some(failure) = state.hit("list") {
        return failure;
    }

    let user_id = match state.user_for(&headers) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let workouts = state.workouts.get(&user_id).cloned().unwrap_or_default();
    Json(json!({ "workouts": workouts })).into_response()
}

async fn add_workout(
    State(svc): State<FakeService>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = svc.state();
    if let Some(failure) = state.hit("add") {
        return failure;
    }

    let user_id = match state.user_for(&headers) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let id = state.next_id("w-");
    let workout = json!({
        "_id": id,
        "userId": user_id,
        "name": body["name"],
        "duration": body["duration"],
        "status": body["status"],
        "dateAdded": "2026-01-06T08:30:00.000Z",
    });
    state
        .workouts
        .entry(user_id)
        .or_default()
        .push(workout.clone());

    (
        StatusCode::CREATED,
        Json(json!({ "message": "Workout added", "workout": workout })),
    )
        .into_response()
}

/// Apply `change` to the caller's workout `id`, or answer 404.
fn with_workout(
    state: &mut FakeState,
    headers: &HeaderMap,
    id: &str,
    change: impl FnOnce(&mut Vec<Value>, usize) -> Value,
) -> Response {
    let user_id = match state.user_for(headers) {
        Ok(user_id) => user_id,
        Err(resp) => return resp,
    };
    let workouts = state.workouts.entry(user_id).or_default();
    match workouts.iter().position(|w| w["_id"] == id) {
        Some(index) => Json(change(workouts, index)).into_response(),
        None => error(StatusCode::NOT_FOUND, "Workout not found"),
    }
}

async fn delete_workout(
    State(svc): State<FakeService>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut state = svc.state();
    if let Some(failure) = state.hit("delete") {
        return failure;
    }

    with_workout(&mut state, &headers, &id, |workouts, index| {
        workouts.remove(index);
        json!({ "message": "Workout deleted successfully" })
    })
}

async fn complete_workout(
    State(svc): State<FakeService>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut state = svc.state();
    if let Some(failure) = state.hit("complete") {
        return failure;
    }

    with_workout(&mut state, &headers, &id, |workouts, index| {
        workouts[index]["status"] = json!("completed");
        json!({ "message": "Workout status updated", "workout": workouts[index] })
    })
}

async fn update_workout(
    State(svc): State<FakeService>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = svc.state();
    if let Some(failure) = state.hit("update") {
        return failure;
    }

    with_workout(&mut state, &headers, &id, |workouts, index| {
        workouts[index]["name"] = body["name"].clone();
        workouts[index]["duration"] = body["duration"].clone();
        json!({ "message": "Workout updated", "workout": workouts[index] })
    })
}
