//! In-process fake of the backend, relay and classifier.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use greenworld_client::ClientConfig;
use serde_json::{json, Value};

pub const EMAIL: &str = "lan@example.com";
pub const PASSWORD: &str = "secret";
pub const LOCKED_EMAIL: &str = "locked@example.com";
pub const USER_ID: u64 = 42;
const SESSION_COOKIE: &str = "_greenworld_session=abc123";

/// What the fake saw.
#[derive(Debug, Default)]
pub struct Recorded {
    pub subscribe_frames: Vec<String>,
    pub cable_closed: usize,
    pub marked_read: Vec<u64>,
    pub user_name: String,
    pub signed_out: bool,
}

#[derive(Clone)]
struct FakeState {
    recorded: Arc<Mutex<Recorded>>,
    script: Arc<Vec<String>>,
}

pub struct Backend {
    pub addr: SocketAddr,
    recorded: Arc<Mutex<Recorded>>,
}

impl Backend {
    pub fn config(&self) -> ClientConfig {
        let origin = format!("http://{}", self.addr);
        ClientConfig::new(&origin, &origin).expect("valid origin")
    }

    pub fn recorded(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap()
    }
}

/// Start a fake whose relay sends `script` right after the subscribe command.
pub async fn spawn_backend(script: Vec<&str>) -> Backend {
    let recorded = Arc::new(Mutex::new(Recorded {
        user_name: "Lan".to_string(),
        ..Recorded::default()
    }));
    let state = FakeState {
        recorded: recorded.clone(),
        script: Arc::new(script.into_iter().map(str::to_string).collect()),
    };

    let app = Router::new()
        .route("/users/sign_in", post(sign_in))
        .route("/users/sign_out", delete(sign_out))
        .route("/users", post(sign_up))
        .route("/user", get(current_user).put(update_user))
        .route("/wastes", get(list_wastes).post(create_waste))
        .route("/notifications", get(list_notifications))
        .route("/notifications/{id}", put(mark_read))
        .route("/predict", post(predict))
        .route("/cable", get(cable))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Backend { addr, recorded }
}

/// Poll `check` until it holds, failing the test after a few seconds.
pub async fn eventually(mut check: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !check() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

pub fn user_json(name: &str) -> Value {
    json!({
        "id": USER_ID,
        "name": name,
        "email": EMAIL,
        "location": "Da Nang",
        "points": 120,
        "role": "user",
        "recycling_goal": "15.0",
        "unread_notifications_count": 2
    })
}

fn has_session(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|cookies| cookies.contains(SESSION_COOKIE))
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": "unauthorized" }))).into_response()
}

async fn sign_in(State(state): State<FakeState>, Json(body): Json<Value>) -> Response {
    let email = body["user"]["email"].as_str().unwrap_or_default();
    let password = body["user"]["password"].as_str().unwrap_or_default();
    let name = state.recorded.lock().unwrap().user_name.clone();

    match (email, password) {
        (EMAIL, PASSWORD) => (
            [(header::SET_COOKIE, format!("{SESSION_COOKIE}; Path=/"))],
            Json(json!({ "success": true, "user": user_json(&name) })),
        )
            .into_response(),
        (LOCKED_EMAIL, _) => {
            Json(json!({ "success": false, "errors": { "base": "Account locked" } }))
                .into_response()
        }
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Invalid email or password." })),
        )
            .into_response(),
    }
}

async fn sign_out(State(state): State<FakeState>) -> StatusCode {
    state.recorded.lock().unwrap().signed_out = true;
    StatusCode::NO_CONTENT
}

async fn sign_up(Json(body): Json<Value>) -> Response {
    let user = &body["user"];
    if user["email"] == "boom@example.com" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    if user["name"].as_str().unwrap_or_default().is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "errors": { "name": ["can't be blank"] } })),
        )
            .into_response();
    }
    (StatusCode::CREATED, Json(json!({ "id": 5 }))).into_response()
}

async fn current_user(State(state): State<FakeState>, headers: HeaderMap) -> Response {
    if !has_session(&headers) {
        return unauthorized();
    }
    let name = state.recorded.lock().unwrap().user_name.clone();
    Json(json!({ "user": user_json(&name) })).into_response()
}

async fn update_user(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !has_session(&headers) {
        return unauthorized();
    }
    let user = &body["user"];
    if user["email"].as_str().unwrap_or_default().is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "errors": { "email": ["can't be blank"] } })),
        )
            .into_response();
    }
    if let Some(name) = user["name"].as_str() {
        state.recorded.lock().unwrap().user_name = name.to_string();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn list_wastes() -> Json<Value> {
    Json(json!({
        "wastes": [
            { "id": 1, "waste_type": "paper", "status": "processed", "created_at": null },
            { "id": 2, "waste_type": "glass", "status": "sorting_line_b", "image_url": "/img/2.jpg" },
            { "id": 5, "waste_type": null, "status": "pending", "image_url": null }
        ]
    }))
}

async fn create_waste(Json(body): Json<Value>) -> Response {
    let image = body["waste"]["image"].as_str().unwrap_or_default();
    if !image.starts_with("data:image/jpeg;base64,") {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "image missing" })))
            .into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({ "id": 3, "waste_type": "", "status": "pending" })),
    )
        .into_response()
}

async fn list_notifications() -> Json<Value> {
    Json(json!([
        { "id": 1, "title": "Welcome", "body": "Thanks for joining", "read": false, "created_at": "2025-05-01T10:00:00Z" },
        { "id": 2, "title": "Points", "body": "+10 points", "read": true, "created_at": "2025-04-30T08:00:00Z" }
    ]))
}

async fn mark_read(State(state): State<FakeState>, Path(id): Path<u64>) -> Response {
    if id == 404 {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response();
    }
    state.recorded.lock().unwrap().marked_read.push(id);
    Json(json!({ "id": id, "read": true })).into_response()
}

async fn predict(Json(body): Json<Value>) -> Response {
    let image = body["image"].as_str().unwrap_or_default();
    if !image.starts_with("data:image/jpeg;base64,") {
        return (StatusCode::BAD_REQUEST, Json(json!({ "detail": "bad image" }))).into_response();
    }
    Json(json!({ "types": ["plastic", "bottle"], "image": "data:image/jpeg;base64,AAAA" }))
        .into_response()
}

async fn cable(ws: WebSocketUpgrade, State(state): State<FakeState>) -> Response {
    ws.on_upgrade(move |socket| relay(socket, state))
}

async fn relay(mut socket: WebSocket, state: FakeState) {
    let _ = socket
        .send(Message::Text(r#"{"type":"welcome"}"#.into()))
        .await;

    loop {
        match socket.recv().await {
            Some(Ok(Message::Text(text))) => {
                state
                    .recorded
                    .lock()
                    .unwrap()
                    .subscribe_frames
                    .push(text.to_string());
                break;
            }
            Some(Ok(_)) => continue,
            _ => {
                state.recorded.lock().unwrap().cable_closed += 1;
                return;
            }
        }
    }

    for frame in state.script.iter() {
        if socket.send(Message::Text(frame.clone().into())).await.is_err() {
            break;
        }
    }

    while let Some(Ok(msg)) = socket.recv().await {
        if let Message::Close(_) = msg {
            break;
        }
    }
    state.recorded.lock().unwrap().cable_closed += 1;
}
