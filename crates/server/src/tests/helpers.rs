// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{AppContext, AppState, build_router};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use operativos::{DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME, State};
use operativos_persistence::{Persistence, RecordStore};
use serde_json::{Value, json};
use std::sync::Arc;
use time::Duration;
use tokio::sync::Mutex;
use tower::ServiceExt;

/// Helper to create app state over a seeded in-memory store.
pub fn create_test_app_state() -> AppState {
    let mut persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    let state: State = persistence.ensure_seeded().expect("Failed to seed database");
    AppState {
        context: Arc::new(Mutex::new(AppContext { persistence, state })),
        timezone: chrono_tz::America::Mexico_City,
        session_lifetime: Duration::days(30),
    }
}

pub fn create_test_app() -> Router {
    build_router(create_test_app_state())
}

/// Sends a request and returns the raw response.
pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request: Request<Body> = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

/// Sends a request and decodes the JSON body. Non-JSON bodies decode to `Null`.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response: Response = send_raw(app, method, uri, token, body).await;
    let status: StatusCode = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

pub async fn login_as(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["session_token"].as_str().unwrap().to_string()
}

pub async fn login_admin(app: &Router) -> String {
    login_as(app, DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD).await
}

/// Creates a user through the API as `admin_token` and logs them in.
pub async fn create_and_login(
    app: &Router,
    admin_token: &str,
    username: &str,
    role: &str,
    region: Option<&str>,
) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/users",
        Some(admin_token),
        Some(json!({
            "full_name": format!("Usuario {username}"),
            "username": username,
            "password": "clave123",
            "role": role,
            "assigned_region": region,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create user failed: {body}");
    login_as(app, username, "clave123").await
}

pub fn operative_draft(operative_type: &str, region: &str) -> Value {
    json!({
        "type": operative_type,
        "region": region,
        "quadrant": "C-1",
        "shift": "PRIMERO",
        "location": {
            "latitude": 19.4326,
            "longitude": -99.1332,
            "colony": "Centro",
            "street": "Madero",
            "corner": "Bolívar"
        },
        "units": [{
            "id": "u-1",
            "type": "PATRULLA",
            "unitNumber": "P-101",
            "inCharge": "Juan Pérez",
            "rank": "Policía",
            "personnelCount": 2
        }]
    })
}

/// Creates an operative and returns its id.
pub async fn create_operative(
    app: &Router,
    token: &str,
    operative_type: &str,
    region: &str,
) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/operatives",
        Some(token),
        Some(operative_draft(operative_type, region)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create operative failed: {body}");
    body["id"].as_str().unwrap().to_string()
}

/// Sends GET `/session` with a raw `Authorization` header value.
pub async fn session_status_with_header(app: &Router, value: &str) -> StatusCode {
    let request: Request<Body> = Request::builder()
        .method("GET")
        .uri("/session")
        .header("Authorization", value)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap().status()
}
