// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

#[cfg(test)]
mod tests;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
};
use chrono::NaiveDateTime;
use chrono_tz::Tz;
use clap::Parser;
use operativos::{OperativeDraft, State};
use operativos_api::{
    ApiError, ApiResult, AuditQuery, AuditTrailResponse, AuthenticationService, CatalogEntryRequest,
    CatalogQuery, CatalogResponse, CreateUserRequest, EditUserRequest, ExportQuery,
    ListOperativesQuery, ListOperativesResponse, ListUsersResponse, LoginRequest, LoginResponse,
    MoveOperativeTypeRequest, MutationResponse, OperativeDetailResponse, OperativeStatistics,
    OperativeTypeRequest, PlaintextCredentials, StatisticsQuery, UpdatePasswordRequest,
    WhoAmIResponse, add_catalog_entry, add_operative_type, conclude_operative, create_operative,
    create_user, delete_operative, delete_user, edit_operative, edit_user, export_operatives,
    get_operative, get_statistics, list_audit_trail, list_catalog, list_operatives, list_users,
    login, logout, move_operative_type, remove_catalog_entry, remove_operative_type,
    update_password, whoami,
};
use operativos_domain::{ClosureReport, OperativePatch, local_now};
use operativos_persistence::{Persistence, RecordStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::session::SessionUser;

/// Operativos Server - HTTP server for the operatives record system
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// IANA time zone in which the shift window and operative timestamps are computed
    #[arg(short, long, default_value = "America/Mexico_City")]
    timezone: String,

    /// Session lifetime in days
    #[arg(long, default_value_t = 30)]
    session_days: u32,
}

/// The store together with the state cached from it.
struct AppContext {
    /// The record store.
    persistence: Persistence,
    /// The cached application state. Replaced only after a store write succeeds.
    state: State,
}

impl AppContext {
    /// Adopts the state produced by a successful write and returns its response.
    fn accept<T>(&mut self, result: ApiResult<T>) -> T {
        self.state = result.new_state;
        result.response
    }
}

/// Application state shared across handlers.
///
/// The store and cached state sit behind one mutex so every request sees a
/// state that matches what the store accepted.
#[derive(Clone)]
struct AppState {
    context: Arc<Mutex<AppContext>>,
    /// Wall-clock zone for "now".
    timezone: Tz,
    /// Lifetime of new sessions.
    session_lifetime: Duration,
}

impl AppState {
    fn now(&self) -> NaiveDateTime {
        local_now(self.timezone)
    }
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidInput { .. } | ApiError::PasswordPolicyViolation { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::StoreFailure { .. } => {
                error!(error = %err, "Record store rejected the write");
                StatusCode::BAD_GATEWAY
            }
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Handler for POST `/login`.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    info!(username = %req.username, "Handling login request");

    let mut guard = app_state.context.lock().await;
    let context: &mut AppContext = &mut guard;
    let response: LoginResponse = login(
        &mut context.persistence,
        &PlaintextCredentials,
        &context.state,
        &req,
        app_state.session_lifetime,
    )?;
    drop(guard);

    info!(user_id = %response.user.id, "User logged in");
    Ok(Json(response))
}

/// Handler for POST `/logout`.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, token): SessionUser,
) -> Result<Json<MutationResponse>, HttpError> {
    let mut guard = app_state.context.lock().await;
    logout(&mut guard.persistence, &token)?;
    drop(guard);

    info!(user_id = %user.id, "User logged out");
    Ok(Json(MutationResponse {
        id: None,
        message: String::from("Logged out"),
    }))
}

/// Handler for GET `/session`.
#[allow(clippy::unused_async)]
async fn handle_whoami(SessionUser(user, _): SessionUser) -> Json<WhoAmIResponse> {
    Json(whoami(&user))
}

/// Handler for GET `/operatives`.
///
/// Lists the dashboard (current shift) or the history, scoped to what the
/// user may see.
async fn handle_list_operatives(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Query(query): Query<ListOperativesQuery>,
) -> Result<Json<ListOperativesResponse>, HttpError> {
    let now: NaiveDateTime = app_state.now();
    let guard = app_state.context.lock().await;
    let response: ListOperativesResponse = list_operatives(&guard.state, &user, &query, now)?;
    drop(guard);
    Ok(Json(response))
}

/// Handler for POST `/operatives`.
async fn handle_create_operative(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Json(draft): Json<OperativeDraft>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(
        user_id = %user.id,
        operative_type = %draft.operative_type,
        "Handling create_operative request"
    );

    let now: NaiveDateTime = app_state.now();
    let mut guard = app_state.context.lock().await;
    let context: &mut AppContext = &mut guard;
    let result: ApiResult<MutationResponse> =
        create_operative(&mut context.persistence, &context.state, &user, draft, now)?;
    Ok(Json(context.accept(result)))
}

/// Handler for GET `/operatives/{id}`.
async fn handle_get_operative(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Path(operative_id): Path<String>,
) -> Result<Json<OperativeDetailResponse>, HttpError> {
    let guard = app_state.context.lock().await;
    let response: OperativeDetailResponse = get_operative(&guard.state, &user, &operative_id)?;
    drop(guard);
    Ok(Json(response))
}

/// Handler for PATCH `/operatives/{id}`.
async fn handle_edit_operative(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Path(operative_id): Path<String>,
    Json(operative_patch): Json<OperativePatch>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(user_id = %user.id, operative_id = %operative_id, "Handling edit_operative request");

    let now: NaiveDateTime = app_state.now();
    let mut guard = app_state.context.lock().await;
    let context: &mut AppContext = &mut guard;
    let result: ApiResult<MutationResponse> = edit_operative(
        &mut context.persistence,
        &context.state,
        &user,
        &operative_id,
        operative_patch,
        now,
    )?;
    Ok(Json(context.accept(result)))
}

/// Handler for POST `/operatives/{id}/conclude`.
async fn handle_conclude_operative(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Path(operative_id): Path<String>,
    Json(report): Json<ClosureReport>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(
        user_id = %user.id,
        operative_id = %operative_id,
        result = %report.result,
        "Handling conclude_operative request"
    );

    let now: NaiveDateTime = app_state.now();
    let mut guard = app_state.context.lock().await;
    let context: &mut AppContext = &mut guard;
    let result: ApiResult<MutationResponse> = conclude_operative(
        &mut context.persistence,
        &context.state,
        &user,
        &operative_id,
        report,
        now,
    )?;
    Ok(Json(context.accept(result)))
}

/// Handler for DELETE `/operatives/{id}`.
async fn handle_delete_operative(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Path(operative_id): Path<String>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(user_id = %user.id, operative_id = %operative_id, "Handling delete_operative request");

    let now: NaiveDateTime = app_state.now();
    let mut guard = app_state.context.lock().await;
    let context: &mut AppContext = &mut guard;
    let result: ApiResult<MutationResponse> = delete_operative(
        &mut context.persistence,
        &context.state,
        &user,
        &operative_id,
        now,
    )?;
    Ok(Json(context.accept(result)))
}

/// Handler for GET `/users`.
async fn handle_list_users(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
) -> Result<Json<ListUsersResponse>, HttpError> {
    let guard = app_state.context.lock().await;
    let response: ListUsersResponse = list_users(&guard.state, &user)?;
    drop(guard);
    Ok(Json(response))
}

/// Handler for POST `/users`.
async fn handle_create_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(user_id = %user.id, username = %req.username, "Handling create_user request");

    let now: NaiveDateTime = app_state.now();
    let mut guard = app_state.context.lock().await;
    let context: &mut AppContext = &mut guard;
    let result: ApiResult<MutationResponse> =
        create_user(&mut context.persistence, &context.state, &user, req, now)?;
    Ok(Json(context.accept(result)))
}

/// Handler for PATCH `/users/{id}`.
async fn handle_edit_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Path(user_id): Path<String>,
    Json(req): Json<EditUserRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(user_id = %user.id, target_user_id = %user_id, "Handling edit_user request");

    let now: NaiveDateTime = app_state.now();
    let mut guard = app_state.context.lock().await;
    let context: &mut AppContext = &mut guard;
    let result: ApiResult<MutationResponse> = edit_user(
        &mut context.persistence,
        &context.state,
        &user,
        &user_id,
        req,
        now,
    )?;
    Ok(Json(context.accept(result)))
}

/// Handler for DELETE `/users/{id}`.
async fn handle_delete_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Path(user_id): Path<String>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(user_id = %user.id, target_user_id = %user_id, "Handling delete_user request");

    let now: NaiveDateTime = app_state.now();
    let mut guard = app_state.context.lock().await;
    let context: &mut AppContext = &mut guard;
    let result: ApiResult<MutationResponse> = delete_user(
        &mut context.persistence,
        &context.state,
        &user,
        &user_id,
        now,
    )?;
    Ok(Json(context.accept(result)))
}

/// Handler for PUT `/password`.
async fn handle_update_password(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Json(req): Json<UpdatePasswordRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(user_id = %user.id, "Handling update_password request");

    let now: NaiveDateTime = app_state.now();
    let mut guard = app_state.context.lock().await;
    let context: &mut AppContext = &mut guard;
    let result: ApiResult<MutationResponse> =
        update_password(&mut context.persistence, &context.state, &user, &req, now)?;
    Ok(Json(context.accept(result)))
}

/// Handler for GET `/catalog`.
///
/// The catalogs feed the creation form and need no session.
async fn handle_list_catalog(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Json<CatalogResponse> {
    let guard = app_state.context.lock().await;
    let response: CatalogResponse = list_catalog(&guard.state, &query);
    drop(guard);
    Json(response)
}

/// Handler for POST `/catalog/types`.
async fn handle_add_operative_type(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Json(req): Json<OperativeTypeRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(user_id = %user.id, name = %req.name, "Handling add_operative_type request");

    let now: NaiveDateTime = app_state.now();
    let mut guard = app_state.context.lock().await;
    let context: &mut AppContext = &mut guard;
    let result: ApiResult<MutationResponse> =
        add_operative_type(&mut context.persistence, &context.state, &user, req, now)?;
    Ok(Json(context.accept(result)))
}

/// Handler for DELETE `/catalog/types/{name}`.
async fn handle_remove_operative_type(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Path(name): Path<String>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(user_id = %user.id, name = %name, "Handling remove_operative_type request");

    let now: NaiveDateTime = app_state.now();
    let mut guard = app_state.context.lock().await;
    let context: &mut AppContext = &mut guard;
    let result: ApiResult<MutationResponse> = remove_operative_type(
        &mut context.persistence,
        &context.state,
        &user,
        OperativeTypeRequest { name },
        now,
    )?;
    Ok(Json(context.accept(result)))
}

/// Handler for POST `/catalog/types/move`.
async fn handle_move_operative_type(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Json(req): Json<MoveOperativeTypeRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(
        user_id = %user.id,
        name = %req.name,
        direction = ?req.direction,
        "Handling move_operative_type request"
    );

    let now: NaiveDateTime = app_state.now();
    let mut guard = app_state.context.lock().await;
    let context: &mut AppContext = &mut guard;
    let result: ApiResult<MutationResponse> =
        move_operative_type(&mut context.persistence, &context.state, &user, req, now)?;
    Ok(Json(context.accept(result)))
}

/// Handler for POST `/catalog/colonies`.
async fn handle_add_catalog_entry(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Json(req): Json<CatalogEntryRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(user_id = %user.id, colony = %req.colony, "Handling add_catalog_entry request");

    let now: NaiveDateTime = app_state.now();
    let mut guard = app_state.context.lock().await;
    let context: &mut AppContext = &mut guard;
    let result: ApiResult<MutationResponse> =
        add_catalog_entry(&mut context.persistence, &context.state, &user, req, now)?;
    Ok(Json(context.accept(result)))
}

/// Handler for DELETE `/catalog/colonies`.
async fn handle_remove_catalog_entry(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Json(req): Json<CatalogEntryRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    info!(user_id = %user.id, colony = %req.colony, "Handling remove_catalog_entry request");

    let now: NaiveDateTime = app_state.now();
    let mut guard = app_state.context.lock().await;
    let context: &mut AppContext = &mut guard;
    let result: ApiResult<MutationResponse> =
        remove_catalog_entry(&mut context.persistence, &context.state, &user, req, now)?;
    Ok(Json(context.accept(result)))
}

/// Handler for GET `/export.csv`.
///
/// Returns the visible operatives as a UTF-8 (BOM-prefixed) CSV attachment.
async fn handle_export(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Query(query): Query<ExportQuery>,
) -> Result<Response, HttpError> {
    info!(user_id = %user.id, start = ?query.start, end = ?query.end, "Handling export request");

    let now: NaiveDateTime = app_state.now();
    let guard = app_state.context.lock().await;
    let csv: String = export_operatives(&guard.state, &user, query)?;
    drop(guard);

    let disposition: String = format!(
        "attachment; filename=\"OPERATIVOS_{}.csv\"",
        now.format("%Y-%m-%d")
    );
    Ok((
        [
            (header::CONTENT_TYPE, String::from("text/csv; charset=utf-8")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

/// Handler for GET `/statistics`.
async fn handle_statistics(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Query(query): Query<StatisticsQuery>,
) -> Result<Json<OperativeStatistics>, HttpError> {
    let guard = app_state.context.lock().await;
    let statistics: OperativeStatistics = get_statistics(&guard.state, &user, &query)?;
    drop(guard);
    Ok(Json(statistics))
}

/// Handler for GET `/audit`.
async fn handle_audit_trail(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Query(query): Query<AuditQuery>,
) -> Result<Json<AuditTrailResponse>, HttpError> {
    let mut guard = app_state.context.lock().await;
    let response: AuditTrailResponse = list_audit_trail(&mut guard.persistence, &user, &query)?;
    drop(guard);
    Ok(Json(response))
}

/// Builds the application router.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/login", post(handle_login))
        .route("/logout", post(handle_logout))
        .route("/session", get(handle_whoami))
        .route(
            "/operatives",
            get(handle_list_operatives).post(handle_create_operative),
        )
        .route(
            "/operatives/{id}",
            get(handle_get_operative)
                .patch(handle_edit_operative)
                .delete(handle_delete_operative),
        )
        .route("/operatives/{id}/conclude", post(handle_conclude_operative))
        .route("/users", get(handle_list_users).post(handle_create_user))
        .route(
            "/users/{id}",
            patch(handle_edit_user).delete(handle_delete_user),
        )
        .route("/password", put(handle_update_password))
        .route("/catalog", get(handle_list_catalog))
        .route("/catalog/types", post(handle_add_operative_type))
        .route("/catalog/types/move", post(handle_move_operative_type))
        .route("/catalog/types/{name}", delete(handle_remove_operative_type))
        .route(
            "/catalog/colonies",
            post(handle_add_catalog_entry).delete(handle_remove_catalog_entry),
        )
        .route("/export.csv", get(handle_export))
        .route("/statistics", get(handle_statistics))
        .route("/audit", get(handle_audit_trail))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Operativos Server");

    let timezone: Tz = args
        .timezone
        .parse()
        .map_err(|e| format!("Invalid time zone '{}': {e}", args.timezone))?;

    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        warn!("Using in-memory database; records will not survive a restart");
        Persistence::new_in_memory()?
    };

    let state: State = persistence.ensure_seeded()?;
    info!(
        operatives = state.operatives.len(),
        users = state.users.len(),
        "Loaded state"
    );

    let purged: usize = AuthenticationService::purge_expired_sessions(&mut persistence)?;
    if purged > 0 {
        info!(purged, "Removed expired sessions");
    }

    let app_state: AppState = AppState {
        context: Arc::new(Mutex::new(AppContext { persistence, state })),
        timezone,
        session_lifetime: Duration::days(i64::from(args.session_days)),
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!(timezone = %args.timezone, "Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
