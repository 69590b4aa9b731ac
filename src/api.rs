// Roster HTTP API (Axum)
//
// JSON over the same Roster the CLI and TUI use. The roster sits behind a
// mutex; every handler takes the lock for the length of one operation.

use crate::export::{export_file_name, export_to_delimited_text, ExportError, MIME_TYPE};
use crate::model::{AttendanceMap, AttendanceStatus, Player};
use crate::roster::{Roster, RosterError};
use crate::store::SqliteStore;
use crate::views::{date_label, overall_counts, per_date_counts, player_summaries, Counts, PlayerSummary};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    roster: Arc<Mutex<Roster<SqliteStore>>>,
}

impl AppState {
    pub fn new(roster: Roster<SqliteStore>) -> Self {
        Self {
            roster: Arc::new(Mutex::new(roster)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Roster<SqliteStore>>, ApiError> {
        self.roster
            .lock()
            .map_err(|_| ApiError::Internal("roster lock poisoned".to_string()))
    }
}

// ============================================================================
// Responses & errors
// ============================================================================

/// API Response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Input rejected by the roster (400)
    #[error("{0}")]
    Validation(String),

    /// Nothing to export yet (422)
    #[error("{0}")]
    NoData(String),

    /// Storage or lock failure (500). Details are logged, not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RosterError> for ApiError {
    fn from(err: RosterError) -> Self {
        match err {
            RosterError::Validation(v) => ApiError::Validation(v.to_string()),
            RosterError::Store(s) => ApiError::Internal(s.to_string()),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::NoData => ApiError::NoData(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NoData(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };

        let body = ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(message),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

// ============================================================================
// Request / response bodies
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct AddPlayerRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddDateRequest {
    pub date: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleRequest {
    pub player_id: String,
    pub date: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub changed: bool,
    pub status: Option<AttendanceStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RemovedResponse {
    pub removed: bool,
}

#[derive(Debug, Serialize)]
pub struct DateView {
    pub date: String,
    pub label: String,
    #[serde(flatten)]
    pub counts: Counts,
}

/// Everything a client needs to draw the sheet
#[derive(Debug, Serialize)]
pub struct RosterView {
    pub players: Vec<PlayerSummary>,
    pub dates: Vec<DateView>,
    pub attendance: AttendanceMap,
    pub totals: Counts,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub player_count: usize,
    pub date_count: usize,
    pub totals: Counts,
}

fn roster_view(roster: &Roster<SqliteStore>) -> RosterView {
    let state = roster.state();
    RosterView {
        players: player_summaries(state),
        dates: state
            .dates
            .iter()
            .map(|date| DateView {
                date: date.clone(),
                label: date_label(date, true),
                counts: per_date_counts(state, date).unwrap_or_default(),
            })
            .collect(),
        attendance: state.attendance.clone(),
        totals: overall_counts(state),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/health
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/roster
async fn get_roster(State(state): State<AppState>) -> ApiResult<RosterView> {
    let roster = state.lock()?;
    Ok(Json(ApiResponse::ok(roster_view(&roster))))
}

/// POST /api/players
async fn add_player(
    State(state): State<AppState>,
    Json(req): Json<AddPlayerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Player>>), ApiError> {
    let player = state.lock()?.add_player(&req.name)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(player))))
}

/// DELETE /api/players/:id
async fn remove_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<RemovedResponse> {
    let removed = state.lock()?.remove_player(&id)?;
    Ok(Json(ApiResponse::ok(RemovedResponse { removed })))
}

/// POST /api/dates
async fn add_date(
    State(state): State<AppState>,
    Json(req): Json<AddDateRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AddDateRequest>>), ApiError> {
    state.lock()?.add_date(&req.date)?;
    let date = req.date.trim().to_string();
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(AddDateRequest { date }))))
}

/// DELETE /api/dates/:date
async fn remove_date(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> ApiResult<RemovedResponse> {
    let removed = state.lock()?.remove_date(&date)?;
    Ok(Json(ApiResponse::ok(RemovedResponse { removed })))
}

/// POST /api/attendance/toggle
async fn toggle_attendance(
    State(state): State<AppState>,
    Json(req): Json<ToggleRequest>,
) -> ApiResult<ToggleResponse> {
    let status = state.lock()?.toggle_attendance(&req.player_id, &req.date)?;
    Ok(Json(ApiResponse::ok(ToggleResponse {
        changed: status.is_some(),
        status,
    })))
}

/// GET /api/stats
async fn get_stats(State(state): State<AppState>) -> ApiResult<StatsResponse> {
    let roster = state.lock()?;
    Ok(Json(ApiResponse::ok(StatsResponse {
        player_count: roster.players().len(),
        date_count: roster.dates().len(),
        totals: overall_counts(roster.state()),
    })))
}

/// GET /api/export - spreadsheet download
async fn export_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let text = export_to_delimited_text(state.lock()?.state())?;
    let file_name = export_file_name(chrono::Local::now().date_naive());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, MIME_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        text,
    )
        .into_response())
}

/// All API routes, mounted under `/api` by [`app`]
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/roster", get(get_roster))
        .route("/players", post(add_player))
        .route("/players/:id", delete(remove_player))
        .route("/dates", post(add_date))
        .route("/dates/:date", delete(remove_date))
        .route("/attendance/toggle", post(toggle_attendance))
        .route("/stats", get(get_stats))
        .route("/export", get(export_csv))
}

/// Full application with state attached
pub fn app(state: AppState) -> Router {
    Router::new().nest("/api", router()).with_state(state)
}
