//! Session lifecycle HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/sessions                    - Start a session
//! - GET    /api/v1/sessions/{id}               - Session view-model and transcript
//! - DELETE /api/v1/sessions/{id}               - End a session
//! - POST   /api/v1/sessions/{id}/loading-shown - Mark the loading indicator shown
//! - POST   /api/v1/sessions/{id}/prefill       - Pre-fill the pending question

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pakguider_types::chat::ChatSession;

use crate::http::error::AppError;
use crate::http::handlers::parse_uuid;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for POST /sessions/{id}/prefill.
///
/// Exactly one of `query` or `example_index` (1-based) must be given.
#[derive(Debug, Deserialize)]
pub struct PrefillRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub example_index: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct PrefillResponse {
    pub input_value: String,
}

#[derive(Debug, Serialize)]
pub struct LoadingShownResponse {
    /// True only for the first call in a session.
    pub first_time: bool,
}

fn session_links(resp: ApiResponse<ChatSession>, id: Uuid) -> ApiResponse<ChatSession> {
    resp.with_link("self", &format!("/api/v1/sessions/{id}"))
        .with_link("messages", &format!("/api/v1/sessions/{id}/messages"))
}

/// POST /api/v1/sessions - Start a session seeded with the greeting.
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ChatSession>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let (id, handle) = state.sessions.create();
    let session = handle.lock().await.session().clone();
    tracing::info!(session_id = %id, active = state.sessions.len(), "Session started");

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(session, request_id, elapsed);
    Ok(Json(session_links(resp, id)))
}

/// GET /api/v1/sessions/{id} - Get the session view-model.
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<ChatSession>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let sid = parse_uuid(&session_id)?;
    let handle = state.sessions.get(&sid)?;
    let session = handle.lock().await.session().clone();

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(session, request_id, elapsed);
    Ok(Json(session_links(resp, sid)))
}

/// DELETE /api/v1/sessions/{id} - End a session and drop it from the store.
///
/// Returns the final view-model with `status = completed`.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<ChatSession>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let sid = parse_uuid(&session_id)?;
    let handle = state.sessions.remove(&sid)?;
    let session = {
        let mut manager = handle.lock().await;
        manager.mark_completed();
        manager.session().clone()
    };
    tracing::info!(session_id = %sid, turns = session.turn_count, "Session ended");

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(session, request_id, elapsed)))
}

/// POST /api/v1/sessions/{id}/loading-shown - Record the one-time loading indicator.
pub async fn mark_loading_shown(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<LoadingShownResponse>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let sid = parse_uuid(&session_id)?;
    let handle = state.sessions.get(&sid)?;
    let first_time = handle.lock().await.mark_loading_shown();

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        LoadingShownResponse { first_time },
        request_id,
        elapsed,
    )))
}

/// POST /api/v1/sessions/{id}/prefill - Set the pending question.
pub async fn prefill(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<PrefillRequest>,
) -> Result<Json<ApiResponse<PrefillResponse>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let sid = parse_uuid(&session_id)?;
    let handle = state.sessions.get(&sid)?;
    let mut manager = handle.lock().await;

    let input_value = match (body.query, body.example_index) {
        (Some(query), None) => {
            if query.trim().is_empty() {
                return Err(AppError::Validation("query must not be empty".to_string()));
            }
            manager.prefill(query.clone());
            query
        }
        (None, Some(index)) => manager.prefill_example(index)?.to_string(),
        _ => {
            return Err(AppError::Validation(
                "provide exactly one of 'query' or 'example_index'".to_string(),
            ));
        }
    };

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        PrefillResponse { input_value },
        request_id,
        elapsed,
    )))
}
