//! Chat HTTP handlers.
//!
//! Endpoints:
//! - GET  /api/v1/examples                - The fixed example queries
//! - POST /api/v1/sessions/{id}/messages  - Ask a question, run one pipeline turn

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pakguider_types::chat::EXAMPLE_QUERIES;
use pakguider_types::llm::Message;

use crate::http::error::AppError;
use crate::http::handlers::parse_uuid;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SendMessageRequest {
    /// Ignored when the session has a pending pre-filled question.
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExampleQuery {
    /// 1-based, as accepted by the prefill endpoint.
    pub index: usize,
    pub query: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MessageExchange {
    pub question: String,
    pub answer: String,
    pub messages: Vec<Message>,
    pub turn_count: u32,
}

/// GET /api/v1/examples - List the example queries.
pub async fn list_examples() -> Json<ApiResponse<Vec<ExampleQuery>>> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let examples = EXAMPLE_QUERIES
        .iter()
        .copied()
        .enumerate()
        .map(|(i, query)| ExampleQuery { index: i + 1, query })
        .collect();

    let elapsed = start.elapsed().as_millis() as u64;
    Json(ApiResponse::success(examples, request_id, elapsed).with_link("self", "/api/v1/examples"))
}

/// POST /api/v1/sessions/{id}/messages - Run one turn.
///
/// A pending prefill takes precedence over `message` and is consumed.
/// Provider failures still produce a 200 with the fallback answer, which
/// is appended to the transcript like any other reply.
pub async fn send_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<ApiResponse<MessageExchange>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let sid = parse_uuid(&session_id)?;
    let handle = state.sessions.get(&sid)?;
    let mut manager = handle.lock().await;

    let question = manager.resolve_question(body.message.as_deref())?;
    let answer = state.pipeline.run_turn(&mut manager, &question).await;

    let exchange = MessageExchange {
        question,
        answer,
        messages: manager.conversation().messages().to_vec(),
        turn_count: manager.turn_count(),
    };
    drop(manager);

    let elapsed = start.elapsed().as_millis() as u64;
    tracing::debug!(session_id = %sid, elapsed_ms = elapsed, "Turn completed");

    let resp = ApiResponse::success(exchange, request_id, elapsed)
        .with_link("session", &format!("/api/v1/sessions/{sid}"));
    Ok(Json(resp))
}
