//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{
    ChatRequest, ChatResponse, ErrorResponse, InputRequest, SessionResponse, SubmitParams,
    SuggestionsResponse,
};
use super::AppState;
use crate::session::{ChatSession, SubmitRejected, SUGGESTED_QUESTIONS};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use std::sync::Arc;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Session lifecycle
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session))
        // User actions
        .route("/api/sessions/:id/input", put(set_input))
        .route("/api/sessions/:id/messages", post(send_chat))
        // SSE streaming
        .route("/api/sessions/:id/stream", get(stream_session))
        .route("/api/suggestions", get(list_suggestions))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Session Lifecycle
// ============================================================

async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionResponse>) {
    let session = state.sessions.create().await;
    (StatusCode::CREATED, Json(session_response(&session).await))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = find_session(&state, &id).await?;
    Ok(Json(session_response(&session).await))
}

// ============================================================
// User Actions
// ============================================================

async fn set_input(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<InputRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let session = find_session(&state, &id).await?;
    let Json(req) = body?;
    session.set_input_buffer(req.text).await;
    Ok(StatusCode::NO_CONTENT)
}

async fn send_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    params: Result<Query<SubmitParams>, QueryRejection>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ChatResponse>), AppError> {
    let session = find_session(&state, &id).await?;
    let Query(params) = params?;
    let Json(req) = body?;

    match session.submit(req.text).await {
        // Without `wait` the reply lands on the stream
        Ok(pending) if params.wait => {
            pending.settled().await;
            Ok((
                StatusCode::OK,
                Json(ChatResponse::accepted(Some(session.snapshot().await))),
            ))
        }
        Ok(_) => Ok((StatusCode::ACCEPTED, Json(ChatResponse::accepted(None)))),
        Err(SubmitRejected::Empty) => Ok((StatusCode::OK, Json(ChatResponse::rejected("empty")))),
        Err(e @ SubmitRejected::Busy) => Err(AppError::Conflict(e.to_string())),
        Err(e @ SubmitRejected::Unexpected) => Err(AppError::Internal(e.to_string())),
    }
}

// ============================================================
// SSE Streaming
// ============================================================

async fn stream_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = find_session(&state, &id).await?;
    let (snapshot, rx) = session.snapshot_and_subscribe().await;
    Ok(sse_stream(snapshot, rx))
}

async fn list_suggestions() -> Json<SuggestionsResponse> {
    Json(SuggestionsResponse {
        suggestions: SUGGESTED_QUESTIONS.iter().map(ToString::to_string).collect(),
    })
}

async fn get_version() -> &'static str {
    concat!("summit-assistant ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Helpers
// ============================================================

async fn find_session(state: &AppState, id: &str) -> Result<Arc<ChatSession>, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session not found: {id}")))
}

async fn session_response(session: &ChatSession) -> SessionResponse {
    SessionResponse {
        id: session.id().to_string(),
        created_at: session.created_at(),
        snapshot: session.snapshot().await,
    }
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
