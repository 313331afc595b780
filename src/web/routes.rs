//! REST endpoints for the chat page.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::debug;
use uuid::Uuid;

use super::error::ApiError;
use crate::conversation::{SessionHandle, SessionStore, Turn};
use crate::error::SessionError;
use crate::orchestrator::ResponseOrchestrator;
use crate::sentiment::Sentiment;

const INDEX_HTML: &str = include_str!("../../templates/index.html");

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ResponseOrchestrator>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(orchestrator: Arc<ResponseOrchestrator>, sessions: Arc<SessionStore>) -> Self {
        Self {
            orchestrator,
            sessions,
        }
    }
}

/// Build the Axum router with the chat page and API routes.
pub fn chat_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/message", post(post_message))
        .route("/api/sessions/{id}", delete(end_session))
        .route("/api/sessions/{id}/history", get(session_history))
        .route("/api/sessions/{id}/sentiment", get(session_sentiment))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Page ────────────────────────────────────────────────────────────────

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "chat-companion"
    }))
}

// ── Messages ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct MessageRequest {
    #[serde(default)]
    message: String,
    #[serde(default)]
    session_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct SentimentBody {
    label: Sentiment,
    score: i32,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    session_id: Uuid,
    user: String,
    bot: String,
    intent: String,
    sentiment: SentimentBody,
}

async fn post_message(
    State(state): State<AppState>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let text = req.message.trim();
    if text.is_empty() {
        return Err(ApiError::EmptyMessage);
    }

    let requested = req.session_id.as_deref().map(parse_session_id).transpose()?;
    let (session_id, handle) = state.sessions.get_or_create(requested).await;

    let reply = {
        let mut session = handle.lock().await;
        session.touch();
        state.orchestrator.handle(&mut session.history, text).await?
    };

    debug!(session_id = %session_id, intent = %reply.intent, "Reply sent");

    Ok(Json(MessageResponse {
        session_id,
        user: text.to_string(),
        bot: reply.reply,
        intent: reply.intent,
        sentiment: SentimentBody {
            label: reply.sentiment,
            score: reply.score,
        },
    }))
}

// ── Sessions ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct HistoryResponse {
    session_id: Uuid,
    total_recorded: u64,
    turns: Vec<Turn>,
}

async fn session_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let (session_id, handle) = lookup(&state, &id).await?;
    let session = handle.lock().await;
    Ok(Json(HistoryResponse {
        session_id,
        total_recorded: session.history.total_recorded(),
        turns: session.history.snapshot(),
    }))
}

async fn session_sentiment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let (_, handle) = lookup(&state, &id).await?;
    let session = handle.lock().await;
    Ok(Json(state.orchestrator.summarize(&session.history)))
}

async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_session_id(&id)?;
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(SessionError::NotFound { id }.into())
    }
}

fn parse_session_id(raw: &str) -> Result<Uuid, SessionError> {
    Uuid::parse_str(raw).map_err(|_| SessionError::InvalidId(raw.to_string()))
}

async fn lookup(state: &AppState, raw: &str) -> Result<(Uuid, SessionHandle), SessionError> {
    let id = parse_session_id(raw)?;
    let handle = state
        .sessions
        .get(id)
        .await
        .ok_or(SessionError::NotFound { id })?;
    Ok((id, handle))
}
