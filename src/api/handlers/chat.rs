use crate::{
    AppState,
    types::{ChatRequest, ChatResponse},
};
use axum::{Json, extract::State};
use tracing::debug;

/// Returned for an empty or whitespace-only message.
pub const EMPTY_MESSAGE_RESPONSE: &str = "Please ask a question!";

/// Answer a question with retrieved context.
///
/// Always `200 OK`: failures inside the pipeline come back as apology text.
pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Json<ChatResponse> {
    if payload.message.trim().is_empty() {
        return Json(ChatResponse::new(EMPTY_MESSAGE_RESPONSE));
    }

    debug!(chars = payload.message.len(), "Chat request");

    let answer = state.chatbot.answer(&payload.message).await;
    Json(ChatResponse::new(answer))
}
