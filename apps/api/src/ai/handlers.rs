//! Axum route handlers for the AI helpers.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ai::{ChatMode, ChatReply, ChatTurn};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchScoreRequest {
    pub user_id: String,
    pub job_id: String,
}

#[derive(Debug, Serialize)]
pub struct MatchScoreResponse {
    /// `None` when the AI service could not produce a score.
    pub score: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    pub message: String,
    #[serde(default)]
    pub mode: ChatMode,
}

/// POST /api/v1/ai/match-score
///
/// Scores a user's profile against a job. Degrades to `{"score": null}`.
pub async fn handle_match_score(
    State(state): State<AppState>,
    Json(request): Json<MatchScoreRequest>,
) -> Result<Json<MatchScoreResponse>, AppError> {
    let user = state
        .store
        .get_user(&request.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", request.user_id)))?;
    let job = state
        .store
        .get_job(&request.job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", request.job_id)))?;

    let score = state
        .ai
        .match_score(&user.profile_text(), &job.match_text())
        .await
        .map_err(|e| warn!("Match score unavailable: {e}"))
        .ok();

    Ok(Json(MatchScoreResponse { score }))
}

/// POST /api/v1/ai/chat
///
/// Career-advice chat. A failed AI call yields an apology reply, not an error.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let reply = match state
        .ai
        .chat(&request.history, &request.message, request.mode)
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Chat failed ({:?} mode): {e}", request.mode);
            ChatReply::unavailable()
        }
    };

    Ok(Json(reply))
}
