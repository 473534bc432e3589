//! AI service port: resume parsing, career chat and job-match scoring.
//!
//! ARCHITECTURAL RULE: handlers talk to `Arc<dyn AiService>` only. The Gemini
//! adapter in `gemini.rs` is the single place that speaks HTTP to the model.
//!
//! Every call is fallible and independent of the search core. Callers decide
//! how to degrade: an unavailable match score is stored as absent, a failed
//! chat turns into an apology reply.

pub mod document;
pub mod handlers;
pub mod gemini;
pub mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::AppError;

pub use gemini::GeminiClient;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI API key is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("AI returned empty content")]
    EmptyContent,

    #[error("AI reply is not a score: {0:?}")]
    InvalidScore(String),

    #[error("Unsupported document type '{0}'")]
    UnsupportedDocument(String),

    #[error("Could not read document: {0}")]
    Document(String),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<AiError> for AppError {
    fn from(e: AiError) -> Self {
        match e {
            AiError::UnsupportedDocument(_) | AiError::Document(_) => {
                AppError::Validation(e.to_string())
            }
            AiError::Task(msg) => AppError::Internal(anyhow::anyhow!(msg)),
            other => AppError::Ai(other.to_string()),
        }
    }
}

/// Structured fields extracted from a resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    #[serde(default)]
    pub skills: Vec<String>,
    /// One-paragraph experience summary.
    #[serde(default)]
    pub experience: String,
    /// "Degree - Institution (Year)" strings.
    #[serde(default)]
    pub education: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

/// `Advice` reasons over university policy with a thinking budget;
/// `Research` grounds the answer in live web search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    #[default]
    Advice,
    Research,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub text: String,
    pub sources: Vec<Source>,
}

impl ChatReply {
    /// Reply shown when the AI service could not be reached.
    pub fn unavailable() -> Self {
        Self {
            text: "Sorry, I encountered an error connecting to the AI service.".to_string(),
            sources: vec![],
        }
    }
}

/// The AI service trait. Carried in `AppState` as `Arc<dyn AiService>`.
#[async_trait]
pub trait AiService: Send + Sync {
    /// Suitability of a profile for a job, 0 – 100.
    async fn match_score(&self, profile_text: &str, job_text: &str) -> Result<u8, AiError>;

    async fn parse_resume(&self, document: &[u8], mime_type: &str)
        -> Result<ParsedResume, AiError>;

    async fn chat(
        &self,
        history: &[ChatTurn],
        message: &str,
        mode: ChatMode,
    ) -> Result<ChatReply, AiError>;
}

/// Reads a match score out of a model reply: first run of digits, capped at 100.
pub fn parse_score(text: &str) -> Result<u8, AiError> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    if digits.is_empty() {
        return Err(AiError::InvalidScore(text.to_string()));
    }

    let value = digits.parse::<u32>().unwrap_or(u32::MAX);
    Ok(value.min(100) as u8)
}
