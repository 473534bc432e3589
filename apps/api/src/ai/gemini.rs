//! Gemini adapter for `AiService`, over the `generateContent` REST endpoint.
//! Retries on 429 and 5xx with exponential backoff.

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ai::document::extract_text_blocking;
use crate::ai::prompts::{
    match_score_prompt, resume_parse_prompt, ADVICE_SYSTEM, RESEARCH_SYSTEM, RESUME_PARSE_SYSTEM,
};
use crate::ai::{
    parse_score, AiError, AiService, ChatMode, ChatReply, ChatRole, ChatTurn, ParsedResume, Source,
};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const ADVICE_MODEL: &str = "gemini-2.5-pro";
pub const RESEARCH_MODEL: &str = "gemini-2.5-flash";
pub const RESUME_MODEL: &str = "gemini-2.5-flash";
/// Low-latency model for per-card match scores.
pub const MATCH_MODEL: &str = "gemini-2.5-flash-lite";
const ADVICE_THINKING_BUDGET: u32 = 1024;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_search: serde_json::Value,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
pub struct GroundingChunk {
    pub web: Option<Source>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, `None` when it has none.
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }

    /// Web sources the answer was grounded on (research mode).
    pub fn sources(&self) -> Vec<Source> {
        self.candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|m| {
                m.grounding_chunks
                    .iter()
                    .filter_map(|chunk| chunk.web.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Wraps the Gemini API with retry logic and structured output helpers.
/// Without an API key every call fails fast with `AiError::MissingApiKey`.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {e}");
                Client::new()
            });
        Self { client, api_key }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateRequest<'_>,
    ) -> Result<GenerateResponse, AiError> {
        let api_key = self.api_key.as_deref().ok_or(AiError::MissingApiKey)?;
        let url = format!("{GEMINI_API_BASE}/{model}:generateContent");

        let mut last_error: Option<AiError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Gemini call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", api_key)
                .json(request)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(AiError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Gemini API returned {}: {}", status, body);
                last_error = Some(AiError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<GeminiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(AiError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: GenerateResponse = response.json().await?;

            if let Some(usage) = &parsed.usage_metadata {
                debug!(
                    "Gemini call succeeded: model={}, prompt_tokens={}, output_tokens={}",
                    model, usage.prompt_token_count, usage.candidates_token_count
                );
            }

            return Ok(parsed);
        }

        Err(last_error.unwrap_or(AiError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    /// Sends a single-turn prompt and deserializes the reply as JSON.
    async fn generate_json<T: DeserializeOwned>(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
    ) -> Result<T, AiError> {
        let request = GenerateRequest {
            contents: vec![user_content(prompt)],
            system_instruction: Some(SystemInstruction {
                parts: vec![Part { text: system }],
            }),
            tools: vec![],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json"),
                ..GenerationConfig::default()
            }),
        };

        let response = self.generate(model, &request).await?;
        let text = response.text().ok_or(AiError::EmptyContent)?;
        serde_json::from_str(strip_json_fences(&text)).map_err(AiError::Parse)
    }
}

fn user_content(text: &str) -> Content<'_> {
    Content {
        role: ChatRole::User.as_str(),
        parts: vec![Part { text }],
    }
}

fn build_chat_request<'a>(
    history: &'a [ChatTurn],
    message: &'a str,
    mode: ChatMode,
) -> GenerateRequest<'a> {
    let mut contents: Vec<Content<'a>> = history
        .iter()
        .map(|turn| Content {
            role: turn.role.as_str(),
            parts: vec![Part { text: &turn.text }],
        })
        .collect();
    contents.push(user_content(message));

    let (system, tools, generation_config) = match mode {
        ChatMode::Advice => (
            ADVICE_SYSTEM,
            vec![],
            Some(GenerationConfig {
                thinking_config: Some(ThinkingConfig {
                    thinking_budget: ADVICE_THINKING_BUDGET,
                }),
                ..GenerationConfig::default()
            }),
        ),
        ChatMode::Research => (
            RESEARCH_SYSTEM,
            vec![Tool {
                google_search: serde_json::json!({}),
            }],
            None,
        ),
    };

    GenerateRequest {
        contents,
        system_instruction: Some(SystemInstruction {
            parts: vec![Part { text: system }],
        }),
        tools,
        generation_config,
    }
}

#[async_trait]
impl AiService for GeminiClient {
    async fn match_score(&self, profile_text: &str, job_text: &str) -> Result<u8, AiError> {
        let prompt = match_score_prompt(profile_text, job_text);
        let request = GenerateRequest {
            contents: vec![user_content(&prompt)],
            system_instruction: None,
            tools: vec![],
            generation_config: None,
        };
        let response = self.generate(MATCH_MODEL, &request).await?;
        let text = response.text().ok_or(AiError::EmptyContent)?;
        parse_score(&text)
    }

    async fn parse_resume(
        &self,
        document: &[u8],
        mime_type: &str,
    ) -> Result<ParsedResume, AiError> {
        if !self.is_configured() {
            return Err(AiError::MissingApiKey);
        }
        let resume_text = extract_text_blocking(document.to_vec(), mime_type.to_string()).await?;
        let prompt = resume_parse_prompt(&resume_text);
        self.generate_json(RESUME_MODEL, &prompt, RESUME_PARSE_SYSTEM)
            .await
    }

    async fn chat(
        &self,
        history: &[ChatTurn],
        message: &str,
        mode: ChatMode,
    ) -> Result<ChatReply, AiError> {
        let model = match mode {
            ChatMode::Advice => ADVICE_MODEL,
            ChatMode::Research => RESEARCH_MODEL,
        };
        let request = build_chat_request(history, message, mode);
        let response = self.generate(model, &request).await?;

        let fallback = match mode {
            ChatMode::Advice => "I'm thinking...",
            ChatMode::Research => "Here is what I found.",
        };

        Ok(ChatReply {
            text: response.text().unwrap_or_else(|| fallback.to_string()),
            sources: response.sources(),
        })
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    stripped
        .trim_start()
        .strip_suffix("```")
        .map(|s| s.trim())
        .unwrap_or(stripped.trim_start())
}
