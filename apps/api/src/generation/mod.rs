//! AI generation boundary. Every model call in the service goes through
//! [`AiClient`]; the rest of the crate depends only on the [`Generator`]
//! trait so tests can substitute a mock.

pub mod handlers;
pub mod prompts;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::generation::prompts::GenerationContext;
use crate::interview::{QuizQuestion, QuizReview};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
/// Used when `GENERATION_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 2048;
const MAX_RETRIES: u32 = 3;

/// Transient by design: form state is preserved on failure and the user
/// may simply retry.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI service error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("AI response was not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("AI service returned empty content")]
    EmptyContent,
}

/// The generation collaborator contract.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn cover_letter(&self, ctx: &GenerationContext) -> Result<String, GenerationError>;

    async fn quiz(
        &self,
        industry: &str,
        skills: &[String],
    ) -> Result<Vec<QuizQuestion>, GenerationError>;

    async fn improvement_tip(
        &self,
        industry: &str,
        wrong: &[&QuizReview],
    ) -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct QuizPayload {
    questions: Vec<QuizQuestion>,
}

/// Client for the Anthropic messages API with exponential-backoff retry on
/// 429 and 5xx responses.
#[derive(Clone)]
pub struct AiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl AiClient {
    pub fn new(api_key: String, model: String) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()?;
        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One completion: returns the text of the first text block.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, GenerationError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error: Option<GenerationError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "generation attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", API_VERSION)
                .header("content-type", "application/json")
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(GenerationError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let message = response.text().await.unwrap_or_default();
                warn!(status = status.as_u16(), "AI service returned retryable status");
                last_error = Some(GenerationError::Api {
                    status: status.as_u16(),
                    message,
                });
                continue;
            }

            if !status.is_success() {
                let raw = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorBody>(&raw)
                    .map(|b| b.error.message)
                    .unwrap_or(raw);
                return Err(GenerationError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: MessagesResponse = response.json().await?;
            let text = parsed
                .content
                .iter()
                .find(|b| b.kind == "text")
                .and_then(|b| b.text.as_deref())
                .ok_or(GenerationError::EmptyContent)?;

            debug!(model = %self.model, chars = text.len(), "generation succeeded");
            return Ok(text.trim().to_string());
        }

        Err(last_error.unwrap_or(GenerationError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    /// Completion whose text must deserialize as JSON; tolerates models
    /// that wrap JSON in markdown fences.
    async fn complete_json<T: DeserializeOwned>(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<T, GenerationError> {
        let text = self.complete(system, prompt).await?;
        let text = strip_json_fences(&text);
        Ok(serde_json::from_str(text)?)
    }
}

#[async_trait]
impl Generator for AiClient {
    async fn cover_letter(&self, ctx: &GenerationContext) -> Result<String, GenerationError> {
        self.complete(
            prompts::COVER_LETTER_SYSTEM,
            &prompts::cover_letter_prompt(ctx),
        )
        .await
    }

    async fn quiz(
        &self,
        industry: &str,
        skills: &[String],
    ) -> Result<Vec<QuizQuestion>, GenerationError> {
        let payload: QuizPayload = self
            .complete_json(prompts::QUIZ_SYSTEM, &prompts::quiz_prompt(industry, skills))
            .await?;
        if payload.questions.is_empty() {
            return Err(GenerationError::EmptyContent);
        }
        Ok(payload.questions)
    }

    async fn improvement_tip(
        &self,
        industry: &str,
        wrong: &[&QuizReview],
    ) -> Result<String, GenerationError> {
        self.complete(
            prompts::TIP_SYSTEM,
            &prompts::improvement_tip_prompt(industry, wrong),
        )
        .await
    }
}

/// Strips ```json ... ``` or ``` ... ``` fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(inner) = text.strip_prefix("```json") {
        inner
            .trim_start()
            .strip_suffix("```")
            .map(str::trim)
            .unwrap_or_else(|| inner.trim_start())
    } else if let Some(inner) = text.strip_prefix("```") {
        inner
            .trim_start()
            .strip_suffix("```")
            .map(str::trim)
            .unwrap_or_else(|| inner.trim_start())
    } else {
        text
    }
}
