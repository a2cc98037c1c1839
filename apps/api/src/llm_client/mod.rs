//! LLM Client — the single point of entry for all Claude API calls.
//!
//! Only the CV import pipeline talks to the model, and only through here.
//!
//! Model: claude-sonnet-4-5 (hardcoded — do not make configurable to prevent drift)

use std::time::Duration;

use reqwest::{header::RETRY_AFTER, Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls.
pub const MODEL: &str = "claude-sonnet-4-5";
/// A dense two-page CV comes back as roughly 3–5k tokens of JSON.
pub const DEFAULT_MAX_TOKENS: u32 = 8192;
const MAX_ATTEMPTS: u32 = 3;
const MAX_RETRY_AFTER: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Gave up after {attempts} attempts")]
    Exhausted { attempts: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM reply contains no JSON object")]
    NoJson,

    #[error("LLM reply was cut off at {max_tokens} tokens")]
    Truncated { max_tokens: u32 },
}

/// One single-turn completion.
#[derive(Debug, Clone, Copy)]
pub struct Completion<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub max_tokens: u32,
}

impl<'a> Completion<'a> {
    pub fn new(system: &'a str, prompt: &'a str) -> Self {
        Self {
            system,
            prompt,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<String>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Concatenated text of all text blocks.
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .content
            .iter()
            .filter(|b| b.block_type == "text")
            .filter_map(|b| b.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Wraps the Anthropic Messages API with retry logic and a structured-output helper.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self { client, api_key })
    }

    /// Sends one completion. Retries transport errors, 429 and 5xx, waiting
    /// for `retry-after` when the API sends one and backing off 1s, 2s otherwise.
    pub async fn complete(&self, completion: Completion<'_>) -> Result<LlmResponse, LlmError> {
        let body = MessagesRequest {
            model: MODEL,
            max_tokens: completion.max_tokens,
            system: completion.system,
            messages: [Message {
                role: "user",
                content: completion.prompt,
            }],
        };

        let mut last_error = None;
        let mut delay = Duration::ZERO;

        for attempt in 1..=MAX_ATTEMPTS {
            if attempt > 1 {
                warn!("LLM attempt {} failed, retrying in {delay:?}", attempt - 1);
                tokio::time::sleep(delay).await;
            }
            let backoff = Duration::from_secs(1 << (attempt - 1));

            let response = match self.send(&body).await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    delay = backoff;
                    continue;
                }
            };

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                delay = retry_after(&response).unwrap_or(backoff);
                let message = response.text().await.unwrap_or_default();
                warn!("LLM API returned {status}: {message}");
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
                continue;
            }

            if !status.is_success() {
                let raw = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorEnvelope>(&raw)
                    .map(|e| e.error.message)
                    .unwrap_or(raw);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let reply: LlmResponse = response.json().await?;
            debug!(
                input_tokens = reply.usage.input_tokens,
                output_tokens = reply.usage.output_tokens,
                "LLM call succeeded"
            );
            return Ok(reply);
        }

        Err(last_error.unwrap_or(LlmError::Exhausted {
            attempts: MAX_ATTEMPTS,
        }))
    }

    /// Completes and deserializes the JSON object in the reply.
    /// The prompt must instruct the model to return JSON.
    pub async fn extract_json<T: DeserializeOwned>(
        &self,
        completion: Completion<'_>,
    ) -> Result<T, LlmError> {
        let reply = self.complete(completion).await?;
        if reply.stop_reason.as_deref() == Some("max_tokens") {
            return Err(LlmError::Truncated {
                max_tokens: completion.max_tokens,
            });
        }

        let text = reply.text().ok_or(LlmError::EmptyContent)?;
        Ok(serde_json::from_str(json_payload(&text)?)?)
    }

    async fn send(&self, body: &MessagesRequest<'_>) -> Result<Response, reqwest::Error> {
        self.client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(body)
            .send()
            .await
    }
}

fn retry_after(response: &Response) -> Option<Duration> {
    let secs: u64 = response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()?;
    Some(Duration::from_secs(secs).min(MAX_RETRY_AFTER))
}

/// Finds the JSON object in a model reply: strips ``` fences and any prose
/// around the outermost `{ ... }`.
fn json_payload(text: &str) -> Result<&str, LlmError> {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = rest.strip_prefix("json").unwrap_or(rest);
        text = text.trim().strip_suffix("```").unwrap_or(text).trim();
    }

    let start = text.find('{').ok_or(LlmError::NoJson)?;
    let end = text.rfind('}').ok_or(LlmError::NoJson)?;
    if end < start {
        return Err(LlmError::NoJson);
    }
    Ok(&text[start..=end])
}
