/// LLM client: the single point of entry for every chat-completion call.
///
/// Perplexity and OpenAI both expose the OpenAI `chat/completions` protocol, so
/// one client type serves both; each configured provider gets its own instance.
///
/// No other module may call a provider API directly.
use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ProviderConfig;

pub mod prompts;

const MAX_TOKENS: u32 = 2000;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Per-call knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatOptions {
    pub temperature: f32,
    /// Ask for `response_format: json_object`. Only OpenAI honours it.
    pub json_mode: bool,
}

impl ChatOptions {
    pub fn text(temperature: f32) -> Self {
        Self {
            temperature,
            json_mode: false,
        }
    }

    pub fn json(temperature: f32) -> Self {
        Self {
            temperature,
            json_mode: true,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Content of the first choice, trimmed. `None` when absent or blank.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Chat-completions client bound to one provider.
/// Wraps the HTTP call with retry logic and structured output helpers.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    provider: String,
    endpoint: String,
    api_key: String,
    model: String,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl ChatClient {
    pub fn new(
        provider: &ProviderConfig,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            provider: provider.name.clone(),
            endpoint: format!("{}/chat/completions", provider.base_url.trim_end_matches('/')),
            api_key: provider.api_key.clone(),
            model: provider.model.clone(),
            max_retries: max_retries.max(1),
            retry_base_delay: RETRY_BASE_DELAY,
        })
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    #[cfg(test)]
    fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Makes a raw call, returning the full response object.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(
        &self,
        system: &str,
        user: &str,
        options: ChatOptions,
    ) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            temperature: options.temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            response_format: options.json_mode.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = self.retry_base_delay * (1 << (attempt - 1));
                warn!(
                    "{} call attempt {} failed, retrying after {}ms...",
                    self.provider,
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("{} API returned {}: {}", self.provider, status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ProviderError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let chat_response: ChatResponse = response.json().await?;

            if let Some(usage) = &chat_response.usage {
                debug!(
                    "{} call succeeded: prompt_tokens={}, completion_tokens={}",
                    self.provider, usage.prompt_tokens, usage.completion_tokens
                );
            }

            return Ok(chat_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: self.max_retries,
        }))
    }

    /// Calls the provider and returns the first choice's trimmed text.
    pub async fn complete(
        &self,
        system: &str,
        user: &str,
        options: ChatOptions,
    ) -> Result<String, LlmError> {
        let response = self.call(system, user, options).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }

    /// Calls the provider and deserializes the text response as JSON.
    /// The prompt must instruct the model to return valid JSON.
    pub async fn complete_json<T: DeserializeOwned>(
        &self,
        system: &str,
        user: &str,
        options: ChatOptions,
    ) -> Result<T, LlmError> {
        let text = self.complete(system, user, options).await?;
        parse_json_lenient(&text)
    }
}

/// Parses model output as JSON, tolerating code fences and chatter around
/// the payload.
pub fn parse_json_lenient<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    let text = strip_json_fences(text);
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(direct) => match extract_json_block(text) {
            Some(block) => serde_json::from_str(block).map_err(LlmError::Parse),
            None => Err(LlmError::Parse(direct)),
        },
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// The span from the first `{`/`[` to the matching last `}`/`]`, whichever
/// opener comes first.
fn extract_json_block(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let close = if text[start..].starts_with('{') { '}' } else { ']' };
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_extract_json_block_from_chatter() {
        let input = "Here you go: [\"Rust\", \"SQL\"] hope that helps";
        assert_eq!(extract_json_block(input), Some("[\"Rust\", \"SQL\"]"));
        assert_eq!(extract_json_block("no json here"), None);
    }

    #[test]
    fn test_parse_json_lenient_falls_back_to_block() {
        let parsed: Value = parse_json_lenient("Sure! {\"score\": 80} Anything else?").unwrap();
        assert_eq!(parsed, json!({ "score": 80 }));
    }

    #[test]
    fn test_parse_json_lenient_rejects_prose() {
        let parsed: Result<Value, _> = parse_json_lenient("I cannot score this resume.");
        assert!(matches!(parsed, Err(LlmError::Parse(_))));
    }

    #[test]
    fn test_json_mode_serializes_response_format() {
        let request = ChatRequest {
            model: "gpt-4o",
            max_tokens: 10,
            temperature: 0.5,
            messages: vec![],
            response_format: Some(ResponseFormat {
                format_type: "json_object",
            }),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["response_format"], json!({ "type": "json_object" }));

        let plain = ChatRequest {
            response_format: None,
            ..request
        };
        assert!(serde_json::to_value(&plain).unwrap().get("response_format").is_none());
    }

    /// Serves `chat/completions` on loopback, failing the first `failures` calls
    /// with `failure_status`.
    async fn fake_provider(
        failures: usize,
        failure_status: StatusCode,
    ) -> (String, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route(
                "/chat/completions",
                post(
                    move |State(calls): State<Arc<AtomicUsize>>,
                          Json(body): Json<Value>| async move {
                        let n = calls.fetch_add(1, Ordering::SeqCst);
                        if n < failures {
                            return (
                                failure_status,
                                Json(json!({ "error": { "message": "upstream unhappy" } })),
                            );
                        }
                        let echo = body["messages"][1]["content"]
                            .as_str()
                            .unwrap_or_default()
                            .to_string();
                        (
                            StatusCode::OK,
                            Json(json!({
                                "choices": [{
                                    "message": {
                                        "role": "assistant",
                                        "content": format!("  {echo}  ")
                                    }
                                }],
                                "usage": { "prompt_tokens": 3, "completion_tokens": 2 }
                            })),
                        )
                    },
                ),
            )
            .with_state(calls.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), calls)
    }

    fn client_for(base_url: String) -> ChatClient {
        let provider = ProviderConfig {
            name: "test".to_string(),
            base_url,
            api_key: "sk-test".to_string(),
            model: "test-model".to_string(),
        };
        ChatClient::new(&provider, Duration::from_secs(5), 3)
            .unwrap()
            .with_retry_delay(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_complete_retries_server_errors() {
        let (base_url, calls) = fake_provider(2, StatusCode::SERVICE_UNAVAILABLE).await;
        let text = client_for(base_url)
            .complete("system", "hello", ChatOptions::text(0.2))
            .await
            .unwrap();
        assert_eq!(text, "hello");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let (base_url, calls) = fake_provider(5, StatusCode::UNAUTHORIZED).await;
        let err = client_for(base_url)
            .complete("system", "hello", ChatOptions::text(0.2))
            .await
            .unwrap_err();
        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "upstream unhappy");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_exhausted_returns_last_error() {
        let (base_url, calls) = fake_provider(10, StatusCode::TOO_MANY_REQUESTS).await;
        let err = client_for(base_url)
            .complete("system", "hello", ChatOptions::text(0.2))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 429, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_complete_json_parses_echoed_payload() {
        let (base_url, _) = fake_provider(0, StatusCode::OK).await;
        let skills: Vec<String> = client_for(base_url)
            .complete_json("system", "```json\n[\"Rust\", \"Go\"]\n```", ChatOptions::json(0.5))
            .await
            .unwrap();
        assert_eq!(skills, vec!["Rust", "Go"]);
    }
}
