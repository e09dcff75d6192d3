//! LLM Client: the single point of entry for chat-completion calls.
//!
//! ARCHITECTURAL RULE: No other module may call the provider API directly.
//! The generation pipeline talks to `dyn CompletionProvider`; production wires in `OpenAiClient`.
//!
//! No retries here. Model fallback in `icebreakers::generator` is the only retry.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[cfg(test)]
pub mod testing;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("OpenAI API key is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model {model} timed out after {after:?}")]
    Timeout { model: String, after: Duration },

    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
    },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// One completion call. All borrowed from the caller for the duration of the call.
#[derive(Debug, Clone)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub system: &'a str,
    pub user: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the provider for a JSON object response.
    pub json_mode: bool,
    pub timeout: Duration,
}

/// Anything that can turn a system/user message pair into completion text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// OpenAI wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    temperature: f32,
    max_tokens: u32,
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
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
    code: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Chat-completions client for OpenAI-compatible endpoints.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let body = ChatCompletionRequest {
            model: request.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system,
                },
                ChatMessage {
                    role: "user",
                    content: request.user,
                },
            ],
            response_format: request.json_mode.then_some(ResponseFormat {
                format_type: "json_object",
            }),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .timeout(request.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| timeout_or_http(e, &request))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(api_error(status, text));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| timeout_or_http(e, &request))?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Completion from {}: prompt_tokens={}, completion_tokens={}",
                request.model, usage.prompt_tokens, usage.completion_tokens
            );
        }

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}

fn timeout_or_http(err: reqwest::Error, request: &CompletionRequest<'_>) -> LlmError {
    if err.is_timeout() {
        LlmError::Timeout {
            model: request.model.to_string(),
            after: request.timeout,
        }
    } else {
        LlmError::Http(err)
    }
}

/// Prefers the provider's structured `{error: {message, code}}` body.
fn api_error(status: StatusCode, body: String) -> LlmError {
    match serde_json::from_str::<OpenAiError>(&body) {
        Ok(parsed) => LlmError::Api {
            status: status.as_u16(),
            message: parsed.error.message,
            code: parsed.error.code,
        },
        Err(_) => LlmError::Api {
            status: status.as_u16(),
            message: body,
            code: None,
        },
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(timeout: Duration) -> CompletionRequest<'static> {
        CompletionRequest {
            model: "gpt-4o",
            system: "Return JSON only.",
            user: "INPUT_PROFILE:\nHead of Growth at Acme",
            temperature: 0.7,
            max_tokens: 800,
            json_mode: true,
            timeout,
        }
    }

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

    #[tokio::test]
    async fn test_sends_json_mode_request_and_returns_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-4o",
                "response_format": {"type": "json_object"},
                "max_tokens": 800,
                "messages": [
                    {"role": "system", "content": "Return JSON only."},
                    {"role": "user", "content": "INPUT_PROFILE:\nHead of Growth at Acme"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "{\"ok\":true}"}}],
                "usage": {"prompt_tokens": 10, "completion_tokens": 3}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiClient::new(server.uri(), Some("sk-test".to_string())).unwrap();
        let text = client.complete(request(Duration::from_secs(5))).await.unwrap();
        assert_eq!(text, "{\"ok\":true}");
    }

    #[tokio::test]
    async fn test_structured_api_error_is_parsed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {
                    "message": "You exceeded your current quota, please check your plan.",
                    "type": "insufficient_quota",
                    "code": "insufficient_quota"
                }
            })))
            .mount(&server)
            .await;

        let client = OpenAiClient::new(server.uri(), Some("sk-test".to_string())).unwrap();
        match client.complete(request(Duration::from_secs(5))).await {
            Err(LlmError::Api {
                status,
                message,
                code,
            }) => {
                assert_eq!(status, 429);
                assert!(message.contains("quota"));
                assert_eq!(code.as_deref(), Some("insufficient_quota"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unstructured_error_body_is_kept_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = OpenAiClient::new(server.uri(), Some("sk-test".to_string())).unwrap();
        match client.complete(request(Duration::from_secs(5))).await {
            Err(LlmError::Api { status, message, code }) => {
                assert_eq!(status, 502);
                assert_eq!(message, "bad gateway");
                assert!(code.is_none());
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_is_empty_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = OpenAiClient::new(server.uri(), Some("sk-test".to_string())).unwrap();
        let err = client
            .complete(request(Duration::from_secs(5)))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }

    #[tokio::test]
    async fn test_slow_response_is_a_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"choices": []}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = OpenAiClient::new(server.uri(), Some("sk-test".to_string())).unwrap();
        let err = client
            .complete(request(Duration::from_millis(100)))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Timeout { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let client = OpenAiClient::new("http://127.0.0.1:9", None).unwrap();
        let err = client
            .complete(request(Duration::from_secs(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }
}
