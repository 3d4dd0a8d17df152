//! Completion client for an OpenAI-compatible `/chat/completions` endpoint.
//!
//! Retries 429 and 5xx responses with exponential backoff. Any other non-2xx
//! status fails immediately.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::chat::{ChatError, CompletionBackend};

const MAX_RETRIES: u32 = 3;
const DEFAULT_BACKOFF: Duration = Duration::from_millis(1000);

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<CompletionMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct CompletionMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
pub struct ReplyMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl CompletionResponse {
    /// Text of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct CompletionClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    backoff: Duration,
}

impl CompletionClient {
    pub fn new(base_url: &str, api_key: String, model: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .expect("Failed to build HTTP client"),
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key,
            model,
            backoff: DEFAULT_BACKOFF,
        }
    }

    /// Overrides the first retry delay; later delays double it.
    #[cfg(test)]
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn call(&self, prompt: &str) -> Result<CompletionResponse, ChatError> {
        let request_body = CompletionRequest {
            model: &self.model,
            messages: vec![CompletionMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error: Option<ChatError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = self.backoff * (1 << (attempt - 1));
                warn!(
                    "Completion attempt {} failed, retrying after {}ms...",
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
                    last_error = Some(ChatError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Completion API returned {}: {}", status, body);
                last_error = Some(ChatError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(ChatError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let completion: CompletionResponse = response.json().await?;

            if let Some(usage) = &completion.usage {
                debug!(
                    "Completion succeeded: prompt_tokens={}, completion_tokens={}",
                    usage.prompt_tokens, usage.completion_tokens
                );
            }

            return Ok(completion);
        }

        Err(last_error.unwrap_or(ChatError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl CompletionBackend for CompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, ChatError> {
        let completion = self.call(prompt).await?;
        completion
            .text()
            .map(str::to_string)
            .ok_or(ChatError::EmptyReply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    /// Serves `/v1/chat/completions` on an ephemeral port. The first
    /// `failures` calls answer with `failure_status`.
    async fn fake_api(failures: usize, failure_status: StatusCode) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/v1/chat/completions",
            post(move |Json(body): Json<Value>| {
                let counter = counter.clone();
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    if n < failures {
                        return (failure_status, Json(json!({"error": {"message": "busy"}})));
                    }
                    let prompt = body["messages"][0]["content"].as_str().unwrap_or("").to_string();
                    (
                        StatusCode::OK,
                        Json(json!({
                            "choices": [{"message": {"role": "assistant", "content": format!("echo: {prompt}")}}],
                            "usage": {"prompt_tokens": 3, "completion_tokens": 4}
                        })),
                    )
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/v1"), hits)
    }

    fn client(base: &str) -> CompletionClient {
        CompletionClient::new(base, "test-key".into(), "gpt-3.5-turbo".into())
            .with_backoff(Duration::from_millis(5))
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let c = CompletionClient::new("https://api.example.com/v1/", "k".into(), "m".into());
        assert_eq!(c.endpoint, "https://api.example.com/v1/chat/completions");
    }

    #[test]
    fn test_response_text_is_first_choice() {
        let response: CompletionResponse = serde_json::from_value(json!({
            "choices": [
                {"message": {"content": "first"}},
                {"message": {"content": "second"}}
            ]
        }))
        .unwrap();
        assert_eq!(response.text(), Some("first"));
    }

    #[tokio::test]
    async fn test_complete_returns_reply() {
        let (base, hits) = fake_api(0, StatusCode::OK).await;
        let reply = client(&base).complete("hello").await.unwrap();
        assert_eq!(reply, "echo: hello");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_server_errors_are_retried() {
        let (base, hits) = fake_api(2, StatusCode::SERVICE_UNAVAILABLE).await;
        let reply = client(&base).complete("again").await.unwrap();
        assert_eq!(reply, "echo: again");
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_three_attempts() {
        let (base, hits) = fake_api(10, StatusCode::TOO_MANY_REQUESTS).await;
        let err = client(&base).complete("x").await.unwrap_err();
        assert!(matches!(err, ChatError::Api { status: 429, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let (base, hits) = fake_api(10, StatusCode::UNAUTHORIZED).await;
        let err = client(&base).complete("x").await.unwrap_err();
        match err {
            ChatError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "busy");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
