/// LLM Client: the single point of entry for all chat-completion calls.
///
/// ARCHITECTURAL RULE: No other module may call the completion API directly.
/// Handlers receive a `CompletionService` through `AppState` and never build
/// HTTP requests themselves.
///
/// Backend: Groq's OpenAI-compatible chat-completions endpoint.
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;
pub mod sse;

use sse::{SseDecoder, SseEvent};

/// Fast model used for every feature in the free tier.
pub const MODEL_INSTANT: &str = "llama-3.1-8b-instant";
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

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

    #[error("Stream error: {0}")]
    Stream(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Service contract
// ────────────────────────────────────────────────────────────────────────────

/// Incrementally delivered completion text. Ends at the provider's end signal.
pub type TextStream = BoxStream<'static, Result<String, LlmError>>;

/// A single prompt plus the model parameters to run it with.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub model: &'static str,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(system: &str, prompt: String) -> Self {
        Self {
            system: system.to_string(),
            prompt,
            model: MODEL_INSTANT,
            temperature: 0.3,
            max_tokens: 2000,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// The text-completion service. Swap implementations without touching handlers.
///
/// Carried in `AppState` as `Arc<dyn CompletionService>`.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Returns the whole completion once the model has finished.
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;

    /// Opens a streamed completion. Errors before the first byte are returned
    /// directly; errors mid-stream arrive as stream items.
    async fn stream(&self, request: CompletionRequest) -> Result<TextStream, LlmError>;
}

/// Runs a completion and deserializes the reply as JSON.
/// The prompt must instruct the model to return valid JSON.
pub async fn complete_json<T: DeserializeOwned>(
    service: &dyn CompletionService,
    request: CompletionRequest,
) -> Result<T, LlmError> {
    let text = service.complete(request).await?;
    // Strip markdown code fences if the model wraps JSON in them
    let text = strip_json_fences(&text);
    serde_json::from_str(text).map_err(LlmError::Parse)
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
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
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP client
// ────────────────────────────────────────────────────────────────────────────

/// Chat-completions client with retry logic. Built once in `main`.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, api_url: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
            api_url,
        })
    }

    /// Posts a chat request, retrying on 429 (rate limit) and 5xx with exponential backoff.
    /// Returns the successful response with its body still unread.
    async fn send(&self, request: &CompletionRequest, stream: bool) -> Result<reqwest::Response, LlmError> {
        let body = ChatRequest {
            model: request.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream,
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.api_url)
                .bearer_auth(&self.api_key)
                .json(&body)
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
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
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
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            return Ok(response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl CompletionService for LlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let response: ChatResponse = self.send(&request, false).await?.json().await?;

        if let Some(usage) = &response.usage {
            debug!(
                model = request.model,
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or(LlmError::EmptyContent)
    }

    async fn stream(&self, request: CompletionRequest) -> Result<TextStream, LlmError> {
        let response = self.send(&request, true).await?;
        debug!(model = request.model, "LLM stream opened");
        Ok(decode_event_stream(response.bytes_stream()))
    }
}

/// Turns a raw server-sent-events byte stream into completion text deltas.
///
/// Stops at `[DONE]`; a transport error is yielded once and ends the stream.
fn decode_event_stream<S>(bytes: S) -> TextStream
where
    S: futures::Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
{
    let mut decoder = SseDecoder::default();
    bytes
        .map(move |chunk| -> Vec<Result<SseEvent, LlmError>> {
            match chunk {
                Ok(bytes) => decoder.push(&bytes).into_iter().map(Ok).collect(),
                Err(e) => vec![Err(LlmError::Http(e))],
            }
        })
        .flat_map(stream::iter)
        .take_while(|event| futures::future::ready(!matches!(event, Ok(SseEvent::Done))))
        .filter_map(|event| {
            futures::future::ready(match event {
                Ok(SseEvent::Delta(text)) if text.is_empty() => None,
                Ok(SseEvent::Delta(text)) => Some(Ok(text)),
                Ok(SseEvent::Done) => None,
                Ok(SseEvent::Failed(message)) => Some(Err(LlmError::Stream(message))),
                Ok(SseEvent::Malformed(line)) => {
                    Some(Err(LlmError::Stream(format!("unreadable chunk: {line}"))))
                }
                Err(e) => Some(Err(e)),
            })
        })
        .boxed()
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

#[cfg(test)]
pub mod testing {
    //! Scripted completion service for handler tests.

    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct FakeCompletion {
        pub reply: String,
        pub chunks: Vec<String>,
        pub fail: bool,
        pub requests: Mutex<Vec<CompletionRequest>>,
    }

    impl FakeCompletion {
        pub fn replying(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                ..Default::default()
            }
        }

        pub fn streaming(chunks: &[&str]) -> Self {
            Self {
                chunks: chunks.iter().map(|c| c.to_string()).collect(),
                ..Default::default()
            }
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        pub fn last_request(&self) -> Option<CompletionRequest> {
            self.requests.lock().ok()?.last().cloned()
        }

        fn record(&self, request: CompletionRequest) -> Result<(), LlmError> {
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request);
            }
            if self.fail {
                return Err(LlmError::Api {
                    status: 503,
                    message: "service unavailable".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl CompletionService for FakeCompletion {
        async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
            self.record(request)?;
            Ok(self.reply.clone())
        }

        async fn stream(&self, request: CompletionRequest) -> Result<TextStream, LlmError> {
            self.record(request)?;
            let chunks: Vec<Result<String, LlmError>> =
                self.chunks.iter().cloned().map(Ok).collect();
            Ok(stream::iter(chunks).boxed())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeCompletion;
    use super::*;

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
    fn test_request_builder_defaults() {
        let request = CompletionRequest::new("sys", "prompt".to_string())
            .temperature(0.7)
            .max_tokens(800);
        assert_eq!(request.model, MODEL_INSTANT);
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(request.max_tokens, 800);
    }

    #[test]
    fn test_chat_request_serializes_openai_shape() {
        let body = ChatRequest {
            model: MODEL_INSTANT,
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            temperature: 0.2,
            max_tokens: 10,
            stream: true,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "llama-3.1-8b-instant");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["stream"], true);
    }

    #[test]
    fn test_chat_response_without_usage_deserializes() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"hello"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("hello"));
        assert!(parsed.usage.is_none());
    }

    #[tokio::test]
    async fn test_complete_json_strips_fences() {
        #[derive(Deserialize)]
        struct Score {
            score: u32,
        }
        let fake = FakeCompletion::replying("```json\n{\"score\": 81}\n```");
        let parsed: Score = complete_json(&fake, CompletionRequest::new("s", "p".into()))
            .await
            .unwrap();
        assert_eq!(parsed.score, 81);
    }

    #[tokio::test]
    async fn test_complete_json_reports_parse_error() {
        let fake = FakeCompletion::replying("not json at all");
        let result: Result<serde_json::Value, _> =
            complete_json(&fake, CompletionRequest::new("s", "p".into())).await;
        assert!(matches!(result, Err(LlmError::Parse(_))));
    }

    #[tokio::test]
    async fn test_decode_event_stream_handles_split_chunks_and_done() {
        let raw: Vec<Result<Bytes, reqwest::Error>> = vec![
            Ok(Bytes::from_static(b"data: {\"choices\":[{\"delta\":{\"content\":\"Hel")),
            Ok(Bytes::from_static(
                b"lo\"}}]}\n\ndata: {\"choices\":[{\"delta\":{\"content\":\" world\"}}]}\n\n",
            )),
            Ok(Bytes::from_static(
                b"data: [DONE]\n\ndata: {\"choices\":[{\"delta\":{\"content\":\"late\"}}]}\n\n",
            )),
        ];
        let collected: Vec<String> = decode_event_stream(stream::iter(raw))
            .map(|item| item.unwrap())
            .collect()
            .await;
        assert_eq!(collected, vec!["Hello".to_string(), " world".to_string()]);
    }
}
