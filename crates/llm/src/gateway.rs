//! HTTP client for an OpenAI-compatible chat-completions gateway.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use pipeline::{ChatError, ChatMessage, CompletionClient, ModelName};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

/// Default completion endpoint.
pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";

/// Default model requested from the gateway.
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// Default per-call deadline.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(45);

/// Longest slice of an error response body written to the log.
const MAX_LOGGED_BODY_CHARS: usize = 512;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Connection settings for [`GatewayClient`].
#[derive(Clone)]
pub struct GatewayConfig {
    url: String,
    api_key: String,
    model: ModelName,
    call_timeout: Duration,
}

impl GatewayConfig {
    /// Creates a configuration for the default endpoint and deadline.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Configuration`] if `api_key` is blank.
    pub fn new(api_key: impl Into<String>, model: ModelName) -> Result<Self, ChatError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ChatError::configuration(
                "AI gateway API key is not configured",
            ));
        }
        Ok(Self {
            url: DEFAULT_GATEWAY_URL.to_string(),
            api_key,
            model,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        })
    }

    /// Overrides the endpoint URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Overrides the per-call deadline.
    #[must_use]
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// The endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The requested model.
    pub fn model(&self) -> &ModelName {
        &self.model
    }

    /// The per-call deadline.
    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("call_timeout", &self.call_timeout)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Failure classification
// ---------------------------------------------------------------------------

/// Why a gateway call failed, with enough detail for the log.
///
/// Collapsed into the caller-facing [`ChatError`] variants at the port boundary.
#[derive(Debug, Error)]
enum GatewayFailure {
    #[error("gateway rate limited the request")]
    RateLimited,

    #[error("gateway reports credits exhausted")]
    CreditsExhausted,

    #[error("gateway returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("gateway call exceeded the {0:?} deadline")]
    Timeout(Duration),

    #[error("gateway request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("gateway response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("gateway response has no textual content")]
    EmptyContent,
}

impl From<GatewayFailure> for ChatError {
    fn from(failure: GatewayFailure) -> Self {
        match failure {
            GatewayFailure::RateLimited => ChatError::RateLimited,
            GatewayFailure::CreditsExhausted => ChatError::CreditsExhausted,
            other => ChatError::service_unavailable(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// [`CompletionClient`] over the gateway's chat-completions endpoint.
///
/// One request per call, `stream: false`, no retries. Cheap to share behind an
/// `Arc`; the underlying connection pool is reused across invocations.
pub struct GatewayClient {
    http: reqwest::Client,
    config: GatewayConfig,
}

impl GatewayClient {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: GatewayConfig) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder()
            .timeout(config.call_timeout)
            .build()
            .map_err(|e| ChatError::configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    async fn send(&self, messages: &[ChatMessage]) -> Result<String, GatewayFailure> {
        let body = CompletionRequest {
            model: self.config.model.as_str(),
            messages,
            stream: false,
        };

        let response = self
            .http
            .post(&self.config.url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify_transport(e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GatewayFailure::RateLimited);
        }
        if status == StatusCode::PAYMENT_REQUIRED {
            return Err(GatewayFailure::CreditsExhausted);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GatewayFailure::Status {
                status: status.as_u16(),
                body: text.chars().take(MAX_LOGGED_BODY_CHARS).collect(),
            });
        }

        let parsed: CompletionResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                GatewayFailure::Timeout(self.config.call_timeout)
            } else {
                GatewayFailure::Decode(e)
            }
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(GatewayFailure::EmptyContent)
    }

    fn classify_transport(&self, err: reqwest::Error) -> GatewayFailure {
        if err.is_timeout() {
            GatewayFailure::Timeout(self.config.call_timeout)
        } else {
            GatewayFailure::Transport(err)
        }
    }
}

#[async_trait]
impl CompletionClient for GatewayClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        let started = Instant::now();
        debug!(
            model = %self.config.model,
            messages = messages.len(),
            "Calling completion gateway"
        );

        match self.send(messages).await {
            Ok(content) => {
                debug!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    chars = content.chars().count(),
                    "Completion gateway call succeeded"
                );
                Ok(content)
            }
            Err(failure) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                match &failure {
                    GatewayFailure::RateLimited | GatewayFailure::CreditsExhausted => {
                        warn!(elapsed_ms, error = %failure, "Completion gateway refused the call")
                    }
                    _ => error!(elapsed_ms, error = %failure, "Completion gateway call failed"),
                }
                Err(failure.into())
            }
        }
    }
}
