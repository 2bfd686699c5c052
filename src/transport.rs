use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::error::{MixCheckError, Result};
use crate::models::{CompletionRequest, CompletionResponse};

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Applied to the whole request. The original behavior had no timeout at all;
/// this is a deliberate production hardening, configurable via config.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn chat(&self, req: &CompletionRequest) -> Result<CompletionResponse>;
}

// Groq wraps non-2xx responses in {"error": {"message": ...}}
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Extract the service's own error message from a failure body, falling back
/// to a generic message when the envelope is missing or unreadable.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|error| error.message)
        .unwrap_or_else(|| "API request failed".to_string())
}

pub struct GroqTransport {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl GroqTransport {
    /// Credentials are passed in explicitly; the transport never reads the
    /// environment itself.
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            endpoint: GROQ_API_URL.to_string(),
        })
    }

    /// Redirect the transport at a different endpoint (test servers).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl CompletionTransport for GroqTransport {
    async fn chat(&self, req: &CompletionRequest) -> Result<CompletionResponse> {
        // Missing credential fails before any network I/O.
        if self.api_key.trim().is_empty() {
            return Err(MixCheckError::Configuration(
                "GROQ_API_KEY is not set".to_string(),
            ));
        }

        // Single attempt per user-initiated analysis; the user retries by
        // resubmitting, so there is no retry loop here.
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(req)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| String::new());
            let message = upstream_message(&body);
            tracing::warn!(status = status.as_u16(), %message, "Groq API returned an error");
            return Err(MixCheckError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}
