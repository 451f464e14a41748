//! OpenAI-compatible chat completions client.
//!
//! Blocking HTTP with a request timeout and bounded retries with exponential
//! backoff. Rate limits and server errors are retried; other client errors are not.

use std::env;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::client::{ChatClient, ChatMessage, ChatRequest, LlmError, LlmResult};

/// Default API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com";

/// Default model.
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable overriding the endpoint.
pub const ENDPOINT_ENV: &str = "OPENAI_BASE_URL";

/// Environment variable overriding the model.
pub const MODEL_ENV: &str = "POLICY_LENS_MODEL";

/// Default timeout for one request (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Client for `/v1/chat/completions`.
pub struct OpenAiClient {
    endpoint: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
    max_retries: u32,
    backoff_base: Duration,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiClient {
    /// Create a client for the default endpoint.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> LlmResult<Self> {
        Self::with_timeout(api_key, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> LlmResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey(API_KEY_ENV.to_string()));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key,
            model: model.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base: Duration::from_secs(1),
        })
    }

    /// Create a client from `OPENAI_API_KEY`, `OPENAI_BASE_URL` and `POLICY_LENS_MODEL`.
    pub fn from_env() -> LlmResult<Self> {
        let api_key =
            env::var(API_KEY_ENV).map_err(|_| LlmError::MissingApiKey(API_KEY_ENV.to_string()))?;
        let model = env::var(MODEL_ENV).unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let client = Self::new(api_key, model)?;
        Ok(match env::var(ENDPOINT_ENV) {
            Ok(endpoint) => client.with_endpoint(endpoint),
            Err(_) => client,
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the maximum number of attempts.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Delay before the second attempt; doubled for each further attempt.
    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/v1/chat/completions", self.endpoint)
    }

    fn send_once(&self, body: &CompletionRequest<'_>) -> Attempt {
        let response = match self
            .client
            .post(self.url())
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
        {
            Ok(response) => response,
            Err(e) => {
                return Attempt::Retry(LlmError::Communication(format!("Request failed: {}", e)))
            }
        };

        let status = response.status();
        if status.is_success() {
            return match response.text() {
                Ok(text) => Attempt::Done(parse_completion(&text)),
                Err(e) => Attempt::Done(Err(LlmError::InvalidResponse(format!(
                    "Failed to read response: {}",
                    e
                )))),
            };
        }

        let error_text = response
            .text()
            .unwrap_or_else(|_| "Unknown error".to_string());
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            Attempt::Retry(LlmError::RateLimited)
        } else if status.is_server_error() {
            Attempt::Retry(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )))
        } else {
            Attempt::Done(Err(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            ))))
        }
    }
}

enum Attempt {
    Done(LlmResult<String>),
    Retry(LlmError),
}

impl ChatClient for OpenAiClient {
    fn complete(&self, request: &ChatRequest) -> LlmResult<String> {
        let body = CompletionRequest {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            debug!(model = %self.model, attempt = attempts + 1, "chat completion request");
            match self.send_once(&body) {
                Attempt::Done(result) => return result,
                Attempt::Retry(error) => {
                    warn!(attempt = attempts + 1, error = %error, "chat completion failed");
                    last_error = Some(error);
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: base, 2 * base, 4 * base...
                thread::sleep(self.backoff_base * 2u32.pow(attempts - 1));
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

/// Extract the first choice's content from a completion response body.
pub fn parse_completion(body: &str) -> LlmResult<String> {
    let response: CompletionResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::InvalidResponse("No content in response".to_string()))
}
