//! Chat client abstraction and a deterministic mock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// LLM errors.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Communication error: {0}")]
    Communication(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Missing API key: set {0}")]
    MissingApiKey(String),

    #[error("LLM error: {0}")]
    Other(String),
}

pub type LlmResult<T> = Result<T, LlmError>;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A chat completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature; the backend default when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ChatRequest {
    /// System prompt followed by one user message.
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Content of the last user message.
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}

/// Backend able to complete a chat request.
pub trait ChatClient {
    fn complete(&self, request: &ChatRequest) -> LlmResult<String>;
}

impl<C: ChatClient + ?Sized> ChatClient for &C {
    fn complete(&self, request: &ChatRequest) -> LlmResult<String> {
        (**self).complete(request)
    }
}

impl<C: ChatClient + ?Sized> ChatClient for Box<C> {
    fn complete(&self, request: &ChatRequest) -> LlmResult<String> {
        (**self).complete(request)
    }
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

/// Mock client for testing without network calls.
///
/// Replies are keyed by a substring of the last user message; the first
/// matching key in insertion order wins. Clones share call history.
#[derive(Debug, Clone)]
pub struct MockClient {
    default_response: String,
    replies: Vec<(String, MockReply)>,
    call_count: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockClient {
    /// Mock returning `response` for every request.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            replies: Vec::new(),
            call_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Reply with `response` when the user message contains `needle`.
    pub fn add_response(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        self.replies
            .push((needle.into(), MockReply::Text(response.into())));
    }

    /// Fail when the user message contains `needle`.
    pub fn add_error(&mut self, needle: impl Into<String>) {
        self.replies.push((needle.into(), MockReply::Error));
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl ChatClient for MockClient {
    fn complete(&self, request: &ChatRequest) -> LlmResult<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let user = request.last_user_message().unwrap_or_default();
        let reply = self
            .replies
            .iter()
            .find(|(needle, _)| user.contains(needle.as_str()))
            .map(|(_, reply)| reply);

        match reply {
            Some(MockReply::Text(text)) => Ok(text.clone()),
            Some(MockReply::Error) => Err(LlmError::Other("Mock error".to_string())),
            None => Ok(self.default_response.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest::new("system", "question").with_temperature(0.2);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "question");
        assert!((json["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);

        let plain = serde_json::to_value(ChatRequest::new("s", "u")).unwrap();
        assert!(plain.get("temperature").is_none());
    }

    #[test]
    fn test_mock_default_response() {
        let client = MockClient::new("Fixed response");
        let reply = client.complete(&ChatRequest::new("s", "anything")).unwrap();
        assert_eq!(reply, "Fixed response");
    }

    #[test]
    fn test_mock_keyed_responses() {
        let mut client = MockClient::default();
        client.add_response("franchise", "La franchise est de 300 CHF.");
        client.add_error("panne");

        assert_eq!(
            client
                .complete(&ChatRequest::new("s", "Quelle franchise ?"))
                .unwrap(),
            "La franchise est de 300 CHF."
        );
        assert!(matches!(
            client.complete(&ChatRequest::new("s", "panne réseau")),
            Err(LlmError::Other(_))
        ));
        assert_eq!(
            client.complete(&ChatRequest::new("s", "autre")).unwrap(),
            "Default mock response"
        );
    }

    #[test]
    fn test_mock_clones_share_history() {
        let client = MockClient::new("ok");
        let other = client.clone();

        client.complete(&ChatRequest::new("s", "first")).unwrap();
        other.complete(&ChatRequest::new("s", "second")).unwrap();

        assert_eq!(client.call_count(), 2);
        let requests = other.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].last_user_message(), Some("first"));
    }

    #[test]
    fn test_client_by_reference_and_box() {
        let client = MockClient::new("ok");
        let by_ref: &dyn ChatClient = &client;
        assert_eq!(by_ref.complete(&ChatRequest::new("s", "u")).unwrap(), "ok");

        let boxed: Box<dyn ChatClient> = Box::new(client.clone());
        assert_eq!(boxed.complete(&ChatRequest::new("s", "u")).unwrap(), "ok");
        assert_eq!(client.call_count(), 2);
    }
}
