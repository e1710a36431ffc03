//! HTTP completion client for the remote providers, plus a mock for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::config::ProviderEndpoint;

use super::types::CompletionClient;
use super::AdvisorError;

/// Blocking chat-completions client for one configured provider endpoint.
pub struct HttpCompletionClient {
    endpoint: ProviderEndpoint,
    client: reqwest::blocking::Client,
}

impl HttpCompletionClient {
    pub fn new(endpoint: ProviderEndpoint) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(endpoint.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");
        Self { endpoint, client }
    }

    fn unavailable(&self, reason: impl Into<String>) -> AdvisorError {
        AdvisorError::ProviderUnavailable {
            provider: self.endpoint.name.clone(),
            reason: reason.into(),
        }
    }
}

/// Request body for POST {base_url}/chat/completions
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl CompletionClient for HttpCompletionClient {
    fn complete(&self, prompt: &str) -> Result<String, AdvisorError> {
        let url = format!("{}/chat/completions", self.endpoint.base_url);
        let body = ChatRequest {
            model: &self.endpoint.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            max_tokens: self.endpoint.max_tokens,
            temperature: self.endpoint.temperature,
        };

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.endpoint.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().map_err(|e| {
            if e.is_connect() {
                self.unavailable(format!("cannot reach {}", self.endpoint.base_url))
            } else if e.is_timeout() {
                self.unavailable(format!("timed out after {}s", self.endpoint.timeout_secs))
            } else {
                self.unavailable(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(self.unavailable(format!("status {}: {body}", status.as_u16())));
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| self.unavailable(format!("unreadable response body: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        // An empty completion counts as a provider failure, not as content
        if content.trim().is_empty() {
            return Err(self.unavailable("empty response"));
        }
        Ok(content)
    }

    fn name(&self) -> &str {
        &self.endpoint.name
    }
}

/// Scripted response for the mock client.
pub enum MockReply {
    Ok(String),
    Fail(String),
}

/// Mock completion client — plays back scripted replies and counts calls.
///
/// When the script runs out the last reply repeats, so single-reply mocks
/// behave like a stable provider.
pub struct MockCompletionClient {
    name: String,
    script: Mutex<VecDeque<MockReply>>,
    last: Mutex<Option<MockReply>>,
    calls: AtomicUsize,
}

impl MockCompletionClient {
    pub fn ok(name: &str, response: &str) -> Self {
        Self::scripted(name, vec![MockReply::Ok(response.to_string())])
    }

    pub fn failing(name: &str, reason: &str) -> Self {
        Self::scripted(name, vec![MockReply::Fail(reason.to_string())])
    }

    pub fn scripted(name: &str, replies: Vec<MockReply>) -> Self {
        Self {
            name: name.to_string(),
            script: Mutex::new(replies.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CompletionClient for MockCompletionClient {
    fn complete(&self, _prompt: &str) -> Result<String, AdvisorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut script = self.script.lock().expect("mock script lock");
        let mut last = self.last.lock().expect("mock last lock");
        if let Some(reply) = script.pop_front() {
            *last = Some(match &reply {
                MockReply::Ok(s) => MockReply::Ok(s.clone()),
                MockReply::Fail(s) => MockReply::Fail(s.clone()),
            });
            return reply_to_result(&self.name, &reply);
        }
        match &*last {
            Some(reply) => reply_to_result(&self.name, reply),
            None => Err(AdvisorError::ProviderUnavailable {
                provider: self.name.clone(),
                reason: "mock script empty".into(),
            }),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn reply_to_result(name: &str, reply: &MockReply) -> Result<String, AdvisorError> {
    match reply {
        MockReply::Ok(s) => Ok(s.clone()),
        MockReply::Fail(reason) => Err(AdvisorError::ProviderUnavailable {
            provider: name.to_string(),
            reason: reason.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_configured_response() {
        let client = MockCompletionClient::ok("mock", "a plan");
        assert_eq!(client.complete("prompt").unwrap(), "a plan");
        assert_eq!(client.call_count(), 1);
    }

    #[test]
    fn mock_failure_is_provider_unavailable() {
        let client = MockCompletionClient::failing("mock", "timeout");
        let err = client.complete("prompt").unwrap_err();
        assert!(matches!(err, AdvisorError::ProviderUnavailable { .. }));
    }

    #[test]
    fn mock_script_plays_in_order_then_repeats() {
        let client = MockCompletionClient::scripted(
            "mock",
            vec![MockReply::Fail("first down".into()), MockReply::Ok("second up".into())],
        );
        assert!(client.complete("p").is_err());
        assert_eq!(client.complete("p").unwrap(), "second up");
        // Script exhausted — last reply repeats
        assert_eq!(client.complete("p").unwrap(), "second up");
        assert_eq!(client.call_count(), 3);
    }

    #[test]
    fn chat_request_serializes_expected_shape() {
        let body = ChatRequest {
            model: "test-model",
            messages: vec![ChatMessage { role: "user", content: "hello" }],
            max_tokens: 100,
            temperature: 0.5,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"model\":\"test-model\""));
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"max_tokens\":100"));
    }

    #[test]
    fn chat_response_deserializes() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": "hi"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.choices[0].message.content, "hi");
    }

    #[test]
    fn http_client_constructor_keeps_endpoint_name() {
        let client =
            HttpCompletionClient::new(ProviderEndpoint::new("primary", "https://x.test/v1", "m"));
        assert_eq!(client.name(), "primary");
    }
}
