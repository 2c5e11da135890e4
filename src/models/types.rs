use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::constants::{MAX_TOKENS, MODEL_ID, TEMPERATURE};

/// Who authored a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message exchanged in either direction.
///
/// Fields are private so a turn cannot change after it has been appended to
/// a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: Role,
    content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Connection settings of a conversation session
#[derive(Clone, PartialEq)]
pub struct SessionConfig {
    /// Bearer token sent with every request
    pub credential: String,
    /// Base URL, `/chat/completions` is appended
    pub endpoint: String,
    /// Ask the server for an SSE stream and consume it incrementally
    pub stream: bool,
}

impl SessionConfig {
    pub fn new(credential: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            credential: credential.into(),
            endpoint: endpoint.into(),
            stream: false,
        }
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }
}

// Keep the credential out of logs
impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("credential", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("stream", &self.stream)
            .finish()
    }
}

/// Request body for `POST {endpoint}/chat/completions`
#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'static str,
    pub messages: &'a [Turn],
    pub stream: bool,
    pub temperature: f32,
    pub max_tokens: usize,
}

impl<'a> CompletionRequest<'a> {
    pub fn new(messages: &'a [Turn], stream: bool) -> Self {
        Self {
            model: MODEL_ID,
            messages,
            stream,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }
}

/// Stream callback type for real-time response streaming
pub type StreamCallback = Arc<dyn Fn(&str) + Send + Sync>;

// Response structures (OpenAI-compatible format)

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if the server produced one
    pub fn into_first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StreamChunk {
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StreamChoice {
    pub delta: Delta,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Delta {
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let turns = vec![Turn::user("Hi"), Turn::assistant("Hello")];
        let body = serde_json::to_value(CompletionRequest::new(&turns, false)).unwrap();

        assert_eq!(
            body,
            json!({
                "model": "deepseek-chat",
                "messages": [
                    {"role": "user", "content": "Hi"},
                    {"role": "assistant", "content": "Hello"}
                ],
                "stream": false,
                "temperature": 0.7f32,
                "max_tokens": 2048
            })
        );
    }

    #[test]
    fn test_first_content() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "first"}},
                {"message": {"role": "assistant", "content": "second"}}
            ]
        }))
        .unwrap();
        assert_eq!(response.into_first_content().as_deref(), Some("first"));

        let empty: ChatCompletionResponse = serde_json::from_value(json!({"id": "x"})).unwrap();
        assert_eq!(empty.into_first_content(), None);
    }

    #[test]
    fn test_debug_redacts_credential() {
        let config = SessionConfig::new("sk-secret", "https://example.test");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("https://example.test"));
    }
}
