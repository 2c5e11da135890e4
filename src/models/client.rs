use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, warn};

use super::traits::CompletionBackend;
use super::types::{
    ChatCompletionResponse, CompletionRequest, ErrorBody, SessionConfig, StreamCallback,
    StreamChunk, Turn,
};
use crate::constants::{
    COMPLETIONS_PATH, HEALTH_CHECK_TIMEOUT_SECS, HTTP_REQUEST_TIMEOUT_SECS, MODELS_PATH,
};
use crate::utils::ChatError;

/// HTTP client for DeepSeek-compatible chat completion endpoints
pub struct DeepSeekClient {
    client: Client,
}

impl DeepSeekClient {
    /// Create a client with the default request timeout
    pub fn new() -> Result<Self, ChatError> {
        Self::with_timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Turn a non-2xx response into an API error, using `error.message` when present
    async fn api_error(response: Response) -> ChatError {
        let status = response.status().as_u16();
        let message = match response.text().await {
            Ok(body) => serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .and_then(|e| e.message),
            Err(e) => {
                warn!("Failed to read error body: {}", e);
                None
            }
        };
        ChatError::api(status, message)
    }

    async fn read_json(response: Response) -> Result<String, ChatError> {
        let body = response.text().await?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&body)?;
        parsed.into_first_content().ok_or(ChatError::EmptyResponse)
    }

    async fn read_stream(
        response: Response,
        on_delta: Option<StreamCallback>,
    ) -> Result<String, ChatError> {
        let mut stream = response.bytes_stream();
        let mut decoder = SseDecoder::default();
        let mut full_response = String::new();
        let mut saw_choice = false;

        let mut finished = false;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if apply_events(decoder.push(&chunk), &mut full_response, &mut saw_choice, &on_delta) {
                finished = true;
                break;
            }
        }
        if !finished {
            apply_events(decoder.finish(), &mut full_response, &mut saw_choice, &on_delta);
        }

        if !saw_choice {
            return Err(ChatError::EmptyResponse);
        }
        Ok(full_response)
    }
}

/// Fold decoded events into the reply; returns true once `[DONE]` is seen
fn apply_events(
    events: Vec<SseEvent>,
    full_response: &mut String,
    saw_choice: &mut bool,
    on_delta: &Option<StreamCallback>,
) -> bool {
    for event in events {
        let data = match event {
            SseEvent::Done => return true,
            SseEvent::Data(data) => data,
        };

        let parsed = match serde_json::from_str::<StreamChunk>(&data) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("Skipping unparseable stream chunk: {}", e);
                continue;
            }
        };

        if let Some(choice) = parsed.choices.into_iter().next() {
            *saw_choice = true;
            if let Some(delta) = choice.delta.content.filter(|d| !d.is_empty()) {
                full_response.push_str(&delta);
                if let Some(callback) = on_delta {
                    callback(&delta);
                }
            }
        }
    }
    false
}

/// Join the configured base URL and an API path
pub fn endpoint_url(endpoint: &str, path: &str) -> String {
    format!("{}{}", endpoint.trim_end_matches('/'), path)
}

#[async_trait]
impl CompletionBackend for DeepSeekClient {
    async fn complete(
        &self,
        config: &SessionConfig,
        messages: &[Turn],
        on_delta: Option<StreamCallback>,
    ) -> Result<String, ChatError> {
        let url = endpoint_url(&config.endpoint, COMPLETIONS_PATH);
        let body = CompletionRequest::new(messages, config.stream);

        debug!(
            "POST {} ({} messages, stream={})",
            url,
            messages.len(),
            config.stream
        );

        // `.json` also sets `Content-Type: application/json`
        let response = self
            .client
            .post(&url)
            .bearer_auth(&config.credential)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        // Some servers ignore the stream flag and answer with a plain body
        let is_event_stream = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("text/event-stream"));

        if config.stream && is_event_stream {
            Self::read_stream(response, on_delta).await
        } else {
            Self::read_json(response).await
        }
    }

    async fn validate_connection(&self, config: &SessionConfig) -> Result<bool, ChatError> {
        let url = endpoint_url(&config.endpoint, MODELS_PATH);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&config.credential)
            .timeout(Duration::from_secs(HEALTH_CHECK_TIMEOUT_SECS))
            .send()
            .await?;

        Ok(response.status().is_success())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SseEvent {
    Data(String),
    Done,
}

/// Line-buffered decoder for `data:` server-sent events.
///
/// Network chunks may split a line (or a UTF-8 sequence) anywhere, so bytes
/// are held until a newline arrives.
#[derive(Debug, Default)]
struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            events.extend(parse_line(&line));
        }
        events
    }

    /// Flush a last line the server did not terminate with a newline
    fn finish(&mut self) -> Vec<SseEvent> {
        let line = std::mem::take(&mut self.buffer);
        parse_line(&line).into_iter().collect()
    }
}

fn parse_line(line: &[u8]) -> Option<SseEvent> {
    let line = String::from_utf8_lossy(line);
    let line = line.trim_end_matches(['\n', '\r']);

    let data = line.strip_prefix("data:")?.trim_start();
    if data == "[DONE]" {
        Some(SseEvent::Done)
    } else if data.is_empty() {
        None
    } else {
        Some(SseEvent::Data(data.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_endpoint_url_trims_trailing_slash() {
        assert_eq!(
            endpoint_url("https://api.deepseek.com/v1/", COMPLETIONS_PATH),
            "https://api.deepseek.com/v1/chat/completions"
        );
        assert_eq!(
            endpoint_url("http://localhost:8080", MODELS_PATH),
            "http://localhost:8080/models"
        );
    }

    #[test]
    fn test_sse_decoder_handles_split_lines() {
        let mut decoder = SseDecoder::default();

        assert_eq!(decoder.push(b"data: {\"a\""), vec![]);
        assert_eq!(
            decoder.push(b":1}\r\n\r\ndata: [DONE]\n"),
            vec![SseEvent::Data("{\"a\":1}".to_string()), SseEvent::Done]
        );
    }

    #[test]
    fn test_sse_decoder_ignores_comments_and_other_fields() {
        let mut decoder = SseDecoder::default();
        let events = decoder.push(b": keep-alive\nevent: message\ndata:{}\n");
        assert_eq!(events, vec![SseEvent::Data("{}".to_string())]);
    }

    #[test]
    fn test_sse_decoder_keeps_multibyte_chars_across_chunks() {
        let mut decoder = SseDecoder::default();
        let bytes = "data: 你好\n".as_bytes();
        let (head, tail) = bytes.split_at(8); // inside the first character

        assert!(decoder.push(head).is_empty());
        assert_eq!(
            decoder.push(tail),
            vec![SseEvent::Data("你好".to_string())]
        );
    }

    #[test]
    fn test_sse_decoder_flushes_unterminated_last_line() {
        let mut decoder = SseDecoder::default();
        assert!(decoder.push(b"data: {\"b\":2}").is_empty());
        assert_eq!(decoder.finish(), vec![SseEvent::Data("{\"b\":2}".to_string())]);
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn test_apply_events_stops_at_done() {
        let mut full = String::new();
        let mut saw_choice = false;
        let events = vec![
            SseEvent::Data(r#"{"choices":[{"delta":{"content":"Hi"}}]}"#.to_string()),
            SseEvent::Done,
            SseEvent::Data(r#"{"choices":[{"delta":{"content":"!"}}]}"#.to_string()),
        ];

        assert!(apply_events(events, &mut full, &mut saw_choice, &None));
        assert_eq!(full, "Hi");
        assert!(saw_choice);
    }
}
