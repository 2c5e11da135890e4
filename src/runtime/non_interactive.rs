use anyhow::Result;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::{
    app::Config,
    cli::OutputFormat,
    constants::MODEL_ID,
    models::{CompletionBackend, DeepSeekClient, SessionConfig, Turn},
    session::{ConversationSession, HtmlSurface, SubmitOutcome},
};

/// Result of a non-interactive run
#[derive(Debug, Serialize, Deserialize)]
pub struct NonInteractiveResult {
    /// The prompt that was sent
    pub prompt: String,
    /// The assistant's reply, absent on failure
    pub response: Option<String>,
    /// Failure message, if the request did not succeed
    pub error: Option<String>,
    /// Transcript after the exchange
    pub transcript: Vec<Turn>,
    /// Metadata about the execution
    pub metadata: ExecutionMetadata,
    /// Rendered chat panel
    #[serde(skip)]
    pub html: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExecutionMetadata {
    pub model: String,
    pub endpoint: String,
    pub streamed: bool,
    /// Execution time in milliseconds
    pub duration_ms: u128,
}

/// Non-interactive runner for sending a single prompt
pub struct NonInteractiveRunner {
    session: ConversationSession<HtmlSurface>,
}

impl NonInteractiveRunner {
    /// Create a runner talking to the configured endpoint
    pub fn new(config: &Config) -> Result<Self> {
        let client = DeepSeekClient::with_timeout(Duration::from_secs(config.api.request_timeout_secs))?;
        Ok(Self::with_backend(Arc::new(client), config.session_config()?))
    }

    pub fn with_backend(backend: Arc<dyn CompletionBackend>, session_config: SessionConfig) -> Self {
        Self {
            session: ConversationSession::new(backend, session_config, HtmlSurface::new()),
        }
    }

    /// Send the prompt and collect the outcome
    pub async fn execute(&self, prompt: &str) -> NonInteractiveResult {
        let start_time = std::time::Instant::now();

        let (response, error) = match self.session.submit(prompt).await {
            SubmitOutcome::Replied(reply) => (Some(reply), None),
            SubmitOutcome::Failed(err) => (None, Some(err.to_string())),
            SubmitOutcome::Ignored => (None, Some("Prompt is empty".to_string())),
            SubmitOutcome::Busy | SubmitOutcome::Discarded => {
                (None, Some("Request did not complete".to_string()))
            }
        };

        let config = self.session.config();
        NonInteractiveResult {
            prompt: prompt.to_string(),
            response,
            error,
            transcript: self.session.history(),
            metadata: ExecutionMetadata {
                model: MODEL_ID.to_string(),
                endpoint: config.endpoint,
                streamed: config.stream,
                duration_ms: start_time.elapsed().as_millis(),
            },
            html: self.session.with_surface(|surface| surface.to_html()),
        }
    }

    /// Format the result according to the output format
    pub fn format_result(&self, result: &NonInteractiveResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(result).unwrap_or_else(|e| {
                format!("{{\"error\": \"Failed to serialize result: {}\"}}", e)
            }),
            OutputFormat::Html => result.html.clone(),
            OutputFormat::Text => match (&result.response, &result.error) {
                (Some(response), _) => response.clone(),
                (None, Some(error)) => format!("{} {}", "Error:".red().bold(), error),
                (None, None) => String::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MockCompletionBackend;
    use crate::utils::ChatError;

    fn runner(mock: MockCompletionBackend) -> NonInteractiveRunner {
        NonInteractiveRunner::with_backend(
            Arc::new(mock),
            SessionConfig::new("sk-test", "http://localhost:9"),
        )
    }

    #[tokio::test]
    async fn test_successful_prompt() {
        let mut mock = MockCompletionBackend::new();
        mock.expect_complete()
            .returning(|_, _, _| Ok("**Hello**".to_string()));
        let runner = runner(mock);

        let result = runner.execute("Hi").await;

        assert_eq!(result.response.as_deref(), Some("**Hello**"));
        assert!(result.error.is_none());
        assert_eq!(result.transcript.len(), 2);
        assert_eq!(runner.format_result(&result, OutputFormat::Text), "**Hello**");
        assert!(runner
            .format_result(&result, OutputFormat::Html)
            .contains("<strong>Hello</strong>"));
    }

    #[tokio::test]
    async fn test_failed_prompt_serializes_error() {
        let mut mock = MockCompletionBackend::new();
        mock.expect_complete()
            .returning(|_, _, _| Err(ChatError::api(401, Some("bad key".to_string()))));
        let runner = runner(mock);

        let result = runner.execute("Hi").await;
        let json: serde_json::Value =
            serde_json::from_str(&runner.format_result(&result, OutputFormat::Json)).unwrap();

        assert_eq!(json["error"], "bad key");
        assert!(json["response"].is_null());
        assert_eq!(json["transcript"].as_array().map(|t| t.len()), Some(1));
        assert_eq!(json["metadata"]["model"], "deepseek-chat");
    }

    #[tokio::test]
    async fn test_empty_prompt_never_calls_backend() {
        let mut mock = MockCompletionBackend::new();
        mock.expect_complete().times(0);
        let runner = runner(mock);

        let result = runner.execute("   ").await;
        assert_eq!(result.error.as_deref(), Some("Prompt is empty"));
        assert!(result.transcript.is_empty());
    }
}
