use async_trait::async_trait;

use super::types::{SessionConfig, StreamCallback, Turn};
use crate::utils::ChatError;

/// Core trait for anything that can answer a transcript with a completion
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send the whole transcript and return the assistant's reply.
    ///
    /// When `config.stream` is set, content deltas are passed to `on_delta`
    /// as they arrive; the returned string is still the complete reply.
    async fn complete(
        &self,
        config: &SessionConfig,
        messages: &[Turn],
        on_delta: Option<StreamCallback>,
    ) -> Result<String, ChatError>;

    /// Check that the endpoint is reachable and accepts the credential
    async fn validate_connection(&self, config: &SessionConfig) -> Result<bool, ChatError>;
}
