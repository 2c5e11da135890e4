// Gateway module for models - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod client;
mod traits;
mod types;

// Public re-exports - the ONLY way to access model functionality
pub use client::{endpoint_url, DeepSeekClient};
pub use traits::CompletionBackend;
pub use types::{CompletionRequest, Role, SessionConfig, StreamCallback, Turn};

#[cfg(test)]
pub use traits::MockCompletionBackend;
