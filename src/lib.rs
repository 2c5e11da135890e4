pub mod app;
pub mod cli;
pub mod constants;
pub mod models;
pub mod runtime;
pub mod session;
pub mod tui;
pub mod utils;

pub use app::{load_config, Config};
pub use models::{CompletionBackend, DeepSeekClient, Role, SessionConfig, Turn};
pub use session::{BlockKind, ConversationSession, HtmlSurface, RenderSurface, SubmitOutcome};
pub use utils::ChatError;
