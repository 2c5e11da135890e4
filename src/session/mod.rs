/// Session management module - Gateway

mod conversation;
mod format;
mod html;
mod surface;
mod transcript;

pub use conversation::{ConversationSession, SessionStatus, SubmitOutcome};
pub use format::{escape_html, format_assistant, render_block};
pub use html::{HtmlSurface, RenderedBlock};
pub use surface::{BlockKind, RenderSurface};
pub use transcript::Transcript;
