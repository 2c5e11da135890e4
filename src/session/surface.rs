use serde::{Deserialize, Serialize};

/// Visual kind of a rendered block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    User,
    Assistant,
    Error,
}

impl BlockKind {
    /// Label shown in front of the block content
    pub fn label(&self) -> &'static str {
        match self {
            BlockKind::User => "You",
            BlockKind::Assistant => "Assistant",
            BlockKind::Error => "Error",
        }
    }

    /// CSS class suffix, e.g. `user` for `user-message`
    pub fn css_name(&self) -> &'static str {
        match self {
            BlockKind::User => "user",
            BlockKind::Assistant => "assistant",
            BlockKind::Error => "error",
        }
    }
}

/// Capability the session renders onto (terminal, TUI, HTML, ...).
///
/// At most one pending indicator exists at a time; `clear_pending` is a
/// no-op when none is shown.
pub trait RenderSurface: Send {
    fn append_block(&mut self, kind: BlockKind, content: &str);

    fn show_pending(&mut self);

    fn clear_pending(&mut self);

    /// Remove every block, including the pending indicator
    fn clear_all(&mut self);

    /// Partial assistant text while a streamed reply is arriving
    fn stream_delta(&mut self, _fragment: &str) {}
}
