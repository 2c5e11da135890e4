use std::sync::Arc;
use tokio::sync::mpsc;

use super::surface::{ChannelSurface, SurfaceEvent};
use super::theme::Theme;
use crate::session::{BlockKind, ConversationSession, SessionStatus};

/// Session type driven by the TUI
pub type TuiSession = ConversationSession<ChannelSurface>;

/// A block in the chat panel
#[derive(Debug, Clone)]
pub struct DisplayBlock {
    pub kind: BlockKind,
    pub content: String,
    pub timestamp: chrono::DateTime<chrono::Local>,
}

/// Application state
pub struct App {
    pub session: Arc<TuiSession>,
    events: mpsc::UnboundedReceiver<SurfaceEvent>,
    /// Rendered chat blocks, oldest first
    pub blocks: Vec<DisplayBlock>,
    /// Pending indicator with any streamed text so far
    pub pending: Option<String>,
    /// User input buffer
    pub input: String,
    /// Is the app running?
    pub running: bool,
    /// Lines scrolled up from the bottom of the chat view
    pub scroll_offset: u16,
    /// Status message
    pub status_message: Option<String>,
    /// Endpoint for display
    pub endpoint: String,
    pub theme: Theme,
}

impl App {
    /// Create a new app instance
    pub fn new(
        session: Arc<TuiSession>,
        events: mpsc::UnboundedReceiver<SurfaceEvent>,
        theme: Theme,
    ) -> Self {
        let endpoint = session.config().endpoint;
        Self {
            session,
            events,
            blocks: Vec::new(),
            pending: None,
            input: String::new(),
            running: true,
            scroll_offset: 0,
            status_message: None,
            endpoint,
            theme,
        }
    }

    /// Apply one rendering instruction from the session
    pub fn apply(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Append { kind, content } => {
                self.blocks.push(DisplayBlock {
                    kind,
                    content,
                    timestamp: chrono::Local::now(),
                });
                // Auto-scroll to bottom
                self.scroll_offset = 0;
            }
            SurfaceEvent::ShowPending => self.pending = Some(String::new()),
            SurfaceEvent::Delta(fragment) => {
                if let Some(partial) = self.pending.as_mut() {
                    partial.push_str(&fragment);
                }
            }
            SurfaceEvent::ClearPending => self.pending = None,
            SurfaceEvent::ClearAll => {
                self.blocks.clear();
                self.pending = None;
                self.scroll_offset = 0;
            }
        }
    }

    /// Apply every queued event; returns whether anything changed
    pub fn drain_events(&mut self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.events.try_recv() {
            self.apply(event);
            changed = true;
        }
        changed
    }

    pub fn is_waiting(&self) -> bool {
        self.session.status() == SessionStatus::AwaitingResponse
    }

    /// Send the input buffer as a user message on a background task
    pub fn submit_input(&mut self) {
        if self.input.trim().is_empty() {
            return;
        }
        if self.is_waiting() {
            self.set_status("Still waiting for the previous reply");
            return;
        }

        let text = std::mem::take(&mut self.input);
        let session = Arc::clone(&self.session);
        self.clear_status();

        tokio::spawn(async move {
            let outcome = session.submit(&text).await;
            tracing::debug!("Submit finished: {:?}", outcome);
        });
    }

    /// Reset the conversation
    pub fn clear_conversation(&mut self) {
        self.session.clear();
        self.set_status("Chat cleared");
    }

    /// Set status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Scroll chat view up; the renderer clamps to the content height
    pub fn scroll_up(&mut self, amount: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(amount);
    }

    /// Scroll chat view down
    pub fn scroll_down(&mut self, amount: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }
}
