use tokio::sync::mpsc;

use crate::session::{BlockKind, RenderSurface};

/// Rendering instruction sent from the session to the UI loop
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Append { kind: BlockKind, content: String },
    ShowPending,
    Delta(String),
    ClearPending,
    ClearAll,
}

/// Render surface that forwards every call to the UI loop over a channel.
///
/// The session may run on another task, so nothing is drawn here.
pub struct ChannelSurface {
    tx: mpsc::UnboundedSender<SurfaceEvent>,
}

impl ChannelSurface {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SurfaceEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: SurfaceEvent) {
        // The receiver is gone once the UI has shut down
        if self.tx.send(event).is_err() {
            tracing::debug!("UI closed, dropping render event");
        }
    }
}

impl RenderSurface for ChannelSurface {
    fn append_block(&mut self, kind: BlockKind, content: &str) {
        self.send(SurfaceEvent::Append {
            kind,
            content: content.to_string(),
        });
    }

    fn show_pending(&mut self) {
        self.send(SurfaceEvent::ShowPending);
    }

    fn clear_pending(&mut self) {
        self.send(SurfaceEvent::ClearPending);
    }

    fn clear_all(&mut self) {
        self.send(SurfaceEvent::ClearAll);
    }

    fn stream_delta(&mut self, fragment: &str) {
        self.send(SurfaceEvent::Delta(fragment.to_string()));
    }
}
