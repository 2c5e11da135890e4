use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::surface::{BlockKind, RenderSurface};
use super::transcript::Transcript;
use crate::constants::{ERROR_PREFIX, GREETING};
use crate::models::{CompletionBackend, SessionConfig, StreamCallback, Turn};
use crate::utils::ChatError;

/// What happened to a submitted message
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Input was empty after trimming; nothing changed
    Ignored,
    /// Another request is still outstanding; nothing changed
    Busy,
    /// The assistant's reply was appended to the transcript
    Replied(String),
    /// The request failed and an error block was rendered
    Failed(ChatError),
    /// The conversation was cleared or replaced while the request was in flight
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    AwaitingResponse,
}

/// Releases the busy flag when the request finishes or its future is dropped
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Mediates between user input, the completion backend and a render surface.
///
/// The session is shared behind an `Arc` by the UI layer. Locks are only held
/// for short synchronous sections, never across the network call; when both
/// are needed the transcript is locked before the surface.
pub struct ConversationSession<S: RenderSurface> {
    backend: Arc<dyn CompletionBackend>,
    config: RwLock<SessionConfig>,
    transcript: Mutex<Transcript>,
    surface: Arc<Mutex<S>>,
    busy: AtomicBool,
    /// Bumped by `clear` and `replace_history` so replies to an abandoned
    /// conversation are dropped
    epoch: Arc<AtomicU64>,
}

impl<S: RenderSurface + 'static> ConversationSession<S> {
    pub fn new(backend: Arc<dyn CompletionBackend>, config: SessionConfig, surface: S) -> Self {
        Self {
            backend,
            config: RwLock::new(config),
            transcript: Mutex::new(Transcript::new()),
            surface: Arc::new(Mutex::new(surface)),
            busy: AtomicBool::new(false),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Send one user message and render the exchange
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SubmitOutcome::Ignored;
        }

        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            warn!("Rejected message while a reply is still pending");
            return SubmitOutcome::Busy;
        };

        let (messages, epoch) = {
            let mut transcript = self.transcript.lock();
            transcript.push(Turn::user(text));

            let mut surface = self.surface.lock();
            surface.append_block(BlockKind::User, text);
            surface.show_pending();

            (transcript.turns().to_vec(), self.epoch.load(Ordering::Acquire))
        };

        let config = self.config.read().clone();
        let on_delta = config.stream.then(|| self.delta_forwarder(epoch));

        debug!("Requesting completion for {} turns", messages.len());
        let result = self.backend.complete(&config, &messages, on_delta).await;

        let mut transcript = self.transcript.lock();
        if self.epoch.load(Ordering::Acquire) != epoch {
            debug!("Dropping reply for a conversation that was replaced");
            return SubmitOutcome::Discarded;
        }

        let mut surface = self.surface.lock();
        surface.clear_pending();

        match result {
            Ok(reply) => {
                transcript.push(Turn::assistant(reply.clone()));
                surface.append_block(BlockKind::Assistant, &reply);
                SubmitOutcome::Replied(reply)
            }
            Err(err) => {
                error!("Completion request failed: {}", err);
                surface.append_block(BlockKind::Error, &format!("{}{}", ERROR_PREFIX, err));
                SubmitOutcome::Failed(err)
            }
        }
    }

    fn delta_forwarder(&self, epoch: u64) -> StreamCallback {
        let surface = Arc::clone(&self.surface);
        let current = Arc::clone(&self.epoch);
        Arc::new(move |fragment: &str| {
            if current.load(Ordering::Acquire) == epoch {
                surface.lock().stream_delta(fragment);
            }
        })
    }

    /// Start over: empty transcript, empty panel, greeting only.
    ///
    /// The greeting is display-only and never sent to the server.
    pub fn clear(&self) {
        let mut transcript = self.transcript.lock();
        transcript.clear();
        self.epoch.fetch_add(1, Ordering::AcqRel);

        let mut surface = self.surface.lock();
        surface.clear_all();
        surface.append_block(BlockKind::Assistant, GREETING);
        info!("Conversation cleared");
    }

    /// Render the greeting without touching the transcript
    pub fn greet(&self) {
        self.surface.lock().append_block(BlockKind::Assistant, GREETING);
    }

    pub fn status(&self) -> SessionStatus {
        if self.busy.load(Ordering::Acquire) {
            SessionStatus::AwaitingResponse
        } else {
            SessionStatus::Idle
        }
    }

    /// Copy of the transcript
    pub fn history(&self) -> Vec<Turn> {
        self.transcript.lock().turns().to_vec()
    }

    /// Replace the transcript wholesale; the panel is left as is.
    ///
    /// A reply still in flight belongs to the old conversation and is dropped.
    pub fn replace_history(&self, turns: Vec<Turn>) {
        let mut transcript = self.transcript.lock();
        transcript.replace(turns);
        self.epoch.fetch_add(1, Ordering::AcqRel);
    }

    pub fn set_credential(&self, credential: impl Into<String>) {
        self.config.write().credential = credential.into();
    }

    pub fn set_endpoint(&self, endpoint: impl Into<String>) {
        self.config.write().endpoint = endpoint.into();
    }

    pub fn set_streaming(&self, stream: bool) {
        self.config.write().stream = stream;
    }

    pub fn config(&self) -> SessionConfig {
        self.config.read().clone()
    }

    /// Read the surface, e.g. to export what has been rendered
    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.surface.lock())
    }
}
