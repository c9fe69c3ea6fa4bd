//! Speech recognition capability seam
//!
//! Single-shot capture: one utterance in, one transcript (or one error)
//! out. Continuous and interim modes are deliberately absent.

use tokio::sync::mpsc;

use crate::Result;

/// Events reported by the engine for one capture session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// A transcript was recognized
    Transcript(String),
    /// Capture failed (no speech, permission denied, network, ...)
    Error(String),
    /// Capture session ended without further results
    Ended,
}

/// Per-capture event handle the session hands to the engine
#[derive(Debug, Clone)]
pub struct RecognitionEvents {
    tx: mpsc::UnboundedSender<RecognitionEvent>,
}

impl RecognitionEvents {
    /// Create an event handle and its receiving end
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RecognitionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Report a recognized transcript
    pub fn transcript(&self, text: impl Into<String>) {
        let _ = self.tx.send(RecognitionEvent::Transcript(text.into()));
    }

    /// Report a capture failure
    pub fn error(&self, message: impl Into<String>) {
        let _ = self.tx.send(RecognitionEvent::Error(message.into()));
    }

    /// Report that the capture session ended
    pub fn ended(&self) {
        let _ = self.tx.send(RecognitionEvent::Ended);
    }
}

/// Platform speech recognition capability
pub trait RecognitionEngine: Send + Sync {
    /// Whether recognition is available on this platform
    fn is_available(&self) -> bool;

    /// Begin a single-shot capture in the given source locale
    ///
    /// # Errors
    ///
    /// Returns error if the engine fails to start synchronously
    /// (e.g. a capture is already running)
    fn start(&self, locale: &str, events: RecognitionEvents) -> Result<()>;

    /// Finish the capture gracefully, delivering any pending result
    fn stop(&self);

    /// Discard the capture; no further events should be delivered
    fn abort(&self);
}
