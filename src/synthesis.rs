//! Speech synthesis capability seam
//!
//! The platform synthesis engine is injected into the session as a trait
//! object rather than reached through ambient globals, so tests and
//! headless consumers can substitute their own.

use tokio::sync::mpsc;

use crate::Result;

/// A single synthesis request
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    /// Text to speak; empty text is passed through to the engine unmodified
    pub text: String,
    /// Full locale tag (e.g. "es-ES"), already resolved by the session
    pub locale: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// Progress events reported by the engine for one utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisEvent {
    /// Audio output began
    Started,
    /// Utterance finished naturally
    Ended,
    /// Engine failed mid-utterance
    Error(String),
}

/// Per-utterance event handle the session hands to the engine
///
/// Cloneable and cheap; sends are best-effort because the session may have
/// already moved on to a newer utterance.
#[derive(Debug, Clone)]
pub struct SynthesisEvents {
    tx: mpsc::UnboundedSender<SynthesisEvent>,
}

impl SynthesisEvents {
    /// Create an event handle and its receiving end
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SynthesisEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Report that audio output began
    pub fn started(&self) {
        let _ = self.tx.send(SynthesisEvent::Started);
    }

    /// Report natural completion
    pub fn ended(&self) {
        let _ = self.tx.send(SynthesisEvent::Ended);
    }

    /// Report a mid-utterance failure
    pub fn error(&self, message: impl Into<String>) {
        let _ = self.tx.send(SynthesisEvent::Error(message.into()));
    }
}

/// Platform speech synthesis capability
pub trait SynthesisEngine: Send + Sync {
    /// Whether synthesis is available on this platform
    fn is_available(&self) -> bool;

    /// Begin synthesizing one utterance
    ///
    /// Progress is reported through `events`. At most one utterance is
    /// active at a time; the session cancels before starting a new one.
    ///
    /// # Errors
    ///
    /// Returns error if the engine fails to start synchronously
    fn speak(&self, utterance: Utterance, events: SynthesisEvents) -> Result<()>;

    /// Cancel the active utterance, if any; idempotent
    fn cancel(&self);
}
