//! Speech session coordination
//!
//! Tracks two independent axes, speaking and listening, each a small
//! Idle → Active → Idle machine. At most one synthesis utterance and one
//! recognition capture are active at a time; a new `speak` preempts the
//! previous one (cancel-before-start), and the preempted caller's outcome
//! settles with [`Error::Preempted`] instead of hanging.
//!
//! Engines are injected trait objects; event flow is channel-based, so the
//! session never holds a lock across an engine callback.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::oneshot;

use crate::config::SpeechConfig;
use crate::locale;
use crate::playback::TonePlayer;
use crate::recognition::{RecognitionEngine, RecognitionEvent, RecognitionEvents};
use crate::synthesis::{SynthesisEngine, SynthesisEvent, SynthesisEvents, Utterance};
use crate::tone::ToneKind;
use crate::{Error, Result};

type OnEnd = Box<dyn FnOnce() + Send>;

/// State shared between the session and its event-driver tasks
struct Shared {
    speaking: AtomicBool,
    listening: AtomicBool,
    /// Bumped per utterance; stale driver tasks must not touch state
    /// owned by a newer one
    speak_generation: AtomicU64,
    /// Bumped per capture, same discipline as `speak_generation`
    listen_generation: AtomicU64,
    /// Outcome sender for the in-flight utterance, tagged with its generation
    pending_speak: Mutex<Option<(u64, oneshot::Sender<Result<()>>)>>,
}

impl Shared {
    /// Settle the utterance outcome for `generation` and reset the
    /// speaking axis. Returns false when a newer utterance owns the axis.
    fn settle_speak(&self, generation: u64, outcome: Result<()>) -> bool {
        if self.speak_generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        self.speaking.store(false, Ordering::SeqCst);

        let mut slot = self.pending_speak.lock().unwrap();
        if let Some((tag, tx)) = slot.take() {
            if tag == generation {
                let _ = tx.send(outcome);
            } else {
                *slot = Some((tag, tx));
            }
        }
        true
    }
}

/// Coordinates speech synthesis and recognition over injected engines
///
/// The speaking and listening axes are independent and may overlap.
/// Dropping the session cancels any in-flight synthesis and capture so no
/// dangling callbacks fire after the consumer is gone.
pub struct SpeechSession {
    synthesis: Arc<dyn SynthesisEngine>,
    recognition: Arc<dyn RecognitionEngine>,
    tones: TonePlayer,
    config: SpeechConfig,
    shared: Arc<Shared>,
}

impl SpeechSession {
    /// Create a session with default configuration
    #[must_use]
    pub fn new(
        synthesis: Arc<dyn SynthesisEngine>,
        recognition: Arc<dyn RecognitionEngine>,
        tones: TonePlayer,
    ) -> Self {
        Self::with_config(synthesis, recognition, tones, SpeechConfig::default())
    }

    /// Create a session with explicit configuration
    #[must_use]
    pub fn with_config(
        synthesis: Arc<dyn SynthesisEngine>,
        recognition: Arc<dyn RecognitionEngine>,
        tones: TonePlayer,
        config: SpeechConfig,
    ) -> Self {
        Self {
            synthesis,
            recognition,
            tones,
            config,
            shared: Arc::new(Shared {
                speaking: AtomicBool::new(false),
                listening: AtomicBool::new(false),
                speak_generation: AtomicU64::new(0),
                listen_generation: AtomicU64::new(0),
                pending_speak: Mutex::new(None),
            }),
        }
    }

    /// Whether a synthesis utterance is currently active
    #[must_use]
    pub fn is_speaking(&self) -> bool {
        self.shared.speaking.load(Ordering::SeqCst)
    }

    /// Whether a recognition capture is currently active
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.shared.listening.load(Ordering::SeqCst)
    }

    /// Whether both platform capabilities are available
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.synthesis.is_available() && self.recognition.is_available()
    }

    /// Session configuration
    #[must_use]
    pub const fn config(&self) -> &SpeechConfig {
        &self.config
    }

    /// Speak text in the given language
    ///
    /// `lang` is resolved through the locale table; unknown codes pass
    /// through unchanged. A prior in-flight utterance is cancelled first
    /// and its outcome fails with [`Error::Preempted`]. The returned
    /// future settles on natural completion or engine failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] when synthesis is unavailable,
    /// [`Error::Preempted`] when a newer `speak` or stop takes over, or
    /// the engine's startup / mid-utterance error.
    pub async fn speak(&self, text: &str, lang: &str) -> Result<()> {
        self.speak_inner(text, lang, None).await
    }

    /// Like [`Self::speak`], with a callback invoked on natural completion
    ///
    /// The callback does not fire on preemption or engine failure.
    ///
    /// # Errors
    ///
    /// Same as [`Self::speak`]
    pub async fn speak_with<F>(&self, text: &str, lang: &str, on_end: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.speak_inner(text, lang, Some(Box::new(on_end))).await
    }

    async fn speak_inner(&self, text: &str, lang: &str, on_end: Option<OnEnd>) -> Result<()> {
        if !self.synthesis.is_available() {
            return Err(Error::Unsupported("speech synthesis"));
        }

        let generation = self.shared.speak_generation.fetch_add(1, Ordering::SeqCst) + 1;

        // Cancel-before-start: at most one utterance may be active
        let preempted = self.shared.pending_speak.lock().unwrap().take();
        if let Some((_, tx)) = preempted {
            self.synthesis.cancel();
            self.shared.speaking.store(false, Ordering::SeqCst);
            let _ = tx.send(Err(Error::Preempted));
            tracing::debug!("preempted in-flight utterance");
        }

        let utterance = Utterance {
            text: text.to_string(),
            locale: locale::resolve(lang).to_string(),
            rate: self.config.rate,
            pitch: self.config.pitch,
            volume: self.config.volume,
        };

        let (events, mut rx) = SynthesisEvents::channel();
        let (done_tx, done_rx) = oneshot::channel();
        *self.shared.pending_speak.lock().unwrap() = Some((generation, done_tx));

        if let Err(e) = self.synthesis.speak(utterance, events) {
            let mut slot = self.shared.pending_speak.lock().unwrap();
            if slot.as_ref().is_some_and(|(tag, _)| *tag == generation) {
                *slot = None;
            }
            drop(slot);
            tracing::warn!(error = %e, "synthesis failed to start");
            return Err(e);
        }

        let shared = Arc::clone(&self.shared);
        let tones = self.tones.clone();
        tokio::spawn(async move {
            let mut on_end = on_end;
            loop {
                let Some(event) = rx.recv().await else {
                    // Engine dropped its handle without a terminal event;
                    // treat the closed channel as an engine failure so the
                    // caller's outcome settles
                    if shared.settle_speak(
                        generation,
                        Err(Error::Engine("event channel closed".to_string())),
                    ) {
                        tracing::warn!(generation, "synthesis event channel closed");
                    }
                    break;
                };
                match event {
                    SynthesisEvent::Started => {
                        if shared.speak_generation.load(Ordering::SeqCst) == generation {
                            shared.speaking.store(true, Ordering::SeqCst);
                            tones.play(ToneKind::Speak);
                            tracing::trace!(generation, "synthesis started");
                        }
                    }
                    SynthesisEvent::Ended => {
                        if shared.settle_speak(generation, Ok(())) {
                            if let Some(f) = on_end.take() {
                                f();
                            }
                            tracing::debug!(generation, "synthesis complete");
                        }
                        break;
                    }
                    SynthesisEvent::Error(message) => {
                        shared.settle_speak(generation, Err(Error::Engine(message)));
                        break;
                    }
                }
            }
        });

        match done_rx.await {
            Ok(outcome) => outcome,
            // Sender dropped without settling: the session went away
            Err(_) => Err(Error::Preempted),
        }
    }

    /// Capture one utterance and deliver its transcript
    ///
    /// Single-shot: the capture ends after the first result and does not
    /// restart. Exactly one of `on_result` / `on_error` fires, or neither
    /// when the capture ends silent or is stopped. When recognition is
    /// unavailable, `on_error` is invoked synchronously and the listening
    /// state is untouched. A synchronous engine start failure is also
    /// surfaced to `on_error`, after the listening state is reset.
    ///
    /// Must be called within a tokio runtime.
    pub fn listen<R, E>(&self, on_result: R, on_error: E)
    where
        R: FnOnce(String) + Send + 'static,
        E: FnOnce(Error) + Send + 'static,
    {
        if !self.recognition.is_available() {
            on_error(Error::Unsupported("speech recognition"));
            return;
        }

        let generation = self.shared.listen_generation.fetch_add(1, Ordering::SeqCst) + 1;

        self.tones.play(ToneKind::Listen);
        self.shared.listening.store(true, Ordering::SeqCst);

        let (events, mut rx) = RecognitionEvents::channel();
        if let Err(e) = self.recognition.start(&self.config.source_locale, events) {
            self.shared.listening.store(false, Ordering::SeqCst);
            tracing::warn!(error = %e, "recognition failed to start");
            on_error(e);
            return;
        }

        let shared = Arc::clone(&self.shared);
        let tones = self.tones.clone();
        tokio::spawn(async move {
            let mut on_result = Some(on_result);
            let mut on_error = Some(on_error);
            loop {
                let Some(event) = rx.recv().await else {
                    // Closed channel without a terminal event: surface it as
                    // an engine failure so the axis cannot stay Active forever
                    if shared.listen_generation.load(Ordering::SeqCst) == generation {
                        tones.play(ToneKind::Error);
                        shared.listening.store(false, Ordering::SeqCst);
                        tracing::warn!(generation, "recognition event channel closed");
                        if let Some(f) = on_error.take() {
                            f(Error::Engine("event channel closed".to_string()));
                        }
                    }
                    break;
                };
                // A newer capture (or an explicit stop) owns the axis now
                if shared.listen_generation.load(Ordering::SeqCst) != generation {
                    break;
                }
                match event {
                    RecognitionEvent::Transcript(text) => {
                        tones.play(ToneKind::Complete);
                        shared.listening.store(false, Ordering::SeqCst);
                        tracing::info!(transcript = %text, "recognition complete");
                        if let Some(f) = on_result.take() {
                            f(text);
                        }
                        break;
                    }
                    RecognitionEvent::Error(message) => {
                        tones.play(ToneKind::Error);
                        shared.listening.store(false, Ordering::SeqCst);
                        tracing::warn!(error = %message, "recognition error");
                        if let Some(f) = on_error.take() {
                            f(Error::Engine(message));
                        }
                        break;
                    }
                    RecognitionEvent::Ended => {
                        shared.listening.store(false, Ordering::SeqCst);
                        tracing::trace!(generation, "capture ended without result");
                        break;
                    }
                }
            }
        });
    }

    /// Abort an in-progress capture without firing callbacks
    ///
    /// No-op when nothing is listening.
    pub fn stop_listening(&self) {
        self.recognition.abort();
        self.shared.listen_generation.fetch_add(1, Ordering::SeqCst);
        self.shared.listening.store(false, Ordering::SeqCst);
    }

    /// Cancel any active synthesis immediately; idempotent
    ///
    /// A pending `speak` outcome fails with [`Error::Preempted`].
    pub fn stop_speaking(&self) {
        self.synthesis.cancel();
        self.shared.speak_generation.fetch_add(1, Ordering::SeqCst);
        let taken = self.shared.pending_speak.lock().unwrap().take();
        if let Some((_, tx)) = taken {
            let _ = tx.send(Err(Error::Preempted));
        }
        self.shared.speaking.store(false, Ordering::SeqCst);
    }

    /// Cancel both axes; used on teardown
    pub fn close(&self) {
        self.stop_speaking();
        self.stop_listening();
    }
}

impl Drop for SpeechSession {
    fn drop(&mut self) {
        self.close();
    }
}
