//! Chime Voice - speech session coordination for voice assistants
//!
//! This library coordinates the speech surface of a voice assistant:
//! - Synthesis and recognition over injected platform engines
//! - Per-axis Idle/Active session state (speaking, listening)
//! - Notification tones rendered from fixed burst schedules
//! - Language code to locale tag resolution
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                     Consumer                         │
//! │    speak  │  listen  │  stop  │  state queries      │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                 SpeechSession                        │
//! │   locale map  │  generations  │  tone schedules     │
//! └───────┬──────────────────┬──────────────┬───────────┘
//!         │                  │              │
//! ┌───────▼───────┐  ┌───────▼────────┐  ┌──▼──────────┐
//! │ SynthesisEngine│  │RecognitionEngine│  │  AudioSink  │
//! │   (injected)   │  │   (injected)    │  │   (cpal)    │
//! └───────────────┘  └────────────────┘  └─────────────┘
//! ```
//!
//! Engines report progress through per-operation event channels; the
//! session serializes each engine with a cancel-before-start discipline
//! and fails preempted outcomes explicitly.

pub mod config;
pub mod error;
pub mod locale;
pub mod playback;
pub mod recognition;
pub mod session;
pub mod synthesis;
pub mod tone;

pub use config::SpeechConfig;
pub use error::{Error, Result};
pub use playback::{AudioSink, CpalSink, NullSink, TonePlayer};
pub use recognition::{RecognitionEngine, RecognitionEvent, RecognitionEvents};
pub use session::SpeechSession;
pub use synthesis::{SynthesisEngine, SynthesisEvent, SynthesisEvents, Utterance};
pub use tone::{TONE_SAMPLE_RATE, ToneBurst, ToneKind, render_schedule, samples_to_wav};
