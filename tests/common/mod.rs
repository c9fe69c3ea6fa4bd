//! Shared test utilities
//!
//! Fake engines and sinks so session behavior can be tested without
//! audio hardware or a real speech platform.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chime_voice::{
    AudioSink, Error, RecognitionEngine, RecognitionEvents, Result, SpeechSession,
    SynthesisEngine, SynthesisEvents, TonePlayer, Utterance,
};

/// Engine invocations, in call order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCall {
    Start,
    Cancel,
    Stop,
    Abort,
}

/// Synthesis engine fake that records calls and exposes event handles
pub struct FakeSynthesis {
    pub available: bool,
    pub fail_start: bool,
    /// Accept the utterance but immediately drop the events handle
    pub drop_events: bool,
    pub calls: Mutex<Vec<EngineCall>>,
    pub utterances: Mutex<Vec<Utterance>>,
    pub handles: Mutex<Vec<SynthesisEvents>>,
}

impl FakeSynthesis {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::unwrapped())
    }

    pub fn unavailable() -> Arc<Self> {
        let mut fake = Self::unwrapped();
        fake.available = false;
        Arc::new(fake)
    }

    pub fn failing() -> Arc<Self> {
        let mut fake = Self::unwrapped();
        fake.fail_start = true;
        Arc::new(fake)
    }

    pub fn dropping_events() -> Arc<Self> {
        let mut fake = Self::unwrapped();
        fake.drop_events = true;
        Arc::new(fake)
    }

    fn unwrapped() -> Self {
        Self {
            available: true,
            fail_start: false,
            drop_events: false,
            calls: Mutex::new(Vec::new()),
            utterances: Mutex::new(Vec::new()),
            handles: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn handle_count(&self) -> usize {
        self.handles.lock().unwrap().len()
    }

    pub fn handle(&self, index: usize) -> SynthesisEvents {
        self.handles.lock().unwrap()[index].clone()
    }

    pub fn utterance(&self, index: usize) -> Utterance {
        self.utterances.lock().unwrap()[index].clone()
    }
}

impl SynthesisEngine for FakeSynthesis {
    fn is_available(&self) -> bool {
        self.available
    }

    fn speak(&self, utterance: Utterance, events: SynthesisEvents) -> Result<()> {
        self.calls.lock().unwrap().push(EngineCall::Start);
        if self.fail_start {
            return Err(Error::Startup("synthesis engine busy".to_string()));
        }
        self.utterances.lock().unwrap().push(utterance);
        if !self.drop_events {
            self.handles.lock().unwrap().push(events);
        }
        Ok(())
    }

    fn cancel(&self) {
        self.calls.lock().unwrap().push(EngineCall::Cancel);
    }
}

/// Recognition engine fake that records calls and exposes event handles
pub struct FakeRecognition {
    pub available: bool,
    pub fail_start: bool,
    /// Accept the capture but immediately drop the events handle
    pub drop_events: bool,
    pub calls: Mutex<Vec<EngineCall>>,
    pub locales: Mutex<Vec<String>>,
    pub handles: Mutex<Vec<RecognitionEvents>>,
}

impl FakeRecognition {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::unwrapped())
    }

    pub fn unavailable() -> Arc<Self> {
        let mut fake = Self::unwrapped();
        fake.available = false;
        Arc::new(fake)
    }

    pub fn failing() -> Arc<Self> {
        let mut fake = Self::unwrapped();
        fake.fail_start = true;
        Arc::new(fake)
    }

    pub fn dropping_events() -> Arc<Self> {
        let mut fake = Self::unwrapped();
        fake.drop_events = true;
        Arc::new(fake)
    }

    fn unwrapped() -> Self {
        Self {
            available: true,
            fail_start: false,
            drop_events: false,
            calls: Mutex::new(Vec::new()),
            locales: Mutex::new(Vec::new()),
            handles: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn handle_count(&self) -> usize {
        self.handles.lock().unwrap().len()
    }

    pub fn handle(&self, index: usize) -> RecognitionEvents {
        self.handles.lock().unwrap()[index].clone()
    }

    pub fn locale(&self, index: usize) -> String {
        self.locales.lock().unwrap()[index].clone()
    }
}

impl RecognitionEngine for FakeRecognition {
    fn is_available(&self) -> bool {
        self.available
    }

    fn start(&self, locale: &str, events: RecognitionEvents) -> Result<()> {
        self.calls.lock().unwrap().push(EngineCall::Start);
        if self.fail_start {
            return Err(Error::Startup("capture already running".to_string()));
        }
        self.locales.lock().unwrap().push(locale.to_string());
        if !self.drop_events {
            self.handles.lock().unwrap().push(events);
        }
        Ok(())
    }

    fn stop(&self) {
        self.calls.lock().unwrap().push(EngineCall::Stop);
    }

    fn abort(&self) {
        self.calls.lock().unwrap().push(EngineCall::Abort);
    }
}

/// Sink that records played buffer lengths instead of producing audio
#[derive(Default)]
pub struct RecordingSink {
    pub played: Mutex<Vec<usize>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn played(&self) -> Vec<usize> {
        self.played.lock().unwrap().clone()
    }
}

#[async_trait]
impl AudioSink for RecordingSink {
    async fn play(&self, samples: Vec<f32>) -> Result<()> {
        self.played.lock().unwrap().push(samples.len());
        Ok(())
    }
}

/// Initialize test logging; `RUST_LOG` controls verbosity
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Build a session over fakes with tones discarded
pub fn setup_session(
    synthesis: Arc<FakeSynthesis>,
    recognition: Arc<FakeRecognition>,
) -> SpeechSession {
    init_tracing();
    SpeechSession::new(synthesis, recognition, TonePlayer::silent())
}

/// Poll a condition until it holds or the test times out
pub async fn wait_for(what: &str, mut condition: impl FnMut() -> bool) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("timed out waiting for {what}");
}
