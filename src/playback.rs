//! Audio output for notification tones

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::time::Duration;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, StreamConfig};

use crate::tone::{TONE_SAMPLE_RATE, ToneKind, render_schedule};
use crate::{Error, Result};

/// Audio output seam
///
/// Injected into [`TonePlayer`] so tests and headless consumers can
/// substitute a sink that never touches real hardware.
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// Play mono f32 samples at [`TONE_SAMPLE_RATE`] to completion
    ///
    /// # Errors
    ///
    /// Returns error if the audio subsystem fails
    async fn play(&self, samples: Vec<f32>) -> Result<()>;
}

/// Sink that discards all audio
///
/// For consumers without an output device (CI, servers).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

#[async_trait]
impl AudioSink for NullSink {
    async fn play(&self, _samples: Vec<f32>) -> Result<()> {
        Ok(())
    }
}

/// Plays audio on the default output device
///
/// The output configuration is negotiated once at construction; the device
/// handle itself is reacquired per play since streams are short-lived.
pub struct CpalSink {
    config: StreamConfig,
}

impl CpalSink {
    /// Create a sink bound to the default output device
    ///
    /// # Errors
    ///
    /// Returns error if no output device or suitable config exists
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Audio("no output device available".to_string()))?;

        let supported_config = device
            .supported_output_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .find(|c| {
                c.channels() == 1
                    && c.min_sample_rate() <= SampleRate(TONE_SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(TONE_SAMPLE_RATE)
            })
            .or_else(|| {
                // Fallback: try stereo
                device.supported_output_configs().ok()?.find(|c| {
                    c.channels() == 2
                        && c.min_sample_rate() <= SampleRate(TONE_SAMPLE_RATE)
                        && c.max_sample_rate() >= SampleRate(TONE_SAMPLE_RATE)
                })
            })
            .ok_or_else(|| Error::Audio("no suitable output config found".to_string()))?;

        let config = supported_config
            .with_sample_rate(SampleRate(TONE_SAMPLE_RATE))
            .config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = TONE_SAMPLE_RATE,
            channels = config.channels,
            "audio output initialized"
        );

        Ok(Self { config })
    }
}

#[async_trait]
impl AudioSink for CpalSink {
    async fn play(&self, samples: Vec<f32>) -> Result<()> {
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || play_blocking(&config, &samples))
            .await
            .map_err(|e| Error::Audio(e.to_string()))?
    }
}

/// Play samples through a fresh output stream, blocking until done
fn play_blocking(config: &StreamConfig, samples: &[f32]) -> Result<()> {
    if samples.is_empty() {
        return Ok(());
    }

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| Error::Audio("no output device".to_string()))?;

    let channels = config.channels as usize;
    let source: Arc<[f32]> = Arc::from(samples);
    let position = Arc::new(AtomicUsize::new(0));
    let (done_tx, done_rx) = mpsc::channel::<()>();

    let stream_source = Arc::clone(&source);
    let stream_position = Arc::clone(&position);

    let stream = device
        .build_output_stream(
            config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    let pos = stream_position.load(Ordering::Relaxed);
                    let sample = if pos < stream_source.len() {
                        stream_position.store(pos + 1, Ordering::Relaxed);
                        stream_source[pos]
                    } else {
                        let _ = done_tx.send(());
                        0.0
                    };

                    for out in frame.iter_mut() {
                        *out = sample;
                    }
                }
            },
            |err| {
                tracing::error!(error = %err, "audio output error");
            },
            None,
        )
        .map_err(|e| Error::Audio(e.to_string()))?;

    stream.play().map_err(|e| Error::Audio(e.to_string()))?;

    // Wait for the stream to drain, bounded by the tone's own duration
    let duration_ms = (source.len() as u64 * 1000) / u64::from(TONE_SAMPLE_RATE);
    let timeout = Duration::from_millis(duration_ms + 500);
    let _ = done_rx.recv_timeout(timeout);

    // Let the tail of the buffer reach the speaker
    std::thread::sleep(Duration::from_millis(100));

    drop(stream);
    tracing::trace!(samples = source.len(), "tone playback complete");

    Ok(())
}

/// Fire-and-forget notification tone playback
///
/// `play` never blocks the caller and never surfaces audio failures;
/// a broken output device degrades to silence plus a log line.
#[derive(Clone)]
pub struct TonePlayer {
    sink: Arc<dyn AudioSink>,
}

impl TonePlayer {
    /// Create a player over the given sink
    #[must_use]
    pub fn new(sink: Arc<dyn AudioSink>) -> Self {
        Self { sink }
    }

    /// Create a player that discards audio
    #[must_use]
    pub fn silent() -> Self {
        Self::new(Arc::new(NullSink))
    }

    /// Play the tone for an event kind
    ///
    /// Must be called within a tokio runtime.
    pub fn play(&self, kind: ToneKind) {
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            let samples = render_schedule(kind, TONE_SAMPLE_RATE);
            if let Err(e) = sink.play(samples).await {
                tracing::warn!(error = %e, ?kind, "notification tone failed");
            }
        });
    }
}
