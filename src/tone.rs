//! Notification tone schedules and rendering
//!
//! Each session event maps to a fixed schedule of oscillator bursts. A
//! schedule is rendered to mono f32 samples: one sine oscillator per burst
//! with an exponential decay envelope, mixed at its start offset.

use crate::{Error, Result};

/// Sample rate for rendered tones (matches playback output)
pub const TONE_SAMPLE_RATE: u32 = 24_000;

/// Envelope decay target; bursts ramp from peak gain down to this
const ENVELOPE_FLOOR: f32 = 0.01;

/// Session event kinds that produce an audible cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToneKind {
    /// Synthesis started
    Speak,
    /// Capture started
    Listen,
    /// Recognition produced a transcript
    Complete,
    /// Recognition failed
    Error,
    /// Attention-demanding event
    Alert,
    /// Generic positive confirmation
    Success,
}

/// One oscillator burst within a tone schedule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneBurst {
    pub frequency_hz: f32,
    pub start_offset_ms: u64,
    pub duration_ms: u64,
    pub peak_gain: f32,
}

const fn burst(
    frequency_hz: f32,
    start_offset_ms: u64,
    duration_ms: u64,
    peak_gain: f32,
) -> ToneBurst {
    ToneBurst {
        frequency_hz,
        start_offset_ms,
        duration_ms,
        peak_gain,
    }
}

const SPEAK: &[ToneBurst] = &[burst(800.0, 0, 100, 0.3)];
const LISTEN: &[ToneBurst] = &[burst(600.0, 0, 200, 0.3)];
const COMPLETE: &[ToneBurst] = &[burst(600.0, 0, 100, 0.2), burst(800.0, 100, 100, 0.2)];
const ERROR: &[ToneBurst] = &[burst(300.0, 0, 300, 0.3)];
const ALERT: &[ToneBurst] = &[
    burst(1000.0, 0, 100, 0.4),
    burst(1000.0, 200, 100, 0.4),
    burst(1000.0, 400, 100, 0.4),
];
const SUCCESS: &[ToneBurst] = &[burst(880.0, 0, 150, 0.3)];

impl ToneKind {
    /// Look up the burst schedule for this kind
    #[must_use]
    pub const fn schedule(self) -> &'static [ToneBurst] {
        match self {
            Self::Speak => SPEAK,
            Self::Listen => LISTEN,
            Self::Complete => COMPLETE,
            Self::Error => ERROR,
            Self::Alert => ALERT,
            Self::Success => SUCCESS,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn ms_to_samples(ms: u64, sample_rate: u32) -> usize {
    (ms * sample_rate as u64 / 1000) as usize
}

/// Render a tone schedule to mono f32 samples
///
/// Output length covers the last burst's end. Bursts are summed, so
/// overlapping schedules mix rather than clip each other.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn render_schedule(kind: ToneKind, sample_rate: u32) -> Vec<f32> {
    let schedule = kind.schedule();
    let total_ms = schedule
        .iter()
        .map(|b| b.start_offset_ms + b.duration_ms)
        .max()
        .unwrap_or(0);

    let mut samples = vec![0.0f32; ms_to_samples(total_ms, sample_rate)];

    for b in schedule {
        let start = ms_to_samples(b.start_offset_ms, sample_rate);
        let len = ms_to_samples(b.duration_ms, sample_rate);

        for i in 0..len {
            let t = i as f32 / sample_rate as f32;
            let progress = i as f32 / len as f32;
            // Exponential ramp from peak gain to the envelope floor
            let gain = b.peak_gain * (ENVELOPE_FLOOR / b.peak_gain).powf(progress);
            samples[start + i] +=
                gain * (2.0 * std::f32::consts::PI * b.frequency_hz * t).sin();
        }
    }

    samples
}

/// Encode f32 samples as a mono 16-bit WAV byte buffer
///
/// # Errors
///
/// Returns error if WAV encoding fails
pub fn samples_to_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).map_err(|e| Error::Audio(e.to_string()))?;

        for &sample in samples {
            #[allow(clippy::cast_possible_truncation)]
            let sample_i16 = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            writer
                .write_sample(sample_i16)
                .map_err(|e| Error::Audio(e.to_string()))?;
        }

        writer.finalize().map_err(|e| Error::Audio(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}
