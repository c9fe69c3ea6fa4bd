//! Error types for speech session coordination

use thiserror::Error;

/// Result type alias for speech operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during speech coordination
#[derive(Debug, Error)]
pub enum Error {
    /// Platform capability (synthesis or recognition) is absent.
    /// Fails fast; no session state is mutated.
    #[error("capability unsupported: {0}")]
    Unsupported(&'static str),

    /// Mid-operation failure reported by the underlying engine.
    /// The relevant axis is reset to idle before this surfaces.
    #[error("engine error: {0}")]
    Engine(String),

    /// Synchronous failure while starting an engine operation
    #[error("startup error: {0}")]
    Startup(String),

    /// An in-flight utterance was cancelled by a newer `speak` or an
    /// explicit stop. The preempted outcome always settles with this
    /// instead of hanging forever.
    #[error("utterance preempted")]
    Preempted,

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Audio output error (tone playback)
    #[error("audio error: {0}")]
    Audio(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
