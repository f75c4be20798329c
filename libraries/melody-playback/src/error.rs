//! Error types for song loading and playback

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Song has no notes
    #[error("Song is empty")]
    EmptySong,

    /// Frequency and duration sequences are not aligned
    #[error("Song has {frequencies} frequencies but {durations} durations")]
    LengthMismatch { frequencies: usize, durations: usize },

    /// A note duration is not positive, too long or not a number
    #[error("Invalid duration {value} at note {index}")]
    InvalidDuration { index: usize, value: f64 },

    /// Song JSON could not be decoded
    #[error("Failed to parse song: {0}")]
    Parse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
