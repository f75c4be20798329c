//! Player error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlayerError>;

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server client error: {0}")]
    Client(#[from] melody_client::ClientError),

    #[error("Playback error: {0}")]
    Playback(#[from] melody_playback::PlaybackError),
}
