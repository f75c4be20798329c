//! Core types for playback management

use serde::{Deserialize, Serialize};

/// Control instruction received from the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlIntent {
    /// Load the server's song if it changed, then start or resume
    Play,

    /// Hold position and go silent
    Pause,

    /// Rewind to the first note and play
    Repeat,
}

impl ControlIntent {
    /// Parse the `action` value reported by the server
    ///
    /// Unknown actions yield `None`.
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "play" => Some(Self::Play),
            "pause" => Some(Self::Pause),
            "repeat" => Some(Self::Repeat),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Repeat => "repeat",
        }
    }
}

/// Transport state of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transport {
    /// No song, or stopped at the beginning
    Idle,

    /// Emitting the note at the cursor
    Playing,

    /// Holding position, silent
    Paused,
}

/// Snapshot of the playback cursor and transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackState {
    /// Index of the next note to play
    pub index: usize,

    pub transport: Transport,
}

impl PlaybackState {
    /// Canonical stopped state
    pub const IDLE: PlaybackState = PlaybackState {
        index: 0,
        transport: Transport::Idle,
    };

    pub fn playing(&self) -> bool {
        self.transport == Transport::Playing
    }

    /// Idle reads as paused, so exactly one of `playing`/`paused` holds
    pub fn paused(&self) -> bool {
        !self.playing()
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::IDLE
    }
}
