//! Songs, notes and content fingerprints
//!
//! A song is two aligned sequences: note `i` plays `frequencies[i]` Hz for
//! `durations[i]` seconds. Songs are validated once on construction and are
//! immutable afterwards; a new song replaces the old one wholesale.

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Longest note accepted, in seconds
pub const MAX_NOTE_SECONDS: f64 = 3600.0;

/// Raw song body as served by the control server or stored on disk
///
/// Both fields default to empty so that a body missing one of them decodes
/// and is then rejected by validation as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SongPayload {
    #[serde(default)]
    pub frequencies: Vec<f64>,

    #[serde(default)]
    pub durations: Vec<f64>,

    /// Display name, ignored for playback and fingerprinting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub song: Option<String>,
}

/// One (frequency, duration) pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    /// Frequency in Hz; zero or negative is a rest
    pub frequency: i32,

    pub duration: Duration,
}

impl Note {
    pub fn is_rest(&self) -> bool {
        self.frequency <= 0
    }
}

/// Change-detection digest of a song's content
///
/// The canonical JSON serialization of the note sequences. Two songs with
/// equal fingerprints are treated as the same song.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated song
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Song {
    frequencies: Vec<i32>,
    durations: Vec<f64>,
}

impl Song {
    /// Build a song from aligned frequency and duration sequences
    ///
    /// Rejects empty songs, mismatched lengths and any duration that is not
    /// a positive number of seconds up to [`MAX_NOTE_SECONDS`].
    pub fn new(frequencies: Vec<i32>, durations: Vec<f64>) -> Result<Self> {
        if frequencies.is_empty() || durations.is_empty() {
            return Err(PlaybackError::EmptySong);
        }

        if frequencies.len() != durations.len() {
            return Err(PlaybackError::LengthMismatch {
                frequencies: frequencies.len(),
                durations: durations.len(),
            });
        }

        if let Some((index, &value)) = durations
            .iter()
            .enumerate()
            .find(|(_, d)| !is_valid_duration(**d))
        {
            return Err(PlaybackError::InvalidDuration { index, value });
        }

        Ok(Self {
            frequencies,
            durations,
        })
    }

    /// Load a song from a JSON file with `frequencies` and `durations` arrays
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let payload: SongPayload = serde_json::from_str(&contents)?;
        Self::try_from(payload)
    }

    /// Number of notes
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Always false for a constructed song, kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Note at `index`, or `None` past the end of the song
    pub fn note(&self, index: usize) -> Option<Note> {
        let frequency = *self.frequencies.get(index)?;
        let seconds = *self.durations.get(index)?;

        Some(Note {
            frequency,
            duration: Duration::from_secs_f64(seconds),
        })
    }

    pub fn frequencies(&self) -> &[i32] {
        &self.frequencies
    }

    pub fn durations(&self) -> &[f64] {
        &self.durations
    }

    /// Total playing time of all notes
    pub fn total_duration(&self) -> Duration {
        self.durations
            .iter()
            .map(|&seconds| Duration::from_secs_f64(seconds))
            .fold(Duration::ZERO, Duration::saturating_add)
    }

    pub fn fingerprint(&self) -> Fingerprint {
        // Field order is fixed by the struct definition, so this is canonical.
        // Serializing integers and finite floats cannot fail.
        Fingerprint(serde_json::to_string(self).unwrap_or_default())
    }
}

fn is_valid_duration(seconds: f64) -> bool {
    seconds > 0.0 && seconds <= MAX_NOTE_SECONDS
}

impl TryFrom<SongPayload> for Song {
    type Error = PlaybackError;

    fn try_from(payload: SongPayload) -> Result<Self> {
        let frequencies = payload
            .frequencies
            .iter()
            .map(|f| f.trunc() as i32)
            .collect();

        Self::new(frequencies, payload.durations)
    }
}
