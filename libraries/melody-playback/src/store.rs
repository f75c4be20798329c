//! Currently loaded song with change detection

use crate::song::{Fingerprint, Song};
use tracing::{debug, info};

/// Holds the active song and its fingerprint
///
/// The control server reports the full song on every poll, so loading is
/// idempotent: a candidate with the same fingerprint as the stored song is
/// ignored. This lets the coordinator call `load_if_changed` on every `play`
/// action without disturbing an in-progress song.
#[derive(Debug, Default)]
pub struct SongStore {
    song: Option<Song>,
    fingerprint: Option<Fingerprint>,
}

impl SongStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored song if `candidate` differs from it
    ///
    /// Returns `true` when the song was replaced.
    pub fn load_if_changed(&mut self, candidate: Song) -> bool {
        let fingerprint = candidate.fingerprint();

        if self.fingerprint.as_ref() == Some(&fingerprint) {
            debug!("Song unchanged, keeping current position");
            return false;
        }

        info!(
            notes = candidate.len(),
            duration_secs = candidate.total_duration().as_secs_f64(),
            "Loaded new song"
        );

        self.song = Some(candidate);
        self.fingerprint = Some(fingerprint);
        true
    }

    pub fn song(&self) -> Option<&Song> {
        self.song.as_ref()
    }

    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        self.fingerprint.as_ref()
    }

    pub fn has_song(&self) -> bool {
        self.song.is_some()
    }
}
