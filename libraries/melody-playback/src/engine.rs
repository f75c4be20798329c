//! Playback engine - transport state machine
//!
//! Owns the song store, the playback cursor and the tone driver. The engine
//! is synchronous: it decides what to sound and when a note is finished, while
//! the caller provides the timing (see the player's playback task).
//!
//! # Holds
//!
//! [`PlaybackEngine::begin_note`] sounds the note at the cursor and returns a
//! [`HeldNote`]. The caller waits out the note's duration, checking
//! [`PlaybackEngine::is_holding`] at a short step, and finally calls
//! [`PlaybackEngine::complete_note`]. Any transition that invalidates the held
//! note (pause, stop, repeat, new song) bumps the engine's epoch, so a stale
//! hold is recognized and never advances the cursor.

use crate::{
    song::{Note, Song},
    store::SongStore,
    tone::ToneDriver,
    types::{PlaybackState, Transport},
    volume::Volume,
};
use std::time::Duration;
use tracing::{debug, info};

/// A note that has been started and is waiting out its duration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeldNote {
    /// Cursor position of the note
    pub index: usize,

    pub note: Note,

    epoch: u64,
}

impl HeldNote {
    pub fn duration(&self) -> Duration {
        self.note.duration
    }
}

/// Song playback state machine
pub struct PlaybackEngine {
    driver: Box<dyn ToneDriver>,
    store: SongStore,
    state: PlaybackState,
    epoch: u64,
}

impl PlaybackEngine {
    pub fn new(mut driver: Box<dyn ToneDriver>) -> Self {
        driver.silence();
        Self {
            driver,
            store: SongStore::new(),
            state: PlaybackState::IDLE,
            epoch: 0,
        }
    }

    // ===== Song =====

    /// Load `song` unless it matches the current one
    ///
    /// A changed song rewinds the cursor to the first note and interrupts any
    /// note in progress. The transport state is left as is.
    pub fn load_if_changed(&mut self, song: Song) -> bool {
        if !self.store.load_if_changed(song) {
            return false;
        }

        self.state.index = 0;
        self.invalidate_hold();
        true
    }

    pub fn song(&self) -> Option<&Song> {
        self.store.song()
    }

    pub fn has_song(&self) -> bool {
        self.store.has_song()
    }

    // ===== Transport =====

    /// Start or resume at the current cursor
    ///
    /// Returns `false` if there is no song. Playing again while already
    /// playing leaves the current note undisturbed.
    pub fn play(&mut self) -> bool {
        if !self.store.has_song() {
            debug!("Play ignored, no song loaded");
            return false;
        }

        if self.state.transport != Transport::Playing {
            info!(index = self.state.index, "Playback started");
            self.state.transport = Transport::Playing;
        }

        true
    }

    /// Hold position and silence output
    pub fn pause(&mut self) {
        if self.state.transport == Transport::Playing {
            info!(index = self.state.index, "Playback paused");
            self.state.transport = Transport::Paused;
        }

        self.invalidate_hold();
        self.driver.silence();
    }

    /// Rewind to the first note without changing transport
    pub fn repeat(&mut self) {
        debug!("Rewinding to first note");
        self.state.index = 0;
        self.invalidate_hold();
    }

    /// Return to idle at the first note and silence output
    pub fn stop(&mut self) {
        if self.state.transport != Transport::Idle {
            info!("Playback stopped");
        }

        self.state = PlaybackState::IDLE;
        self.invalidate_hold();
        self.driver.silence();
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn transport(&self) -> Transport {
        self.state.transport
    }

    pub fn index(&self) -> usize {
        self.state.index
    }

    pub fn is_playing(&self) -> bool {
        self.state.playing()
    }

    // ===== Volume =====

    pub fn set_volume(&mut self, volume: Volume) {
        if self.driver.volume() != volume {
            debug!(duty = volume.duty(), "Volume changed");
        }
        self.driver.set_volume(volume);
    }

    pub fn volume(&self) -> Volume {
        self.driver.volume()
    }

    // ===== Notes =====

    /// Sound the note at the cursor
    ///
    /// Returns `None` unless playing. Rests silence the output instead of
    /// calling `tone(0)`.
    pub fn begin_note(&mut self) -> Option<HeldNote> {
        if self.state.transport != Transport::Playing {
            return None;
        }

        let Some(note) = self.store.song().and_then(|s| s.note(self.state.index)) else {
            // Cursor past the end can only follow a song swap; start over.
            self.stop();
            return None;
        };

        if note.is_rest() {
            self.driver.silence();
        } else {
            self.driver.tone(note.frequency.unsigned_abs());
        }

        Some(HeldNote {
            index: self.state.index,
            note,
            epoch: self.epoch,
        })
    }

    /// Whether `held` is still the note being played
    pub fn is_holding(&self, held: &HeldNote) -> bool {
        self.state.transport == Transport::Playing && self.epoch == held.epoch
    }

    /// Finish a note whose full duration has elapsed
    ///
    /// Silences, advances the cursor and stops at the end of the song.
    /// A stale hold is ignored and returns `false`.
    pub fn complete_note(&mut self, held: &HeldNote) -> bool {
        if !self.is_holding(held) {
            return false;
        }

        self.driver.silence();
        self.state.index = held.index + 1;

        let len = self.store.song().map_or(0, Song::len);
        if self.state.index >= len {
            info!(notes = len, "Song finished");
            self.stop();
        }

        true
    }

    /// Silence output after a hold was cut short
    pub fn interrupt(&mut self) {
        self.driver.silence();
    }

    fn invalidate_hold(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }
}

impl std::fmt::Debug for PlaybackEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackEngine")
            .field("state", &self.state)
            .field("epoch", &self.epoch)
            .field("has_song", &self.store.has_song())
            .field("volume", &self.driver.volume())
            .finish()
    }
}
