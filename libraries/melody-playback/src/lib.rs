//! Melody Player - Playback Management
//!
//! Platform-agnostic song playback for a single-voice buzzer.
//!
//! This crate provides:
//! - Validated songs (aligned frequency/duration sequences) with fingerprints
//! - A song store with load-if-changed semantics
//! - The transport state machine (play, pause, repeat, stop)
//! - Volume in PWM duty-cycle units with clamping
//! - The tone driver seam and a PWM buzzer implementation
//!
//! # Architecture
//!
//! `melody-playback` has no runtime or network dependency. Timing (how long a
//! note is held, how often the state is checked) is left to the caller, so
//! the same engine runs under tokio on a host or under an embedded executor.
//!
//! Hardware access is provided through the [`PwmOutput`] trait.
//!
//! # Example
//!
//! ```rust
//! use melody_playback::{Buzzer, PlaybackEngine, PwmOutput, Song, Volume};
//!
//! struct Pin;
//!
//! impl PwmOutput for Pin {
//!     fn set_frequency(&mut self, _hz: u32) {}
//!     fn set_duty(&mut self, _duty: u16) {}
//! }
//!
//! let mut engine = PlaybackEngine::new(Box::new(Buzzer::new(Pin)));
//! engine.set_volume(Volume::new(20_000));
//!
//! let song = Song::new(vec![440, 0, 523], vec![0.5, 0.25, 0.5]).unwrap();
//! assert!(engine.load_if_changed(song));
//! engine.play();
//!
//! while let Some(held) = engine.begin_note() {
//!     // Wait `held.duration()`, checking `engine.is_holding(&held)` meanwhile
//!     engine.complete_note(&held);
//! }
//!
//! assert_eq!(engine.index(), 0);
//! ```

mod engine;
mod error;
mod song;
mod store;
mod tone;
pub mod types;
mod volume;

// Public exports
pub use engine::{HeldNote, PlaybackEngine};
pub use error::{PlaybackError, Result};
pub use song::{Fingerprint, Note, Song, SongPayload, MAX_NOTE_SECONDS};
pub use store::SongStore;
pub use tone::{Buzzer, PwmOutput, ToneDriver, DEFAULT_MAX_FREQUENCY, DEFAULT_MIN_FREQUENCY};
pub use types::{ControlIntent, PlaybackState, Transport};
pub use volume::Volume;
