//! Melody Player
//!
//! Polls a control server for a song, play/pause/repeat actions and a volume,
//! and plays the song on a buzzer.
//!
//! The player is a handful of cooperative tasks sharing one locked state
//! record (see [`state`]). They run on a single execution context; the
//! playback task never waits on the network, so a slow server delays control
//! changes but never stretches a note.
//!
//! This library exposes the core components for testing purposes.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod output;
pub mod state;
pub mod tasks;

// Re-export commonly used types for convenience
pub use config::{PlayerConfig, Timing};
pub use coordinator::{buzzer_engine, play_file, shutdown_on, Coordinator};
pub use error::{PlayerError, Result};
pub use output::TracingPwm;
pub use state::{PlayerState, SharedPlayer};
