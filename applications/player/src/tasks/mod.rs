//! Cooperative player tasks
//!
//! Each task is a loop over the shared player state that yields whenever it
//! waits. The coordinator joins them on one execution context.
//!
//! Task priority considerations:
//! - Playback: timing critical, never waits on the network
//! - Intent application: applies control intents as soon as they are seen
//! - Action and volume polls: background, one request per interval

pub mod intents;
pub mod playback;
pub mod poll;

pub use intents::{apply_intent, apply_intents};
pub use playback::{hold_note, play_until_idle, run_playback, HoldOutcome};
pub use poll::{poll_actions, poll_volume};
