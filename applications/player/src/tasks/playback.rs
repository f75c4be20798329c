//! Playback task and the interruptible note hold

use crate::config::Timing;
use crate::state::SharedPlayer;
use melody_playback::MAX_NOTE_SECONDS;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// How a call to [`hold_note`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldOutcome {
    /// The note was held for its full duration and the cursor advanced
    Completed,

    /// Pause, stop, repeat or a new song cut the note short
    Interrupted,

    /// Nothing is playing
    Idle,

    Cancelled,
}

/// Sound the note at the cursor and hold it for its duration
///
/// The hold runs against a deadline taken when the note starts and checks
/// the engine every `step`, so an interrupting transition is noticed within
/// one step. An interrupted note is silenced and the cursor is not advanced.
pub async fn hold_note(
    shared: &SharedPlayer,
    step: Duration,
    cancel: &CancellationToken,
) -> HoldOutcome {
    let held = shared.lock().await.engine.begin_note();
    let Some(held) = held else {
        return HoldOutcome::Idle;
    };

    debug!(
        index = held.index,
        frequency = held.note.frequency,
        duration_ms = held.duration().as_millis() as u64,
        "Note"
    );

    let now = Instant::now();
    let deadline = now
        .checked_add(held.duration())
        .unwrap_or_else(|| now + Duration::from_secs_f64(MAX_NOTE_SECONDS));

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }

        tokio::select! {
            () = cancel.cancelled() => return HoldOutcome::Cancelled,
            () = tokio::time::sleep(remaining.min(step)) => {}
        }

        let mut state = shared.lock().await;
        if !state.engine.is_holding(&held) {
            state.engine.interrupt();
            return HoldOutcome::Interrupted;
        }
    }

    let mut state = shared.lock().await;
    if state.engine.complete_note(&held) {
        HoldOutcome::Completed
    } else {
        state.engine.interrupt();
        HoldOutcome::Interrupted
    }
}

/// Play notes for as long as the engine is playing
///
/// Sleeps `timing.idle_interval` between checks while idle or paused.
pub async fn run_playback(shared: &SharedPlayer, timing: Timing, cancel: &CancellationToken) {
    info!(
        step_ms = timing.hold_step.as_millis() as u64,
        "Playback task started"
    );

    loop {
        match hold_note(shared, timing.hold_step, cancel).await {
            HoldOutcome::Completed | HoldOutcome::Interrupted => {}
            HoldOutcome::Idle => {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    () = tokio::time::sleep(timing.idle_interval) => {}
                }
            }
            HoldOutcome::Cancelled => break,
        }
    }

    debug!("Playback task stopped");
}

/// Start playback and hold notes until the engine returns to idle
///
/// Returns `false` if there was no song to play or playback was cancelled.
pub async fn play_until_idle(
    shared: &SharedPlayer,
    timing: Timing,
    cancel: &CancellationToken,
) -> bool {
    if !shared.lock().await.engine.play() {
        return false;
    }

    loop {
        match hold_note(shared, timing.hold_step, cancel).await {
            HoldOutcome::Completed | HoldOutcome::Interrupted => {}
            HoldOutcome::Idle => return true,
            HoldOutcome::Cancelled => {
                shared.lock().await.engine.stop();
                return false;
            }
        }
    }
}
