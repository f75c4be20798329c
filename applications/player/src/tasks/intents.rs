//! Intent application task

use crate::state::SharedPlayer;
use melody_client::RemoteState;
use melody_playback::ControlIntent;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Apply pending intents as they arrive
pub async fn apply_intents<R>(remote: &R, shared: &SharedPlayer, cancel: &CancellationToken)
where
    R: RemoteState + ?Sized,
{
    loop {
        let intent = tokio::select! {
            () = cancel.cancelled() => break,
            intent = shared.next_intent() => intent,
        };

        apply_intent(remote, shared, intent).await;
    }

    debug!("Intent task stopped");
}

/// Apply one intent to the engine
///
/// `Play` fetches the server's song first and reloads it only if it changed,
/// so replaying the same song resumes where it left off. The fetch happens
/// without the lock held.
pub async fn apply_intent<R>(remote: &R, shared: &SharedPlayer, intent: ControlIntent)
where
    R: RemoteState + ?Sized,
{
    match intent {
        ControlIntent::Play => {
            let song = remote.fetch_song().await;

            let mut state = shared.lock().await;
            if let Some(song) = song {
                state.engine.load_if_changed(song);
            } else {
                debug!("No song from server, playing what is loaded");
            }
            state.engine.play();
        }
        ControlIntent::Pause => {
            shared.lock().await.engine.pause();
        }
        ControlIntent::Repeat => {
            let mut state = shared.lock().await;
            state.engine.repeat();
            state.engine.play();
        }
    }
}
