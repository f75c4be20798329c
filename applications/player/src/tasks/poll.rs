//! Action and volume poll tasks

use crate::state::SharedPlayer;
use melody_client::RemoteState;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Poll the server for one-shot actions and queue them as intents
///
/// The interval is measured from the end of one request to the start of the
/// next. Failed requests leave the pending intent untouched.
pub async fn poll_actions<R>(
    remote: &R,
    shared: &SharedPlayer,
    interval: Duration,
    cancel: &CancellationToken,
) where
    R: RemoteState + ?Sized,
{
    info!(interval_ms = interval.as_millis() as u64, "Action poll started");

    loop {
        let fetched = tokio::select! {
            () = cancel.cancelled() => break,
            action = remote.fetch_action() => action,
        };

        if let Some(intent) = fetched {
            info!(?intent, "Action received");
            shared.submit(intent).await;
        }

        tokio::select! {
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(interval) => {}
        }
    }

    debug!("Action poll stopped");
}

/// Poll the server for the volume and hand it to the tone driver
///
/// The new volume applies from the next note on.
pub async fn poll_volume<R>(
    remote: &R,
    shared: &SharedPlayer,
    interval: Duration,
    cancel: &CancellationToken,
) where
    R: RemoteState + ?Sized,
{
    info!(interval_ms = interval.as_millis() as u64, "Volume poll started");

    loop {
        let fetched = tokio::select! {
            () = cancel.cancelled() => break,
            volume = remote.fetch_volume() => volume,
        };

        if let Some(volume) = fetched {
            shared.lock().await.engine.set_volume(volume);
        }

        tokio::select! {
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(interval) => {}
        }
    }

    debug!("Volume poll stopped");
}
