//! Polling seam between the player and the control server.

use crate::client::MelodyClient;
use crate::error::ClientError;
use async_trait::async_trait;
use melody_playback::{ControlIntent, Song, Volume};
use tracing::{debug, warn};

/// Source of remote song, action and volume updates.
///
/// Every method answers "no update" with `None`; transport and decoding
/// failures are expected under flaky connectivity and never propagate. The
/// next poll is the retry.
#[async_trait]
pub trait RemoteState: Send + Sync {
    /// Current song, if the server has a playable one
    async fn fetch_song(&self) -> Option<Song>;

    /// Pending one-shot action, if any
    async fn fetch_action(&self) -> Option<ControlIntent>;

    /// Requested volume, if set and well-formed
    async fn fetch_volume(&self) -> Option<Volume>;
}

#[async_trait]
impl RemoteState for MelodyClient {
    async fn fetch_song(&self) -> Option<Song> {
        match self.get_song().await {
            Ok(song) => Some(song),
            Err(ClientError::InvalidSong(e)) => {
                warn!(error = %e, "Server song rejected");
                None
            }
            Err(e) => {
                report("song", &e);
                None
            }
        }
    }

    async fn fetch_action(&self) -> Option<ControlIntent> {
        self.get_action().await.unwrap_or_else(|e| {
            report("action", &e);
            None
        })
    }

    async fn fetch_volume(&self) -> Option<Volume> {
        self.get_volume().await.unwrap_or_else(|e| {
            report("volume", &e);
            None
        })
    }
}

fn report(key: &str, error: &ClientError) {
    match error {
        // A 404 is how the server says "nothing selected yet"
        ClientError::ServerError { status: 404, .. } => {
            debug!(key, "Nothing stored on server");
        }
        ClientError::ServerUnreachable(_) => {
            debug!(key, error = %error, "Server unreachable");
        }
        _ => {
            warn!(key, error = %error, "Poll failed");
        }
    }
}
