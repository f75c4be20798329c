//! Coordinator - composes the player tasks over shared state

use crate::config::{PlayerConfig, Timing};
use crate::error::Result;
use crate::output::TracingPwm;
use crate::state::SharedPlayer;
use crate::tasks;
use melody_client::{MelodyClient, RemoteState};
use melody_playback::{Buzzer, PlaybackEngine, Song};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Build an engine driving a buzzer on the host's tracing PWM output
pub fn buzzer_engine(config: &PlayerConfig) -> PlaybackEngine {
    let buzzer = Buzzer::with_frequency_range(
        TracingPwm::new(),
        config.output.min_frequency_hz,
        config.output.max_frequency_hz,
    );
    let mut engine = PlaybackEngine::new(Box::new(buzzer));
    engine.set_volume(config.initial_volume());
    engine
}

/// Cancellation token that fires once `signal` resolves successfully
///
/// A signal that fails to register leaves the token untouched, so the
/// caller keeps running until some other cancellation.
pub fn shutdown_on<F>(signal: F) -> CancellationToken
where
    F: Future<Output = std::io::Result<()>> + Send + 'static,
{
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        match signal.await {
            Ok(()) => {
                info!("Shutdown requested");
                trigger.cancel();
            }
            Err(e) => warn!("Failed to listen for shutdown signal: {}", e),
        }
    });
    token
}

/// Play a song JSON file once on the buzzer
///
/// Returns true when the song ran to its end, false when cancelled first.
pub async fn play_file(
    path: &Path,
    config: &PlayerConfig,
    cancel: &CancellationToken,
) -> Result<bool> {
    let song = Song::from_json_file(path)?;

    info!(
        "Playing {} ({} notes, {:.1}s)",
        path.display(),
        song.len(),
        song.total_duration().as_secs_f64()
    );

    let shared = SharedPlayer::new(buzzer_engine(config));
    shared.lock().await.engine.load_if_changed(song);

    Ok(tasks::play_until_idle(&shared, config.timing(), cancel).await)
}

/// Runs the action poll, volume poll, intent application and playback
/// tasks until cancelled
pub struct Coordinator {
    remote: Arc<dyn RemoteState>,
    shared: SharedPlayer,
    timing: Timing,
}

impl Coordinator {
    pub fn new(remote: Arc<dyn RemoteState>, engine: PlaybackEngine, timing: Timing) -> Self {
        Self {
            remote,
            shared: SharedPlayer::new(engine),
            timing,
        }
    }

    /// Coordinator talking to the configured control server
    pub fn connect(config: &PlayerConfig) -> Result<Self> {
        let client = MelodyClient::new(config.server_config())?;
        Ok(Self::new(
            Arc::new(client),
            buzzer_engine(config),
            config.timing(),
        ))
    }

    /// Handle to the shared state, for inspection
    pub fn shared(&self) -> SharedPlayer {
        self.shared.clone()
    }

    /// Try once to load the server's song
    ///
    /// Playback does not start; the first `play` action does that.
    pub async fn startup_load(&self) -> bool {
        let Some(song) = self.remote.fetch_song().await else {
            info!("No song available at startup");
            return false;
        };

        self.shared.lock().await.engine.load_if_changed(song)
    }

    /// Run until `cancel` fires, then stop playback
    pub async fn run(&self, cancel: CancellationToken) {
        self.startup_load().await;

        info!("Player running");
        let remote = &*self.remote;
        tokio::join!(
            tasks::poll_actions(remote, &self.shared, self.timing.action_interval, &cancel),
            tasks::poll_volume(remote, &self.shared, self.timing.volume_interval, &cancel),
            tasks::apply_intents(remote, &self.shared, &cancel),
            tasks::run_playback(&self.shared, self.timing, &cancel),
        );

        self.shared.lock().await.engine.stop();
        info!("Player stopped");
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("shared", &self.shared)
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlayerError;
    use melody_client::ClientError;
    use melody_playback::PlaybackError;
    use std::io::Write;
    use std::time::Duration;

    fn song_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_fires_on_signal() {
        let token = shutdown_on(async { Ok(()) });
        tokio::time::timeout(Duration::from_secs(1), token.cancelled())
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn failed_signal_does_not_shut_down() {
        let token = shutdown_on(async { Err(std::io::Error::other("no signal handler")) });
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!token.is_cancelled());
    }

    #[test]
    fn connect_rejects_bad_url() {
        let mut config = PlayerConfig::default();
        config.server.url = "ftp://example.com".to_string();
        assert!(matches!(
            Coordinator::connect(&config),
            Err(PlayerError::Client(ClientError::InvalidUrl(_)))
        ));
    }

    #[test]
    fn connect_uses_configured_timing() {
        let mut config = PlayerConfig::default();
        config.playback.hold_step_ms = 2;
        let coordinator = Coordinator::connect(&config).unwrap();
        assert_eq!(coordinator.timing.hold_step, Duration::from_millis(2));
    }

    #[tokio::test]
    async fn play_file_reports_missing_file() {
        let result = play_file(
            Path::new("/nonexistent/song.json"),
            &PlayerConfig::default(),
            &CancellationToken::new(),
        )
        .await;
        assert!(matches!(
            result,
            Err(PlayerError::Playback(PlaybackError::Io(_)))
        ));
    }

    #[tokio::test]
    async fn play_file_reports_invalid_song() {
        let file = song_file(r#"{"frequencies": [440], "durations": [1e20]}"#);
        let result = play_file(
            file.path(),
            &PlayerConfig::default(),
            &CancellationToken::new(),
        )
        .await;
        assert!(matches!(
            result,
            Err(PlayerError::Playback(PlaybackError::InvalidDuration { .. }))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn play_file_runs_to_the_end() {
        let file = song_file(r#"{"frequencies": [440, 0, 494], "durations": [0.1, 0.05, 0.1]}"#);
        let played = play_file(
            file.path(),
            &PlayerConfig::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
        assert!(played);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_play_file_stops_early() {
        let file = song_file(r#"{"frequencies": [440], "durations": [10.0]}"#);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let played = play_file(file.path(), &PlayerConfig::default(), &cancel)
            .await
            .unwrap();
        assert!(!played);
    }
}
