//! Player configuration

use crate::error::{PlayerError, Result};
use melody_client::ServerConfig;
use melody_playback::Volume;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "melody.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_polling")]
    pub polling: PollingSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,

    #[serde(default = "default_output")]
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_url")]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PollingSettings {
    #[serde(default = "default_poll_interval_ms")]
    pub action_interval_ms: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub volume_interval_ms: u64,

    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_hold_step_ms")]
    pub hold_step_ms: u64,

    #[serde(default = "default_idle_interval_ms")]
    pub idle_interval_ms: u64,

    #[serde(default = "default_initial_volume")]
    pub initial_volume: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputSettings {
    #[serde(default = "default_min_frequency_hz")]
    pub min_frequency_hz: u32,

    #[serde(default = "default_max_frequency_hz")]
    pub max_frequency_hz: u32,
}

/// Timing knobs of the coordinator tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub action_interval: Duration,
    pub volume_interval: Duration,
    pub hold_step: Duration,
    pub idle_interval: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            action_interval: Duration::from_millis(default_poll_interval_ms()),
            volume_interval: Duration::from_millis(default_poll_interval_ms()),
            hold_step: Duration::from_millis(default_hold_step_ms()),
            idle_interval: Duration::from_millis(default_idle_interval_ms()),
        }
    }
}

impl PlayerConfig {
    /// Load configuration from file and environment
    ///
    /// `path` defaults to `melody.toml` in the working directory; a missing
    /// default file is not an error, a missing explicit one is. Environment
    /// variables are prefixed with `MELODY_` and use `__` between sections,
    /// e.g. `MELODY_SERVER__URL` or `MELODY_POLLING__ACTION_INTERVAL_MS`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("MELODY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| PlayerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| PlayerError::Config(e.to_string()))
    }

    /// Load, apply a server URL override, then validate
    pub fn resolve(path: Option<&Path>, server: Option<String>) -> Result<Self> {
        let config = Self::load(path)?.with_server_url(server);
        config.validate()?;
        Ok(config)
    }

    /// Replace the server URL when one is given
    pub fn with_server_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.server.url = url;
        }
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.url.trim().is_empty() {
            return Err(PlayerError::Config(
                "Server URL is required (set MELODY_SERVER__URL)".to_string(),
            ));
        }

        for (name, value) in [
            ("polling.action_interval_ms", self.polling.action_interval_ms),
            ("polling.volume_interval_ms", self.polling.volume_interval_ms),
            ("polling.fetch_timeout_ms", self.polling.fetch_timeout_ms),
            ("playback.hold_step_ms", self.playback.hold_step_ms),
            ("playback.idle_interval_ms", self.playback.idle_interval_ms),
        ] {
            if value == 0 {
                return Err(PlayerError::Config(format!("{name} must be positive")));
            }
        }

        if self.output.min_frequency_hz > self.output.max_frequency_hz {
            return Err(PlayerError::Config(format!(
                "Frequency range is inverted: {} Hz > {} Hz",
                self.output.min_frequency_hz, self.output.max_frequency_hz
            )));
        }

        Ok(())
    }

    /// Client settings for the control server
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::new(self.server.url.clone())
            .with_timeout(Duration::from_millis(self.polling.fetch_timeout_ms))
    }

    pub fn timing(&self) -> Timing {
        Timing {
            action_interval: Duration::from_millis(self.polling.action_interval_ms),
            volume_interval: Duration::from_millis(self.polling.volume_interval_ms),
            hold_step: Duration::from_millis(self.playback.hold_step_ms),
            idle_interval: Duration::from_millis(self.playback.idle_interval_ms),
        }
    }

    pub fn initial_volume(&self) -> Volume {
        Volume::new(self.playback.initial_volume)
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings { url: default_url() }
}

fn default_url() -> String {
    "http://127.0.0.1".to_string()
}

fn default_polling() -> PollingSettings {
    PollingSettings {
        action_interval_ms: default_poll_interval_ms(),
        volume_interval_ms: default_poll_interval_ms(),
        fetch_timeout_ms: default_fetch_timeout_ms(),
    }
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_fetch_timeout_ms() -> u64 {
    2000
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        hold_step_ms: default_hold_step_ms(),
        idle_interval_ms: default_idle_interval_ms(),
        initial_volume: default_initial_volume(),
    }
}

fn default_hold_step_ms() -> u64 {
    5
}

fn default_idle_interval_ms() -> u64 {
    50
}

fn default_initial_volume() -> u16 {
    Volume::DEFAULT.duty()
}

fn default_output() -> OutputSettings {
    OutputSettings {
        min_frequency_hz: default_min_frequency_hz(),
        max_frequency_hz: default_max_frequency_hz(),
    }
}

fn default_min_frequency_hz() -> u32 {
    melody_playback::DEFAULT_MIN_FREQUENCY
}

fn default_max_frequency_hz() -> u32 {
    melody_playback::DEFAULT_MAX_FREQUENCY
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            polling: default_polling(),
            playback: default_playback(),
            output: default_output(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = PlayerConfig::default();
        assert_eq!(config.server.url, "http://127.0.0.1");
        assert_eq!(config.polling.fetch_timeout_ms, 2000);
        assert_eq!(config.initial_volume(), Volume::new(1500));
        assert_eq!(config.timing(), Timing::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn loads_partial_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nurl = \"http://172.20.20.42\"\n\n[playback]\nhold_step_ms = 2"
        )
        .unwrap();

        let config = PlayerConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.server.url, "http://172.20.20.42");
        assert_eq!(config.playback.hold_step_ms, 2);
        assert_eq!(config.playback.idle_interval_ms, 50);
        assert_eq!(config.polling.action_interval_ms, 500);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = PlayerConfig::load(Some(Path::new("/nonexistent/melody.toml")));
        assert!(matches!(result, Err(PlayerError::Config(_))));
    }

    #[test]
    fn rejects_empty_url() {
        let mut config = PlayerConfig::default();
        config.server.url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_intervals() {
        let mut config = PlayerConfig::default();
        config.playback.hold_step_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("hold_step_ms"));

        let mut config = PlayerConfig::default();
        config.polling.volume_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_frequency_range() {
        let mut config = PlayerConfig::default();
        config.output.min_frequency_hz = 5000;
        config.output.max_frequency_hz = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn server_config_carries_timeout() {
        let mut config = PlayerConfig::default();
        config.polling.fetch_timeout_ms = 750;
        let server = config.server_config();
        assert_eq!(server.url, "http://127.0.0.1");
        assert_eq!(server.timeout, Duration::from_millis(750));
    }

    #[test]
    fn server_override_keeps_fetch_timeout() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nurl = \"http://172.20.20.42\"\n\n[polling]\nfetch_timeout_ms = 750"
        )
        .unwrap();

        let config =
            PlayerConfig::resolve(Some(file.path()), Some("http://10.0.0.7:8080".to_string()))
                .unwrap();
        let server = config.server_config();
        assert_eq!(server.url, "http://10.0.0.7:8080");
        assert_eq!(server.timeout, Duration::from_millis(750));

        let config = PlayerConfig::resolve(Some(file.path()), None).unwrap();
        assert_eq!(config.server_config().url, "http://172.20.20.42");
    }

    #[test]
    fn empty_server_override_is_rejected() {
        let result = PlayerConfig::default().with_server_url(Some(String::new()));
        assert!(result.validate().is_err());
    }
}
