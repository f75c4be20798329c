//! Types for control server requests and responses.

use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Configuration for connecting to the control server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Base URL of the server (e.g., "http://172.20.20.42")
    pub url: String,
    /// Upper bound for a single request, connect included
    pub timeout: Duration,
}

impl ServerConfig {
    /// Create a new server config with the default timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Keys stored by the server's key/value endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKey {
    Song,
    Action,
    Volume,
}

impl StateKey {
    /// Query parameter name
    pub fn as_str(self) -> &'static str {
        match self {
            StateKey::Song => "song",
            StateKey::Action => "action",
            StateKey::Volume => "volume",
        }
    }
}

impl std::fmt::Display for StateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Response from `GET /get?action`.
///
/// The server clears its action after returning it once.
#[derive(Debug, Default, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub action: Option<Value>,
}

/// Response from `GET /get?volume`.
#[derive(Debug, Default, Deserialize)]
pub struct VolumeResponse {
    #[serde(default)]
    pub volume: Option<Value>,
}

/// Response from `GET /get?list`.
#[derive(Debug, Default, Deserialize)]
pub struct SongListResponse {
    #[serde(default)]
    pub songs: Vec<String>,
}
