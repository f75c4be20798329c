//! HTTP client for the control server's key/value endpoints.

use crate::error::{ClientError, Result};
use crate::types::{ActionResponse, ServerConfig, SongListResponse, StateKey, VolumeResponse};
use melody_playback::{ControlIntent, Song, SongPayload, Volume};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

/// Client for the control server.
///
/// The server keeps the latest `song`, `action` and `volume` behind
/// `GET /get?<key>` and accepts new values through `GET /set?<key>=<value>`.
///
/// # Example
///
/// ```ignore
/// use melody_client::{MelodyClient, ServerConfig};
///
/// let client = MelodyClient::new(ServerConfig::new("http://172.20.20.42"))?;
///
/// let song = client.get_song().await?;
/// println!("Song has {} notes", song.len());
///
/// if let Some(intent) = client.get_action().await? {
///     println!("Server wants {:?}", intent);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MelodyClient {
    http: Client,
    base_url: String,
}

impl MelodyClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let base_url = config.url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .user_agent(format!("MelodyPlayer/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Get the server URL.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    // =========================================================================
    // Reading state
    // =========================================================================

    /// Fetch the raw JSON stored under `key`.
    pub async fn get(&self, key: StateKey) -> Result<Value> {
        self.get_json(&format!("{}/get?{}", self.base_url, key)).await
    }

    /// Fetch the current song.
    ///
    /// A body that is missing either sequence, or whose sequences are not
    /// aligned, is reported as [`ClientError::InvalidSong`].
    pub async fn get_song(&self) -> Result<Song> {
        let value = self.get(StateKey::Song).await?;
        let payload: SongPayload = decode(value)?;
        let name = payload.song.clone();
        let song = Song::try_from(payload)?;

        debug!(song = ?name, notes = song.len(), "Fetched song");
        Ok(song)
    }

    /// Fetch and consume the pending action.
    ///
    /// Returns `None` when no action is set or the action is unknown.
    pub async fn get_action(&self) -> Result<Option<ControlIntent>> {
        let response: ActionResponse = decode(self.get(StateKey::Action).await?)?;

        let intent = match response.action {
            Some(Value::String(action)) => {
                let intent = ControlIntent::parse(&action);
                if intent.is_none() {
                    debug!(action = %action, "Ignoring unknown action");
                }
                intent
            }
            Some(Value::Null) | None => None,
            Some(other) => {
                debug!(action = %other, "Ignoring non-string action");
                None
            }
        };

        Ok(intent)
    }

    /// Fetch the requested volume, clamped to the duty-cycle range.
    ///
    /// Returns `None` when the server has no volume or it is not numeric.
    pub async fn get_volume(&self) -> Result<Option<Volume>> {
        let response: VolumeResponse = decode(self.get(StateKey::Volume).await?)?;
        Ok(response.volume.as_ref().and_then(Volume::from_json))
    }

    /// List the song names the server can serve.
    pub async fn list_songs(&self) -> Result<Vec<String>> {
        let value = self
            .get_json(&format!("{}/get?list", self.base_url))
            .await?;
        let response: SongListResponse = decode(value)?;
        Ok(response.songs)
    }

    // =========================================================================
    // Writing state
    // =========================================================================

    /// Select the song the player should load on its next `play`.
    pub async fn set_song(&self, name: &str) -> Result<()> {
        self.set(StateKey::Song, name).await
    }

    /// Queue a one-shot action for the player.
    pub async fn set_action(&self, intent: ControlIntent) -> Result<()> {
        self.set(StateKey::Action, intent.as_str()).await
    }

    /// Set the player's volume.
    pub async fn set_volume(&self, volume: Volume) -> Result<()> {
        self.set(StateKey::Volume, &volume.duty().to_string()).await
    }

    async fn set(&self, key: StateKey, value: &str) -> Result<()> {
        let url = format!("{}/set", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[(key.as_str(), value)])
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if status.is_success() {
            info!(key = %key, value = %value, "Server state updated");
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ClientError::ServerError {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        let response = self.http.get(url).send().await.map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))
    }
}

fn map_send_error(e: reqwest::Error) -> ClientError {
    if e.is_connect() || e.is_timeout() {
        ClientError::ServerUnreachable(e.to_string())
    } else {
        ClientError::Request(e)
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| ClientError::ParseError(e.to_string()))
}
