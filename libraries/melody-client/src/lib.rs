//! Melody Player Server Client
//!
//! HTTP client library for the control server that feeds a melody player.
//!
//! The server is a small key/value store:
//!
//! - `GET /get?song` - the selected song (`frequencies`, `durations`, `song`)
//! - `GET /get?action` - the pending action, cleared after one read
//! - `GET /get?volume` - the requested volume
//! - `GET /get?list` - names of songs the server can serve
//! - `GET /set?<key>=<value>` - store a new song, action or volume
//!
//! The player polls through the [`RemoteState`] trait, which swallows
//! transport errors and reports "no update" instead.
//!
//! # Example
//!
//! ```ignore
//! use melody_client::{MelodyClient, RemoteState, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MelodyClient::new(ServerConfig::new("http://172.20.20.42"))?;
//!
//!     if let Some(volume) = client.fetch_volume().await {
//!         println!("Volume: {}", volume.duty());
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod remote;
mod types;

// Re-export main types
pub use client::MelodyClient;
pub use error::{ClientError, Result};
pub use remote::RemoteState;
pub use types::{
    ActionResponse, ServerConfig, SongListResponse, StateKey, VolumeResponse, DEFAULT_TIMEOUT,
};
