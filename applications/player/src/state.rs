//! Shared player state
//!
//! One record holds everything the tasks mutate: the playback engine (cursor,
//! transport, song store, tone driver) and the pending control intent. Every
//! mutation is a single critical section, and no task awaits while holding
//! the lock, so the state is consistent at every yield point.

use melody_playback::{ControlIntent, PlaybackEngine};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard, Notify};
use tracing::debug;

/// State guarded by the player's lock
#[derive(Debug)]
pub struct PlayerState {
    pub engine: PlaybackEngine,

    /// Intent observed by the action poll and not applied yet
    pending: Option<ControlIntent>,
}

impl PlayerState {
    pub fn pending(&self) -> Option<ControlIntent> {
        self.pending
    }
}

/// Cloneable handle to the player state, shared by all tasks
#[derive(Debug, Clone)]
pub struct SharedPlayer {
    state: Arc<Mutex<PlayerState>>,
    intent_ready: Arc<Notify>,
}

impl SharedPlayer {
    pub fn new(engine: PlaybackEngine) -> Self {
        Self {
            state: Arc::new(Mutex::new(PlayerState {
                engine,
                pending: None,
            })),
            intent_ready: Arc::new(Notify::new()),
        }
    }

    /// Lock the state
    ///
    /// Callers must drop the guard before their next `.await`.
    pub async fn lock(&self) -> MutexGuard<'_, PlayerState> {
        self.state.lock().await
    }

    /// Record `intent` as pending, replacing any intent not applied yet
    pub async fn submit(&self, intent: ControlIntent) {
        let replaced = self.state.lock().await.pending.replace(intent);
        if let Some(previous) = replaced {
            debug!(?previous, ?intent, "Pending intent replaced");
        }
        self.intent_ready.notify_one();
    }

    /// Take the pending intent without waiting
    pub async fn take_intent(&self) -> Option<ControlIntent> {
        self.state.lock().await.pending.take()
    }

    /// Wait until an intent is pending and take it
    pub async fn next_intent(&self) -> ControlIntent {
        loop {
            if let Some(intent) = self.take_intent().await {
                return intent;
            }
            self.intent_ready.notified().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use melody_playback::{ToneDriver, Volume};
    use std::time::Duration;

    struct Mute(Volume);

    impl ToneDriver for Mute {
        fn tone(&mut self, _frequency: u32) {}
        fn silence(&mut self) {}
        fn set_volume(&mut self, volume: Volume) {
            self.0 = volume;
        }
        fn volume(&self) -> Volume {
            self.0
        }
    }

    fn shared() -> SharedPlayer {
        SharedPlayer::new(PlaybackEngine::new(Box::new(Mute(Volume::DEFAULT))))
    }

    #[tokio::test]
    async fn newest_intent_wins() {
        let shared = shared();
        shared.submit(ControlIntent::Play).await;
        shared.submit(ControlIntent::Pause).await;

        assert_eq!(shared.lock().await.pending(), Some(ControlIntent::Pause));
        assert_eq!(shared.take_intent().await, Some(ControlIntent::Pause));
        assert_eq!(shared.take_intent().await, None);
    }

    #[tokio::test]
    async fn next_intent_waits_for_submit() {
        let shared = shared();
        let waiter = shared.clone();
        let handle = tokio::spawn(async move { waiter.next_intent().await });

        tokio::task::yield_now().await;
        shared.submit(ControlIntent::Repeat).await;

        let intent = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(intent, ControlIntent::Repeat);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let shared = shared();
        let other = shared.clone();

        other.lock().await.engine.set_volume(Volume::new(9000));
        assert_eq!(shared.lock().await.engine.volume(), Volume::new(9000));
    }
}
