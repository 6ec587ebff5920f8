//! Shared player state
//!
//! Thread-safe shared state for coordination between the seek controller,
//! background fade tasks, and UI consumers. Uses `RwLock` for concurrent
//! read access with rare writes; events go out over a broadcast channel.

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};

use dcp_common::events::PlayerEvent;
use dcp_common::{CourseIndex, SeekTarget};

/// Playback state
///
/// A player stays `Loading` until a course index can be built — a
/// snapshot that never completes keeps the loading state indefinitely
/// rather than surfacing an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Loading,
    Playing,
    Paused,
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackState::Loading => write!(f, "loading"),
            PlaybackState::Playing => write!(f, "playing"),
            PlaybackState::Paused => write!(f, "paused"),
        }
    }
}

/// Shared state accessible by all player components
pub struct SharedState {
    /// Current playback state
    playback_state: RwLock<PlaybackState>,

    /// Built course index (None until the snapshot is complete)
    course_index: RwLock<Option<Arc<CourseIndex>>>,

    /// Absolute timeline position in seconds
    position_seconds: RwLock<f64>,

    /// Coordinates currently presented by the UI
    active_target: RwLock<Option<SeekTarget>>,

    /// Player volume (0.0–1.0)
    volume: RwLock<f64>,

    /// Event broadcaster for UI/adapter listeners
    event_tx: broadcast::Sender<PlayerEvent>,
}

impl SharedState {
    /// Create new shared state with the given initial volume
    pub fn new(initial_volume: f64) -> Self {
        let (event_tx, _) = broadcast::channel(100); // Buffer up to 100 events
        Self {
            playback_state: RwLock::new(PlaybackState::Loading),
            course_index: RwLock::new(None),
            position_seconds: RwLock::new(0.0),
            active_target: RwLock::new(None),
            volume: RwLock::new(initial_volume.clamp(0.0, 1.0)),
            event_tx,
        }
    }

    /// Broadcast an event to all listeners
    pub fn broadcast_event(&self, event: PlayerEvent) {
        // Ignore send errors (no receivers is OK)
        let _ = self.event_tx.send(event);
    }

    /// Subscribe to the event stream
    pub fn subscribe_events(&self) -> broadcast::Receiver<PlayerEvent> {
        self.event_tx.subscribe()
    }

    /// Get current playback state
    pub async fn playback_state(&self) -> PlaybackState {
        *self.playback_state.read().await
    }

    /// Set playback state
    pub async fn set_playback_state(&self, state: PlaybackState) {
        *self.playback_state.write().await = state;
    }

    /// Get the current course index
    pub async fn course_index(&self) -> Option<Arc<CourseIndex>> {
        self.course_index.read().await.clone()
    }

    /// Replace the course index (full swap, never a partial update)
    pub async fn set_course_index(&self, index: Option<Arc<CourseIndex>>) {
        *self.course_index.write().await = index;
    }

    /// Get the absolute timeline position in seconds
    pub async fn position_seconds(&self) -> f64 {
        *self.position_seconds.read().await
    }

    /// Set the absolute timeline position in seconds
    pub async fn set_position_seconds(&self, seconds: f64) {
        *self.position_seconds.write().await = seconds;
    }

    /// Get the active presentation coordinates
    pub async fn active_target(&self) -> Option<SeekTarget> {
        self.active_target.read().await.clone()
    }

    /// Set the active presentation coordinates
    pub async fn set_active_target(&self, target: Option<SeekTarget>) {
        *self.active_target.write().await = target;
    }

    /// Get player volume (0.0–1.0)
    pub async fn volume(&self) -> f64 {
        *self.volume.read().await
    }

    /// Set player volume (clamped to 0.0–1.0)
    pub async fn set_volume(&self, volume: f64) {
        *self.volume.write().await = volume.clamp(0.0, 1.0);
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new(0.75)
    }
}
