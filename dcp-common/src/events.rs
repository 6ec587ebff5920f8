//! Event types for the course player event system
//!
//! Broadcast by the player as playback and seek state changes; consumers
//! (UI surfaces, progress tracking adapters) subscribe and react. Sends
//! are fire-and-forget — a missing receiver is not an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resolve::SeekTarget;

/// Course player event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerEvent {
    /// Course index rebuilt from a fresh snapshot
    CourseIndexRebuilt {
        module_count: usize,
        total_seconds: f64,
        timestamp: DateTime<Utc>,
    },

    /// Scrub gesture started; ambient position updates are suppressed
    ScrubStarted {
        timestamp: DateTime<Utc>,
    },

    /// Scrub gesture ended and its final position was committed
    ScrubCommitted {
        seconds: f64,
        timestamp: DateTime<Utc>,
    },

    /// A resolved seek target was applied to player state
    SeekApplied {
        target: SeekTarget,
        /// False when only the caption/media position moved (same slide)
        slide_changed: bool,
        timestamp: DateTime<Utc>,
    },

    /// A seek past the unlocked boundary was snapped back to it
    SeekClamped {
        requested_module: usize,
        clamped_module: usize,
        timestamp: DateTime<Utc>,
    },

    /// Hover-preview position resolved after the debounce interval
    HoverPreviewReady {
        seconds: f64,
        target: SeekTarget,
        timestamp: DateTime<Utc>,
    },

    /// Playback position update (media timer tick)
    PlaybackPosition {
        seconds: f64,
        total_seconds: f64,
        playing: bool,
        timestamp: DateTime<Utc>,
    },

    /// Volume changed (user action or fade ramp completion)
    VolumeChanged {
        volume: f64,
        timestamp: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_serialize_with_type_tag() {
        let event = PlayerEvent::CourseIndexRebuilt {
            module_count: 4,
            total_seconds: 1800.0,
            timestamp: Utc::now(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "CourseIndexRebuilt");
        assert_eq!(json["module_count"], 4);
    }

    #[test]
    fn test_seek_applied_round_trips() {
        let event = PlayerEvent::SeekApplied {
            target: SeekTarget {
                module_index: 1,
                lesson_index: 0,
                slide_index: 2,
                caption_index: 3,
                caption_offset_seconds: 1.25,
                slide_id: uuid::Uuid::new_v4(),
            },
            slide_changed: true,
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&event).unwrap();
        let back: PlayerEvent = serde_json::from_str(&json).unwrap();
        match back {
            PlayerEvent::SeekApplied { target, slide_changed, .. } => {
                assert_eq!(target.module_index, 1);
                assert_eq!(target.caption_index, 3);
                assert!(slide_changed);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
