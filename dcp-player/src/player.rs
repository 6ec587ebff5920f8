//! Course player facade
//!
//! Owns one player instance's moving parts: the shared state, the seek
//! controller, the background task slots, and the course snapshot. The
//! UI surfaces that previously each carried their own copy of this logic
//! (dashboard player, preview players, admin player) become thin adapters
//! over this type, differing only in the entitlement and rendering policy
//! they feed in.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};

use dcp_common::config::PlayerTuning;
use dcp_common::events::PlayerEvent;
use dcp_common::karaoke::KaraokeTrack;
use dcp_common::model::{CaptionRow, CourseSnapshot, VoiceId};
use dcp_common::CourseIndex;

use crate::fade;
use crate::seek::{SeekController, SeekOutcome};
use crate::state::{PlaybackState, SharedState};
use crate::task::TaskSlot;
use crate::Result;

/// One player instance
pub struct CoursePlayer {
    state: Arc<SharedState>,
    controller: SeekController,
    tuning: PlayerTuning,
    /// Last loaded snapshot, kept for memoized rebuilds
    snapshot: Option<CourseSnapshot>,
    fade_slot: TaskSlot,
    hover_slot: TaskSlot,
}

impl CoursePlayer {
    pub fn new(tuning: PlayerTuning) -> Self {
        let state = Arc::new(SharedState::new(tuning.default_volume));
        Self {
            state,
            controller: SeekController::new(),
            tuning,
            snapshot: None,
            fade_slot: TaskSlot::new(),
            hover_slot: TaskSlot::new(),
        }
    }

    /// Construct with tuning loaded from the standard config locations
    pub fn from_tuning_path(explicit_path: Option<&Path>) -> Result<Self> {
        Ok(Self::new(PlayerTuning::load(explicit_path)?))
    }

    /// Handle to the shared state for UI consumers and event subscribers
    pub fn shared_state(&self) -> Arc<SharedState> {
        self.state.clone()
    }

    pub fn tuning(&self) -> &PlayerTuning {
        &self.tuning
    }

    /// Load (or reload) the course snapshot and rebuild the index
    ///
    /// Returns false when the snapshot is identical to the last one — the
    /// memoized index is kept and nothing is reset. An incomplete
    /// snapshot (missing modules, lessons, or slides) clears the index
    /// and parks the player in `Loading`; the UI keeps its loading state
    /// until a later snapshot completes.
    pub async fn load_course(&mut self, snapshot: CourseSnapshot) -> bool {
        if self.snapshot.as_ref() == Some(&snapshot) {
            debug!("course snapshot unchanged; keeping memoized index");
            return false;
        }

        let index = CourseIndex::build(&snapshot).map(Arc::new);
        self.snapshot = Some(snapshot);
        self.controller.set_index(index.clone());
        self.state.set_course_index(index.clone()).await;
        self.state.set_active_target(None).await;
        self.state.set_position_seconds(0.0).await;

        match index {
            Some(index) => {
                if self.state.playback_state().await == PlaybackState::Loading {
                    self.state.set_playback_state(PlaybackState::Paused).await;
                }
                info!(
                    modules = index.module_count(),
                    total_seconds = index.total_seconds,
                    "course index rebuilt"
                );
                self.state.broadcast_event(PlayerEvent::CourseIndexRebuilt {
                    module_count: index.module_count(),
                    total_seconds: index.total_seconds,
                    timestamp: Utc::now(),
                });
            }
            None => {
                debug!("course snapshot incomplete; index cleared");
                self.state.set_playback_state(PlaybackState::Loading).await;
            }
        }
        true
    }

    /// Update entitlement limits from the progress collaborator
    pub fn set_entitlement(&mut self, max_allowed_seconds: f64, highest_unlocked_module: usize) {
        self.controller
            .set_entitlement(max_allowed_seconds, highest_unlocked_module);
    }

    /// Drag-start on the timeline
    pub async fn begin_scrub(&mut self) {
        self.controller.begin_scrub();
        self.state.broadcast_event(PlayerEvent::ScrubStarted {
            timestamp: Utc::now(),
        });
    }

    /// Drag-move: record the latest position only
    pub fn scrub_to(&mut self, seconds: f64) {
        self.controller.scrub_to(seconds);
    }

    /// Drag-end: resolve and apply the final position
    pub async fn end_scrub(&mut self) -> Option<SeekOutcome> {
        let outcome = self.controller.end_scrub()?;
        self.state.broadcast_event(PlayerEvent::ScrubCommitted {
            seconds: outcome.seconds,
            timestamp: Utc::now(),
        });
        self.apply_outcome(outcome).await
    }

    /// Immediate seek from hover selection or restored progress
    pub async fn request_seek(&mut self, seconds: f64) -> Option<SeekOutcome> {
        let outcome = self.controller.request_seek(seconds)?;
        self.apply_outcome(outcome).await
    }

    /// Deep-link seek to the start of a module
    pub async fn seek_to_module(&mut self, module_index: usize) -> Option<SeekOutcome> {
        let outcome = self.controller.seek_to_module(module_index)?;
        self.apply_outcome(outcome).await
    }

    async fn apply_outcome(&mut self, outcome: SeekOutcome) -> Option<SeekOutcome> {
        self.state
            .set_active_target(Some(outcome.target.clone()))
            .await;
        self.state.set_position_seconds(outcome.seconds).await;

        if let Some(boundary) = outcome.clamped_to_module {
            self.state.broadcast_event(PlayerEvent::SeekClamped {
                requested_module: outcome.requested_module,
                clamped_module: boundary,
                timestamp: Utc::now(),
            });
        }
        self.state.broadcast_event(PlayerEvent::SeekApplied {
            target: outcome.target.clone(),
            slide_changed: outcome.slide_changed,
            timestamp: Utc::now(),
        });
        Some(outcome)
    }

    /// The media element reached the committed target's offset
    pub fn confirm_media_positioned(&mut self) {
        self.controller.confirm_applied();
    }

    /// Ambient media timer tick
    ///
    /// Returns false (and changes nothing) while a scrub gesture owns the
    /// timeline or a committed target is still in flight.
    pub async fn on_media_tick(&mut self, seconds: f64, playing: bool) -> bool {
        if !self.controller.ambient_update_allowed() {
            debug!(seconds, "ambient position update suppressed");
            return false;
        }
        let Some(index) = self.state.course_index().await else {
            return false;
        };

        if let Some(target) = index.resolve(seconds, f64::INFINITY) {
            self.controller.note_ambient_slide(target.slide_id);
            self.state.set_active_target(Some(target)).await;
        }
        self.state.set_position_seconds(seconds).await;
        self.state
            .set_playback_state(if playing {
                PlaybackState::Playing
            } else {
                PlaybackState::Paused
            })
            .await;
        self.state.broadcast_event(PlayerEvent::PlaybackPosition {
            seconds,
            total_seconds: index.total_seconds,
            playing,
            timestamp: Utc::now(),
        });
        true
    }

    /// Schedule a debounced hover preview at a timeline position
    ///
    /// A newer hover restarts the debounce; the resolved preview goes out
    /// as a [`PlayerEvent::HoverPreviewReady`] event.
    pub fn schedule_hover_preview(&mut self, seconds: f64) {
        let state = self.state.clone();
        let debounce = Duration::from_millis(self.tuning.hover_debounce_ms);

        self.hover_slot.replace(async move {
            tokio::time::sleep(debounce).await;
            let Some(index) = state.course_index().await else {
                return;
            };
            if let Some(target) = index.resolve(seconds, f64::INFINITY) {
                state.broadcast_event(PlayerEvent::HoverPreviewReady {
                    seconds,
                    target,
                    timestamp: Utc::now(),
                });
            }
        });
    }

    /// Fade the player volume toward a target
    pub fn fade_to_volume(&mut self, target_volume: f64) {
        fade::start_fade(
            &mut self.fade_slot,
            self.state.clone(),
            target_volume,
            &self.tuning,
        );
    }

    /// Karaoke track for a caption, using the configured pacing
    pub fn karaoke_track(&self, caption: &CaptionRow) -> KaraokeTrack {
        KaraokeTrack::new(
            &caption.text,
            caption.duration_seconds(),
            self.tuning.karaoke_speed,
        )
    }

    /// Highlighted display-word index at a caption-local playback time
    pub fn karaoke_index(&self, track: &KaraokeTrack, caption_seconds: f64) -> Option<usize> {
        track.display_index_at(caption_seconds, self.tuning.karaoke_lead_seconds)
    }

    /// Caption row at the active target, if any
    pub async fn active_caption(&self) -> Option<CaptionRow> {
        let index = self.state.course_index().await?;
        let target = self.state.active_target().await?;
        let module = index.modules.get(target.module_index)?;
        let slide = module
            .slides
            .iter()
            .find(|s| s.slide_id == target.slide_id)?;
        slide.captions.get(target.caption_index).cloned()
    }

    /// Audio URL of the active caption for the given voice
    pub async fn active_caption_audio(&self, voice: VoiceId) -> Option<String> {
        let caption = self.active_caption().await?;
        voice.audio_url(&caption).map(str::to_string)
    }

    /// Player unmount: cancel debounce timers, animations, and gestures
    pub fn unmount(&mut self) {
        self.hover_slot.cancel();
        self.fade_slot.cancel();
        self.controller.cancel();
    }
}
