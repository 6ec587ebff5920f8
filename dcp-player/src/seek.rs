//! Seek gesture mediation
//!
//! Turns continuous UI gestures (pointer drags across the timeline,
//! hover previews, deep links) into discrete, safe seek applications
//! without tearing media playback state or violating access control.
//!
//! # State machine
//!
//! - **Idle** — seek requests from hover/deep-link resolve and apply
//!   immediately.
//! - **Scrubbing** — entered on drag-start. Every intermediate drag
//!   position overwrites a single pending-seconds slot (last write wins);
//!   nothing is resolved yet, and ambient position updates are suppressed
//!   so the gesture does not fight the media timer.
//! - **Committing** — entered on drag-end. The final pending value is
//!   resolved against the viewer's allowed maximum; a target beyond the
//!   highest unlocked module snaps back to that module's end instead of
//!   being honored. The commit-in-flight flag then blocks ambient updates
//!   until the caller confirms the media element actually reached the
//!   target.
//!
//! Per-instance state lives in named fields on this struct; there is no
//! module-level mutable state, and each player owns its own controller.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use dcp_common::{CourseIndex, SeekTarget};

/// Result of committing a seek request
#[derive(Debug, Clone, PartialEq)]
pub struct SeekOutcome {
    pub target: SeekTarget,

    /// Absolute timeline seconds at the target (post-clamping)
    pub seconds: f64,

    /// False when the target stays on the current slide — the caller may
    /// take the cheap path (caption index + media time only) instead of a
    /// full slide re-render
    pub slide_changed: bool,

    /// Module the request resolved to before entitlement clamping; equals
    /// `target.module_index` unless the seek was snapped back
    pub requested_module: usize,

    /// Module boundary the request was snapped back to, when the resolved
    /// module exceeded the viewer's unlocked range
    pub clamped_to_module: Option<usize>,
}

/// Per-player seek controller
pub struct SeekController {
    index: Option<Arc<CourseIndex>>,

    /// Furthest timeline position the viewer may seek to, in seconds
    max_allowed_seconds: f64,

    /// Highest module index the viewer has unlocked
    highest_unlocked_module: usize,

    scrub_active: bool,

    /// Latest uncommitted scrub position; a single cell, not a queue —
    /// intermediate drag positions are intentionally discarded
    pending_seconds: Option<f64>,

    /// Target computed by the last commit, kept until confirmed
    applied_target: Option<SeekTarget>,

    /// Blocks ambient position updates from overwriting a committed
    /// target that the media element has not reached yet
    commit_in_flight: bool,

    /// Slide currently presented, for the cheap/expensive path decision
    current_slide: Option<Uuid>,
}

impl SeekController {
    pub fn new() -> Self {
        Self {
            index: None,
            max_allowed_seconds: f64::INFINITY,
            highest_unlocked_module: usize::MAX,
            scrub_active: false,
            pending_seconds: None,
            applied_target: None,
            commit_in_flight: false,
            current_slide: None,
        }
    }

    /// Swap the course index; clears all gesture state, a new course
    /// invalidates any pending or unconfirmed seek
    pub fn set_index(&mut self, index: Option<Arc<CourseIndex>>) {
        self.index = index;
        self.scrub_active = false;
        self.pending_seconds = None;
        self.applied_target = None;
        self.commit_in_flight = false;
        self.current_slide = None;
    }

    /// Update entitlement limits from the progress collaborator
    ///
    /// `max_allowed_seconds` may be `f64::INFINITY` for a fully unlocked
    /// course; `highest_unlocked_module` caps committed module indices.
    pub fn set_entitlement(&mut self, max_allowed_seconds: f64, highest_unlocked_module: usize) {
        self.max_allowed_seconds = max_allowed_seconds;
        self.highest_unlocked_module = highest_unlocked_module;
    }

    /// Drag-start: enter Scrubbing
    ///
    /// Cancels any previously pending value and any committed-but-
    /// unconfirmed target; the new gesture owns the timeline now.
    pub fn begin_scrub(&mut self) {
        self.scrub_active = true;
        self.pending_seconds = None;
        self.applied_target = None;
        self.commit_in_flight = false;
    }

    /// Drag-move: record the latest position (last write wins)
    ///
    /// Ignored outside a scrub session; nothing is resolved here.
    pub fn scrub_to(&mut self, seconds: f64) {
        if self.scrub_active {
            self.pending_seconds = Some(seconds);
        }
    }

    /// Drag-end: commit the final pending position
    ///
    /// Returns `None` for a click without drag (no pending value — no
    /// transition) or when resolution is not possible.
    pub fn end_scrub(&mut self) -> Option<SeekOutcome> {
        if !self.scrub_active {
            return None;
        }
        self.scrub_active = false;
        let seconds = self.pending_seconds.take()?;
        self.commit(seconds)
    }

    /// Immediate seek (hover selection, deep link, restored progress)
    ///
    /// Rejected while a scrub gesture is active — the gesture wins.
    pub fn request_seek(&mut self, seconds: f64) -> Option<SeekOutcome> {
        if self.scrub_active {
            debug!(seconds, "seek request ignored during active scrub");
            return None;
        }
        self.commit(seconds)
    }

    /// Deep-link seek to the start of a module
    ///
    /// An out-of-range index clamps to the last module; entitlement
    /// clamping then applies like any other seek.
    pub fn seek_to_module(&mut self, module_index: usize) -> Option<SeekOutcome> {
        if self.scrub_active {
            return None;
        }
        let index = self.index.as_ref()?;
        let bounded = module_index.min(index.module_count().checked_sub(1)?);
        let start_seconds = index.module_start_seconds(bounded)?;
        self.commit(start_seconds)
    }

    /// Resolve and record a commit
    fn commit(&mut self, seconds: f64) -> Option<SeekOutcome> {
        let index = self.index.clone()?;
        let resolved = index.resolve(seconds, self.max_allowed_seconds)?;
        let requested_module = resolved.module_index;

        let (target, clamped_to_module) = if resolved.module_index > self.highest_unlocked_module {
            // Access-control invariant: dragging past the unlocked
            // boundary snaps back to the boundary, never advances.
            let boundary = index.module_end_target(self.highest_unlocked_module)?;
            debug!(
                requested = resolved.module_index,
                clamped = self.highest_unlocked_module,
                "seek clamped to unlocked module boundary"
            );
            (boundary, Some(self.highest_unlocked_module))
        } else {
            (resolved, None)
        };

        let seconds_at_target = index.elapsed_at(&target).unwrap_or(seconds);
        let slide_changed = self.current_slide != Some(target.slide_id);

        self.current_slide = Some(target.slide_id);
        self.applied_target = Some(target.clone());
        self.commit_in_flight = true;

        Some(SeekOutcome {
            target,
            seconds: seconds_at_target,
            slide_changed,
            requested_module,
            clamped_to_module,
        })
    }

    /// Whether an ambient position update (media timer tick) may be
    /// applied right now
    ///
    /// Suppressed while scrubbing and while a committed target has not
    /// been confirmed — the pending target wins over concurrent ambient
    /// updates until it is fully consumed.
    pub fn ambient_update_allowed(&self) -> bool {
        !self.scrub_active && !self.commit_in_flight
    }

    /// Record the slide an accepted ambient update landed on
    pub fn note_ambient_slide(&mut self, slide_id: Uuid) {
        if self.ambient_update_allowed() {
            self.current_slide = Some(slide_id);
        }
    }

    /// The media element reached the committed target; ambient updates
    /// may flow again
    pub fn confirm_applied(&mut self) {
        self.commit_in_flight = false;
    }

    /// Player unmount: drop all gesture state
    pub fn cancel(&mut self) {
        self.scrub_active = false;
        self.pending_seconds = None;
        self.applied_target = None;
        self.commit_in_flight = false;
    }

    pub fn scrub_active(&self) -> bool {
        self.scrub_active
    }

    pub fn commit_in_flight(&self) -> bool {
        self.commit_in_flight
    }

    pub fn pending_seconds(&self) -> Option<f64> {
        self.pending_seconds
    }

    pub fn applied_target(&self) -> Option<&SeekTarget> {
        self.applied_target.as_ref()
    }
}

impl Default for SeekController {
    fn default() -> Self {
        Self::new()
    }
}
