//! Volume fade ramps
//!
//! Drives the shared player volume toward a target over a short ramp,
//! shaped by a fade curve. The ramp runs as a background task inside a
//! [`TaskSlot`], so requesting a new fade supersedes the running one and
//! player unmount cancels it mid-ramp. Used for autoplay-unlock fade-in
//! and mute/duck transitions.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::debug;

use dcp_common::config::PlayerTuning;
use dcp_common::events::PlayerEvent;
use dcp_common::FadeCurve;

use crate::state::SharedState;
use crate::task::TaskSlot;

/// Start a fade toward `target_volume` in the given slot
///
/// Any ramp already occupying the slot is aborted first; the volume it
/// reached so far becomes the new ramp's starting point.
pub fn start_fade(
    slot: &mut TaskSlot,
    state: Arc<SharedState>,
    target_volume: f64,
    tuning: &PlayerTuning,
) {
    let target = target_volume.clamp(0.0, 1.0);
    let duration_seconds = tuning.fade_seconds;
    let tick = Duration::from_millis(tuning.fade_tick_ms);
    let curve = tuning.fade_curve;

    slot.replace(async move {
        run_fade(state, target, duration_seconds, tick, curve).await;
    });
}

async fn run_fade(
    state: Arc<SharedState>,
    target: f64,
    duration_seconds: f64,
    tick: Duration,
    curve: FadeCurve,
) {
    let start = state.volume().await;
    debug!(start, target, duration_seconds, "volume fade started");

    if duration_seconds > 0.0 && (start - target).abs() > f64::EPSILON {
        let started = tokio::time::Instant::now();
        let mut interval = tokio::time::interval(tick);

        loop {
            interval.tick().await;
            let progress = started.elapsed().as_secs_f64() / duration_seconds;
            if progress >= 1.0 {
                break;
            }
            // Rising ramps follow the fade-in shape, falling ramps the
            // fade-out shape; both interpolate start → target.
            let eased = if target >= start {
                curve.fade_in(progress)
            } else {
                1.0 - curve.fade_out(progress)
            };
            state.set_volume(start + (target - start) * eased).await;
        }
    }

    state.set_volume(target).await;
    state.broadcast_event(PlayerEvent::VolumeChanged {
        volume: target,
        timestamp: Utc::now(),
    });
}
