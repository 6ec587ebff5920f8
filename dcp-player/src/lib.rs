//! # DCP Player Library (dcp-player)
//!
//! Stateful player layer over the pure engine in `dcp-common`.
//!
//! **Purpose:** own per-player-instance state, turn continuous UI gestures
//! (timeline scrubbing, hover previews, deep links) into discrete safe
//! seek applications under entitlement clamping, and run the cancellable
//! background animations (volume fades, hover debounce).
//!
//! **Architecture:** a synchronous [`seek::SeekController`] state machine
//! fed by interleaved UI callbacks, shared state behind `tokio::sync`
//! primitives, and single-slot background tasks for anything animated.

pub mod error;
pub mod fade;
pub mod player;
pub mod seek;
pub mod state;
pub mod task;

pub use error::{Error, Result};
pub use player::CoursePlayer;
pub use seek::{SeekController, SeekOutcome};
pub use state::SharedState;
