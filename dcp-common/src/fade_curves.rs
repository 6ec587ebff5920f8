//! Fade curve implementations for volume ramps
//!
//! Shapes the player's fade-to-volume animation (autoplay unlock fade-in,
//! mute/duck transitions). Each curve trades differently between abrupt
//! and sluggish perceived changes:
//!
//! - Linear: constant rate of change (precise, predictable)
//! - Exponential: slow start, fast finish (natural-sounding fade-in)
//! - Logarithmic: fast start, slow finish (natural-sounding fade-out)
//! - SCurve: smooth acceleration and deceleration (gentle)
//! - EqualPower: constant perceived loudness across the ramp

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

/// Fade curve types for volume ramps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FadeCurve {
    /// v(t) = t
    Linear,
    /// v(t) = t² — slow start, fast finish
    Exponential,
    /// v(t) = (1-t)² for fade-out — fast start, slow finish
    Logarithmic,
    /// v(t) = 0.5 × (1 - cos(π × t)) — smooth S-curve
    SCurve,
    /// v(t) = sin(t × π/2) — constant perceived loudness
    EqualPower,
}

impl FadeCurve {
    /// Fade-in multiplier at a normalized position
    ///
    /// `position` runs 0.0 (start of fade) to 1.0 (end); the result rises
    /// from 0.0 to 1.0.
    pub fn fade_in(&self, position: f64) -> f64 {
        let t = position.clamp(0.0, 1.0);

        match self {
            FadeCurve::Linear => t,
            FadeCurve::Exponential => t * t,
            FadeCurve::Logarithmic => {
                // Logarithmic is a fade-out shape; inverted for fade-in
                t.sqrt()
            }
            FadeCurve::SCurve => 0.5 * (1.0 - (PI * t).cos()),
            FadeCurve::EqualPower => (t * FRAC_PI_2).sin(),
        }
    }

    /// Fade-out multiplier at a normalized position
    ///
    /// `position` runs 0.0 (start of fade) to 1.0 (end); the result falls
    /// from 1.0 to 0.0.
    pub fn fade_out(&self, position: f64) -> f64 {
        let t = position.clamp(0.0, 1.0);

        match self {
            FadeCurve::Linear => 1.0 - t,
            FadeCurve::Exponential => {
                let inv = 1.0 - t;
                inv * inv
            }
            FadeCurve::Logarithmic => {
                let inv = 1.0 - t;
                inv * inv
            }
            FadeCurve::SCurve => 0.5 * (1.0 + (PI * t).cos()),
            FadeCurve::EqualPower => (t * FRAC_PI_2).cos(),
        }
    }
}

impl Default for FadeCurve {
    fn default() -> Self {
        FadeCurve::SCurve
    }
}
