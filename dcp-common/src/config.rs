//! Player tuning configuration
//!
//! Tunable constants for the player: karaoke pacing, hover-preview
//! debounce, fade ramp shape, default volume. Loaded from a TOML file
//! resolved in priority order:
//!
//! 1. Explicit path (command-line argument) — highest priority
//! 2. Environment variable pointing at a file
//! 3. Per-user config file (`<config dir>/dcp/player.toml`)
//! 4. Compiled defaults (fallback)
//!
//! An explicitly named file that is missing or malformed is an error; the
//! per-user file is best-effort and falls through to defaults when absent.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{Error, Result};

/// Environment variable naming a tuning file
pub const TUNING_ENV_VAR: &str = "DCP_PLAYER_TUNING";

/// Tunable player constants
///
/// All fields have serde defaults, so a partial TOML file overrides only
/// what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Karaoke pacing scale applied to caption durations (0.95–0.98 in
    /// practice; spoken audio runs slightly ahead of nominal pace)
    pub karaoke_speed: f64,

    /// Perceptual lead when looking up the highlighted word, seconds
    pub karaoke_lead_seconds: f64,

    /// Debounce before a hover-preview position is resolved, milliseconds
    pub hover_debounce_ms: u64,

    /// Volume fade ramp length, seconds
    pub fade_seconds: f64,

    /// Volume fade tick interval, milliseconds
    pub fade_tick_ms: u64,

    /// Volume fade ramp shape
    pub fade_curve: crate::fade_curves::FadeCurve,

    /// Initial player volume (0.0–1.0)
    pub default_volume: f64,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            karaoke_speed: crate::karaoke::DEFAULT_SPEED,
            karaoke_lead_seconds: crate::karaoke::DEFAULT_LEAD_SECONDS,
            hover_debounce_ms: 150,
            fade_seconds: 0.4,
            fade_tick_ms: 16,
            fade_curve: crate::fade_curves::FadeCurve::default(),
            default_volume: 0.75,
        }
    }
}

impl PlayerTuning {
    /// Load tuning following the priority order in the module docs
    pub fn load(explicit_path: Option<&Path>) -> Result<PlayerTuning> {
        // Priority 1: explicit path; failure to read it is an error
        if let Some(path) = explicit_path {
            debug!(path = %path.display(), "loading tuning from explicit path");
            return Self::from_file(path);
        }

        // Priority 2: environment variable
        if let Ok(path) = std::env::var(TUNING_ENV_VAR) {
            debug!(%path, "loading tuning from {}", TUNING_ENV_VAR);
            return Self::from_file(Path::new(&path));
        }

        // Priority 3: per-user config file, best effort
        if let Some(path) = Self::user_config_file() {
            if path.exists() {
                debug!(path = %path.display(), "loading tuning from user config");
                return Self::from_file(&path);
            }
        }

        // Priority 4: compiled defaults
        Ok(PlayerTuning::default())
    }

    /// Parse tuning from a TOML file
    pub fn from_file(path: &Path) -> Result<PlayerTuning> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse tuning from a TOML string
    pub fn from_toml_str(content: &str) -> Result<PlayerTuning> {
        let tuning: PlayerTuning = toml::from_str(content)
            .map_err(|e| Error::Config(format!("invalid tuning file: {}", e)))?;
        Ok(tuning.validated())
    }

    /// Per-user config file location
    fn user_config_file() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("dcp").join("player.toml"))
    }

    /// Clamp loaded values into their working ranges
    ///
    /// Out-of-range values are clamped rather than rejected so a stale
    /// tuning file cannot make the player unusable.
    pub fn validated(mut self) -> PlayerTuning {
        self.karaoke_speed = if self.karaoke_speed.is_finite() {
            self.karaoke_speed.clamp(0.5, 1.0)
        } else {
            crate::karaoke::DEFAULT_SPEED
        };
        self.karaoke_lead_seconds = if self.karaoke_lead_seconds.is_finite() {
            self.karaoke_lead_seconds.clamp(0.0, 1.0)
        } else {
            crate::karaoke::DEFAULT_LEAD_SECONDS
        };
        self.fade_seconds = if self.fade_seconds.is_finite() {
            self.fade_seconds.clamp(0.0, 10.0)
        } else {
            0.4
        };
        self.fade_tick_ms = self.fade_tick_ms.clamp(1, 1000);
        self.default_volume = if self.default_volume.is_finite() {
            self.default_volume.clamp(0.0, 1.0)
        } else {
            0.75
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let tuning = PlayerTuning::default();
        assert_eq!(tuning.karaoke_speed, 0.97);
        assert_eq!(tuning.karaoke_lead_seconds, 0.08);
        assert_eq!(tuning.hover_debounce_ms, 150);
        assert_eq!(tuning.default_volume, 0.75);
    }

    #[test]
    fn test_partial_file_overrides_named_fields_only() {
        let tuning = PlayerTuning::from_toml_str("karaoke_speed = 0.95\n").unwrap();
        assert_eq!(tuning.karaoke_speed, 0.95);
        assert_eq!(tuning.hover_debounce_ms, 150);
        assert_eq!(tuning.fade_curve, crate::fade_curves::FadeCurve::SCurve);
    }

    #[test]
    fn test_fade_curve_parses_by_name() {
        let tuning = PlayerTuning::from_toml_str("fade_curve = \"equalpower\"\n").unwrap();
        assert_eq!(tuning.fade_curve, crate::fade_curves::FadeCurve::EqualPower);
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = PlayerTuning::from_toml_str("karaoke_speed = \"fast\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let tuning = PlayerTuning::from_toml_str(
            "karaoke_speed = 3.0\ndefault_volume = -1.0\nfade_tick_ms = 0\n",
        )
        .unwrap();
        assert_eq!(tuning.karaoke_speed, 1.0);
        assert_eq!(tuning.default_volume, 0.0);
        assert_eq!(tuning.fade_tick_ms, 1);
    }

    #[test]
    fn test_explicit_path_wins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "hover_debounce_ms = 300").unwrap();

        let tuning = PlayerTuning::load(Some(file.path())).unwrap();
        assert_eq!(tuning.hover_debounce_ms, 300);
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let result = PlayerTuning::load(Some(Path::new("/nonexistent/player.toml")));
        assert!(result.is_err());
    }

    // Tests that manipulate TUNING_ENV_VAR are #[serial] to avoid racing
    // each other on the process environment.

    #[test]
    #[serial]
    fn test_env_var_is_consulted_without_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fade_seconds = 2.0").unwrap();
        std::env::set_var(TUNING_ENV_VAR, file.path());

        let tuning = PlayerTuning::load(None).unwrap();
        std::env::remove_var(TUNING_ENV_VAR);

        assert_eq!(tuning.fade_seconds, 2.0);
    }

    #[test]
    #[serial]
    fn test_explicit_path_beats_env_var() {
        let mut explicit = tempfile::NamedTempFile::new().unwrap();
        writeln!(explicit, "hover_debounce_ms = 400").unwrap();
        let mut via_env = tempfile::NamedTempFile::new().unwrap();
        writeln!(via_env, "hover_debounce_ms = 500").unwrap();
        std::env::set_var(TUNING_ENV_VAR, via_env.path());

        let tuning = PlayerTuning::load(Some(explicit.path())).unwrap();
        std::env::remove_var(TUNING_ENV_VAR);

        assert_eq!(tuning.hover_debounce_ms, 400);
    }
}
