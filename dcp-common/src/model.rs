//! Course content rows and the snapshot read-shape
//!
//! These are read-only snapshots handed over by the external data-access
//! layer. The engine never persists or mutates them; the derived
//! [`CourseIndex`](crate::index::CourseIndex) is rebuilt from a fresh
//! snapshot whenever any row list changes.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::{Error, Result};

/// Top-level ordered unit of a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRow {
    pub id: Uuid,
    pub title: String,
    pub sort_order: i64,
}

/// Lesson within a module, ordered by `sort_order`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonRow {
    pub id: Uuid,
    pub module_id: Uuid,
    pub title: String,
    pub sort_order: i64,
}

/// Slide within a lesson, ordered by `order_index`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideRow {
    pub id: Uuid,
    pub lesson_id: Uuid,
    pub order_index: i64,
    pub image_path: String,
}

/// Timed caption line within a slide, ordered by `line_index`
///
/// `seconds` is the authoritative spoken duration produced by the upstream
/// TTS pipeline; a missing value counts as zero everywhere in the engine.
/// The per-voice audio columns are only reached through the voice lookup
/// table ([`VoiceId::audio_url`]), never by branching on voice names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionRow {
    pub id: Uuid,
    pub slide_id: Uuid,
    pub line_index: i64,
    pub text: String,
    #[serde(default)]
    pub seconds: Option<f64>,
    #[serde(default)]
    pub audio_url_matthew: Option<String>,
    #[serde(default)]
    pub audio_url_joanna: Option<String>,
    #[serde(default)]
    pub audio_url_lupe: Option<String>,
}

impl CaptionRow {
    /// Spoken duration with missing values counted as zero
    pub fn duration_seconds(&self) -> f64 {
        self.seconds.unwrap_or(0.0)
    }
}

/// Flat course snapshot as fetched by the external data-access layer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CourseSnapshot {
    pub modules: Vec<ModuleRow>,
    pub lessons: Vec<LessonRow>,
    pub slides: Vec<SlideRow>,
    pub captions: Vec<CaptionRow>,
}

// ============================================================================
// Voice lookup table
// ============================================================================

/// Stable TTS voice identifiers
///
/// Each voice corresponds to one pre-generated audio column on
/// [`CaptionRow`]. New voices are added by extending [`VOICES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceId {
    Matthew,
    Joanna,
    Lupe,
}

/// One entry in the voice lookup table
pub struct VoiceSpec {
    pub id: VoiceId,
    /// BCP-47 language tag of the voice
    pub language: &'static str,
    accessor: for<'a> fn(&'a CaptionRow) -> Option<&'a str>,
}

fn matthew_audio(caption: &CaptionRow) -> Option<&str> {
    caption.audio_url_matthew.as_deref()
}

fn joanna_audio(caption: &CaptionRow) -> Option<&str> {
    caption.audio_url_joanna.as_deref()
}

fn lupe_audio(caption: &CaptionRow) -> Option<&str> {
    caption.audio_url_lupe.as_deref()
}

/// Voice identifier → caption audio-column accessor
///
/// | Voice   | Language | Column                |
/// |---------|----------|-----------------------|
/// | Matthew | en-US    | `audio_url_matthew`   |
/// | Joanna  | en-US    | `audio_url_joanna`    |
/// | Lupe    | es-US    | `audio_url_lupe`      |
pub const VOICES: [VoiceSpec; 3] = [
    VoiceSpec {
        id: VoiceId::Matthew,
        language: "en-US",
        accessor: matthew_audio,
    },
    VoiceSpec {
        id: VoiceId::Joanna,
        language: "en-US",
        accessor: joanna_audio,
    },
    VoiceSpec {
        id: VoiceId::Lupe,
        language: "es-US",
        accessor: lupe_audio,
    },
];

impl VoiceId {
    /// Audio URL of `caption` for this voice, via the lookup table
    pub fn audio_url(self, caption: &CaptionRow) -> Option<&str> {
        VOICES
            .iter()
            .find(|spec| spec.id == self)
            .and_then(|spec| (spec.accessor)(caption))
    }

    /// Language tag of this voice
    pub fn language(self) -> &'static str {
        VOICES
            .iter()
            .find(|spec| spec.id == self)
            .map(|spec| spec.language)
            .unwrap_or("en-US")
    }
}

impl std::fmt::Display for VoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoiceId::Matthew => write!(f, "matthew"),
            VoiceId::Joanna => write!(f, "joanna"),
            VoiceId::Lupe => write!(f, "lupe"),
        }
    }
}

impl FromStr for VoiceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "matthew" => Ok(VoiceId::Matthew),
            "joanna" => Ok(VoiceId::Joanna),
            "lupe" => Ok(VoiceId::Lupe),
            other => Err(Error::InvalidInput(format!("unknown voice: {}", other))),
        }
    }
}
