//! Karaoke word-timing synthesis
//!
//! Given a caption's text and its total spoken duration, produces a
//! per-word start/end table used to highlight the currently-spoken word
//! during audio playback.
//!
//! # Two tokenizations
//!
//! The same text is tokenized twice:
//!
//! - **Display tokens**: whitespace split, punctuation kept attached
//!   (`"Slow down,"` → `["Slow", "down,"]`). These are what the caption
//!   renderer highlights.
//! - **Timing tokens**: leading/trailing punctuation split into its own
//!   tokens (`["Slow", "down", ","]`). Punctuation carries pacing weight —
//!   a period holds longer than a comma — without being highlightable.
//!
//! A reconciliation walk maps every timing token back to a display index:
//! a pure punctuation token attaches to the current display word without
//! advancing; a word token attaches to the current display word when that
//! word starts with or contains it, otherwise the display index advances
//! first.
//!
//! # Pacing
//!
//! Token weights: `.` → 14, `,` → 6, other punctuation → 4, words →
//! `clamp(len × 1.1, 2, 8)`. The total duration is scaled by a speed
//! constant (spoken audio runs slightly ahead of nominal pace) and then
//! distributed proportionally to weight via a running cumulative cursor,
//! yielding contiguous gapless `[start, end)` intervals covering
//! `[0, total × speed)`.

/// Default playback-pace scale applied before distributing word intervals
pub const DEFAULT_SPEED: f64 = 0.97;

/// Default perceptual lead applied when looking up the active word
pub const DEFAULT_LEAD_SECONDS: f64 = 0.08;

const PERIOD_WEIGHT: f64 = 14.0;
const COMMA_WEIGHT: f64 = 6.0;
const OTHER_PUNCT_WEIGHT: f64 = 4.0;
const MIN_WORD_WEIGHT: f64 = 2.0;
const MAX_WORD_WEIGHT: f64 = 8.0;
const WORD_WEIGHT_PER_CHAR: f64 = 1.1;

/// One timing interval on the caption's local clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordTiming {
    pub start: f64,
    pub end: f64,
}

/// Whitespace-split tokens with punctuation attached
pub fn display_tokens(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Tokens for pacing: leading/trailing punctuation split out per character
pub fn timing_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for chunk in text.split_whitespace() {
        let core_start = chunk.char_indices().find(|(_, c)| c.is_alphanumeric());
        let Some((start, _)) = core_start else {
            // Pure punctuation chunk: every character is its own token
            for ch in chunk.chars() {
                tokens.push(ch.to_string());
            }
            continue;
        };
        let end = chunk
            .char_indices()
            .filter(|(_, c)| c.is_alphanumeric())
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(chunk.len());

        for ch in chunk[..start].chars() {
            tokens.push(ch.to_string());
        }
        tokens.push(chunk[start..end].to_string());
        for ch in chunk[end..].chars() {
            tokens.push(ch.to_string());
        }
    }
    tokens
}

fn is_punctuation(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| !c.is_alphanumeric())
}

fn token_weight(token: &str) -> f64 {
    if is_punctuation(token) {
        match token {
            "." => PERIOD_WEIGHT,
            "," => COMMA_WEIGHT,
            _ => OTHER_PUNCT_WEIGHT,
        }
    } else {
        (token.chars().count() as f64 * WORD_WEIGHT_PER_CHAR)
            .clamp(MIN_WORD_WEIGHT, MAX_WORD_WEIGHT)
    }
}

/// Map each timing token to the display token it belongs to
///
/// Returns an empty map when there are no display tokens.
pub fn map_timing_to_display(display: &[String], timing: &[String]) -> Vec<usize> {
    let Some(last_display) = display.len().checked_sub(1) else {
        return Vec::new();
    };

    let mut map = Vec::with_capacity(timing.len());
    let mut current = 0usize;
    for token in timing {
        if is_punctuation(token) {
            map.push(current.min(last_display));
            continue;
        }
        let word = &display[current.min(last_display)];
        if !(word.starts_with(token.as_str()) || word.contains(token.as_str())) {
            current = (current + 1).min(last_display);
        }
        map.push(current);
    }
    map
}

/// Distribute a scaled total duration across timing tokens by weight
///
/// Intervals are contiguous and gapless; the final `end` equals
/// `total_seconds × speed` (cumulative ratios, so the last interval closes
/// the span exactly). Empty tokens or a non-positive duration yield an
/// empty table.
pub fn compute_word_timings(total_seconds: f64, timing: &[String], speed: f64) -> Vec<WordTiming> {
    if timing.is_empty() || total_seconds <= 0.0 {
        return Vec::new();
    }

    let weights: Vec<f64> = timing.iter().map(|t| token_weight(t)).collect();
    let total_weight: f64 = weights.iter().sum();
    if total_weight <= 0.0 {
        return Vec::new();
    }

    let scaled = total_seconds * speed;
    let mut out = Vec::with_capacity(weights.len());
    let mut cursor = 0.0;
    let mut cumulative = 0.0;
    for weight in &weights {
        cumulative += weight;
        let end = scaled * (cumulative / total_weight);
        out.push(WordTiming { start: cursor, end });
        cursor = end;
    }
    out
}

/// Synthesized word timings for one caption
///
/// Bundles the display words, the timing table, and the timing→display
/// map so the renderer only needs [`KaraokeTrack::display_index_at`].
#[derive(Debug, Clone, PartialEq)]
pub struct KaraokeTrack {
    pub display_words: Vec<String>,
    pub timings: Vec<WordTiming>,
    pub timing_to_display: Vec<usize>,
}

impl KaraokeTrack {
    /// Synthesize timings for a caption's text and spoken duration
    pub fn new(text: &str, total_seconds: f64, speed: f64) -> Self {
        let display_words = display_tokens(text);
        let timing = timing_tokens(text);
        let timings = compute_word_timings(total_seconds, &timing, speed);
        let timing_to_display = map_timing_to_display(&display_words, &timing);
        Self {
            display_words,
            timings,
            timing_to_display,
        }
    }

    /// Display-word index to highlight at a caption-local playback time
    ///
    /// Selects the first interval whose `end` exceeds
    /// `playback_seconds + lead_seconds` (the lead compensates perceptual
    /// and rendering lag). Past the end of the table, the last interval's
    /// display index is held. `None` only when the track is empty.
    pub fn display_index_at(&self, playback_seconds: f64, lead_seconds: f64) -> Option<usize> {
        if self.timings.is_empty() || self.timing_to_display.is_empty() {
            return None;
        }
        let t = playback_seconds + lead_seconds;
        for (i, timing) in self.timings.iter().enumerate() {
            if timing.end > t {
                return self.timing_to_display.get(i).copied();
            }
        }
        self.timing_to_display.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }
}
