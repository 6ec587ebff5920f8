//! Seek resolution over the course timeline
//!
//! Maps an absolute course-relative second offset to the hierarchical
//! coordinates (module, lesson, slide, caption, intra-caption offset)
//! needed to present that moment, and back again.
//!
//! # Partition walk
//!
//! One rule is applied identically at the module, slide, and caption
//! level: iterate entries in order and select the first whose duration the
//! remaining offset is strictly less than; otherwise subtract that
//! duration and continue. If the loop exhausts — the offset sits at or
//! past the end of the span, including float drift at the exact end — the
//! last entry is selected with whatever offset remains. A boundary offset
//! therefore belongs to the *following* unit: resolving the exact end of
//! one module lands on the first slide of the next.
//!
//! Zero-duration entries are never selected mid-walk (`remaining < 0.0` is
//! never true), so empty lessons and slides are skipped without
//! special-casing. Each call is O(modules + slides-in-module +
//! captions-in-slide); scrub gestures are coalesced upstream so this never
//! runs per pointer-move event.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::index::CourseIndex;

/// Hierarchical coordinates for one moment on the course timeline
///
/// Produced by [`CourseIndex::resolve`]; consumed by the player to select
/// the active module/lesson/slide/caption and to position the media
/// element within the caption's audio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeekTarget {
    pub module_index: usize,
    /// Lesson index within the module
    pub lesson_index: usize,
    /// Slide index within the lesson
    pub slide_index: usize,
    /// Caption index within the slide
    pub caption_index: usize,
    /// Offset into the caption's audio, clamped to `[0, caption seconds]`
    pub caption_offset_seconds: f64,
    pub slide_id: Uuid,
}

/// First entry the offset falls strictly inside, or the last entry as the
/// end-of-span fallback. Returns the selected index and the offset local
/// to it; `None` for an empty slice.
fn partition_walk<T>(entries: &[T], offset: f64, duration: impl Fn(&T) -> f64) -> Option<(usize, f64)> {
    let last = entries.len().checked_sub(1)?;
    let mut remaining = offset;
    for (i, entry) in entries.iter().enumerate() {
        if remaining < duration(entry) {
            return Some((i, remaining));
        }
        if i < last {
            remaining -= duration(entry);
        }
    }
    Some((last, remaining))
}

impl CourseIndex {
    /// Resolve an absolute timeline position to a [`SeekTarget`]
    ///
    /// The requested `seconds` is clamped into
    /// `[0, min(max_allowed_seconds, total_seconds)]` before the walk;
    /// out-of-range requests are never rejected. Pass `f64::INFINITY` as
    /// `max_allowed_seconds` for a fully unlocked course.
    ///
    /// Returns `None` when the index is not meaningful (`total_seconds`
    /// is zero) or the selected chain is empty anywhere (a module without
    /// slides, a slide without captions). Callers treat `None` as a no-op
    /// and leave the playback position untouched.
    pub fn resolve(&self, seconds: f64, max_allowed_seconds: f64) -> Option<SeekTarget> {
        if self.modules.is_empty() || self.total_seconds <= 0.0 {
            return None;
        }

        let limit = max_allowed_seconds.min(self.total_seconds).max(0.0);
        let clamped = seconds.clamp(0.0, limit);

        let (module_index, module_offset) =
            partition_walk(&self.modules, clamped, |m| m.duration_seconds)?;
        let module = &self.modules[module_index];

        let (flat_slide, slide_offset) =
            partition_walk(&module.slides, module_offset, |s| s.duration_seconds)?;
        let slide = &module.slides[flat_slide];

        let (caption_index, caption_offset) =
            partition_walk(&slide.captions, slide_offset, |c| c.duration_seconds())?;
        let caption_seconds = slide.captions[caption_index].duration_seconds();

        Some(SeekTarget {
            module_index,
            lesson_index: slide.lesson_index,
            slide_index: slide.slide_index,
            caption_index,
            caption_offset_seconds: caption_offset.clamp(0.0, caption_seconds),
            slide_id: slide.slide_id,
        })
    }

    /// Seek target at the very end of a module
    ///
    /// The last caption of the last slide, positioned at the caption's
    /// full duration. Used to snap a seek back to the boundary of the
    /// highest unlocked module instead of honoring a request into locked
    /// content. `None` when the module (or its last slide) is empty.
    pub fn module_end_target(&self, module_index: usize) -> Option<SeekTarget> {
        let module = self.modules.get(module_index)?;
        let slide = module.slides.last()?;
        let caption_index = slide.captions.len().checked_sub(1)?;
        let caption = &slide.captions[caption_index];

        Some(SeekTarget {
            module_index,
            lesson_index: slide.lesson_index,
            slide_index: slide.slide_index,
            caption_index,
            caption_offset_seconds: caption.duration_seconds(),
            slide_id: slide.slide_id,
        })
    }

    /// Inverse walk: elapsed timeline seconds at a target's position
    ///
    /// Sums all modules, slides, and captions preceding the target plus
    /// its intra-caption offset. Used for progress-bar rendering. `None`
    /// when the target does not point into this index.
    pub fn elapsed_at(&self, target: &SeekTarget) -> Option<f64> {
        let module = self.modules.get(target.module_index)?;

        let flat_slide = module.slides.iter().position(|s| {
            s.lesson_index == target.lesson_index && s.slide_index == target.slide_index
        })?;
        let slide = &module.slides[flat_slide];
        if target.caption_index >= slide.captions.len() {
            return None;
        }

        let mut elapsed: f64 = self.modules[..target.module_index]
            .iter()
            .map(|m| m.duration_seconds)
            .sum();
        elapsed += module.slides[..flat_slide]
            .iter()
            .map(|s| s.duration_seconds)
            .sum::<f64>();
        elapsed += slide.captions[..target.caption_index]
            .iter()
            .map(|c| c.duration_seconds())
            .sum::<f64>();

        Some(elapsed + target.caption_offset_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{ModuleEntry, SlideEntry};
    use crate::model::CaptionRow;

    fn caption(slide_id: Uuid, line_index: i64, seconds: f64) -> CaptionRow {
        CaptionRow {
            id: Uuid::new_v4(),
            slide_id,
            line_index,
            text: format!("line {}", line_index),
            seconds: Some(seconds),
            audio_url_matthew: None,
            audio_url_joanna: None,
            audio_url_lupe: None,
        }
    }

    fn slide(lesson_index: usize, slide_index: usize, caption_seconds: &[f64]) -> SlideEntry {
        let slide_id = Uuid::new_v4();
        let captions: Vec<CaptionRow> = caption_seconds
            .iter()
            .enumerate()
            .map(|(i, s)| caption(slide_id, i as i64, *s))
            .collect();
        SlideEntry {
            slide_id,
            lesson_index,
            slide_index,
            duration_seconds: caption_seconds.iter().sum(),
            captions,
        }
    }

    fn module(title: &str, slides: Vec<SlideEntry>) -> ModuleEntry {
        ModuleEntry {
            module_id: Uuid::new_v4(),
            title: title.to_string(),
            duration_seconds: slides.iter().map(|s| s.duration_seconds).sum(),
            slides,
        }
    }

    /// Module A: one lesson, slides of 10s (4+6) and 5s. Module B: one
    /// lesson, one slide of 20s (12+8). Grand total 35s.
    fn two_module_index() -> CourseIndex {
        let a = module(
            "Signs and Signals",
            vec![slide(0, 0, &[4.0, 6.0]), slide(0, 1, &[5.0])],
        );
        let b = module("Right of Way", vec![slide(0, 0, &[12.0, 8.0])]);
        let total_seconds = a.duration_seconds + b.duration_seconds;
        CourseIndex {
            modules: vec![a, b],
            total_seconds,
        }
    }

    #[test]
    fn test_resolve_mid_slide() {
        let index = two_module_index();

        // 12s falls 2s into the second slide of module A
        let target = index.resolve(12.0, f64::INFINITY).unwrap();
        assert_eq!(target.module_index, 0);
        assert_eq!(target.slide_index, 1);
        assert_eq!(target.caption_index, 0);
        assert!((target.caption_offset_seconds - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_module_boundary_lands_on_next_module() {
        let index = two_module_index();

        // 15s is the exact A/B boundary: start of module B's single slide
        let target = index.resolve(15.0, f64::INFINITY).unwrap();
        assert_eq!(target.module_index, 1);
        assert_eq!(target.slide_index, 0);
        assert_eq!(target.caption_index, 0);
        assert_eq!(target.caption_offset_seconds, 0.0);
    }

    #[test]
    fn test_resolve_caption_boundary_lands_on_next_caption() {
        let index = two_module_index();

        // 4s is the boundary between captions 0 (4s) and 1 (6s) of slide A0
        let target = index.resolve(4.0, f64::INFINITY).unwrap();
        assert_eq!(target.module_index, 0);
        assert_eq!(target.slide_index, 0);
        assert_eq!(target.caption_index, 1);
        assert_eq!(target.caption_offset_seconds, 0.0);
    }

    #[test]
    fn test_resolve_clamps_out_of_range() {
        let index = two_module_index();

        let at_end = index.resolve(35.0, f64::INFINITY).unwrap();
        let past_end = index.resolve(40.0, f64::INFINITY).unwrap();
        assert_eq!(at_end, past_end);

        // End of timeline is the last caption at its full duration
        assert_eq!(at_end.module_index, 1);
        assert_eq!(at_end.caption_index, 1);
        assert!((at_end.caption_offset_seconds - 8.0).abs() < 1e-9);

        let at_start = index.resolve(0.0, f64::INFINITY).unwrap();
        let before_start = index.resolve(-3.0, f64::INFINITY).unwrap();
        assert_eq!(at_start, before_start);
        assert_eq!(at_start.module_index, 0);
        assert_eq!(at_start.caption_offset_seconds, 0.0);
    }

    #[test]
    fn test_resolve_honors_max_allowed() {
        let index = two_module_index();

        // Entitled through 20s only: a 30s request clamps to 20s
        let capped = index.resolve(30.0, 20.0).unwrap();
        let at_limit = index.resolve(20.0, f64::INFINITY).unwrap();
        assert_eq!(capped, at_limit);

        let elapsed = index.elapsed_at(&capped).unwrap();
        assert!(elapsed <= 20.0 + 1e-9);
    }

    #[test]
    fn test_resolve_round_trip() {
        let index = two_module_index();

        for t in [0.0, 0.5, 3.99, 4.0, 9.0, 10.0, 12.0, 14.999, 15.0, 27.0, 34.9] {
            let target = index.resolve(t, f64::INFINITY).unwrap();
            let elapsed = index.elapsed_at(&target).unwrap();
            assert!(
                (elapsed - t).abs() < 1e-9,
                "round trip drift at t={}: elapsed={}",
                t,
                elapsed
            );
        }
    }

    #[test]
    fn test_resolve_empty_chains_return_none() {
        // Empty index
        let index = CourseIndex {
            modules: vec![],
            total_seconds: 0.0,
        };
        assert!(index.resolve(0.0, f64::INFINITY).is_none());

        // Zero total
        let index = CourseIndex {
            modules: vec![module("Empty", vec![])],
            total_seconds: 0.0,
        };
        assert!(index.resolve(0.0, f64::INFINITY).is_none());

        // Positive total but the selected module has no slides (trailing
        // empty module picked by the end-of-span fallback)
        let index = CourseIndex {
            total_seconds: 10.0,
            modules: vec![
                module("Content", vec![slide(0, 0, &[10.0])]),
                module("Empty", vec![]),
            ],
        };
        assert!(index.resolve(10.0, f64::INFINITY).is_none());
        // Mid-content positions still resolve
        assert!(index.resolve(5.0, f64::INFINITY).is_some());
    }

    #[test]
    fn test_zero_width_slides_are_skipped() {
        let index = CourseIndex {
            total_seconds: 15.0,
            modules: vec![module(
                "Mixed",
                vec![slide(0, 0, &[10.0]), slide(0, 1, &[]), slide(0, 2, &[5.0])],
            )],
        };

        // 10s is the boundary; the zero-width slide 1 is skipped over
        let target = index.resolve(10.0, f64::INFINITY).unwrap();
        assert_eq!(target.slide_index, 2);
        assert_eq!(target.caption_offset_seconds, 0.0);
    }

    #[test]
    fn test_module_end_target() {
        let index = two_module_index();

        let end_of_a = index.module_end_target(0).unwrap();
        assert_eq!(end_of_a.module_index, 0);
        assert_eq!(end_of_a.slide_index, 1);
        assert_eq!(end_of_a.caption_index, 0);
        assert!((end_of_a.caption_offset_seconds - 5.0).abs() < 1e-9);

        // Elapsed at the module-end target equals the module boundary
        let elapsed = index.elapsed_at(&end_of_a).unwrap();
        assert!((elapsed - 15.0).abs() < 1e-9);

        assert!(index.module_end_target(2).is_none());

        let empty = CourseIndex {
            modules: vec![module("Empty", vec![])],
            total_seconds: 0.0,
        };
        assert!(empty.module_end_target(0).is_none());
    }

    #[test]
    fn test_elapsed_at_rejects_foreign_target() {
        let index = two_module_index();
        let mut target = index.resolve(12.0, f64::INFINITY).unwrap();
        target.module_index = 7;
        assert!(index.elapsed_at(&target).is_none());
    }
}
