//! Course index construction
//!
//! Flattens the module → lesson → slide → caption hierarchy into an
//! ordered, duration-annotated index over a single continuous timeline.
//!
//! # Design
//!
//! - Modules sorted by `sort_order`; lessons grouped per module and sorted
//!   by `sort_order`; slides grouped per lesson and sorted by
//!   `order_index`; captions grouped per slide and sorted by `line_index`.
//!   All sorts are stable, so equal keys preserve snapshot order.
//! - The concatenation of all slide entries in module → lesson → slide
//!   order forms a gapless partition of `[0, total_seconds)`; every
//!   sub-partition (module, slide, caption) partitions its parent's span.
//! - Building is a pure function of the snapshot: identical inputs always
//!   produce an identical index. The index is rebuilt and fully replaced
//!   whenever any input list changes; it is never persisted.

use std::collections::HashMap;
use uuid::Uuid;

use crate::model::{CaptionRow, CourseSnapshot};

/// Sum of caption durations, missing values counted as zero
///
/// Empty input yields `0.0`; there are no error conditions.
pub fn caption_seconds(captions: &[CaptionRow]) -> f64 {
    captions.iter().map(|c| c.duration_seconds()).sum()
}

/// Flattened slide with its position within the owning module
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SlideEntry {
    pub slide_id: Uuid,
    /// Index of the owning lesson within its module
    pub lesson_index: usize,
    /// Index of this slide within its lesson
    pub slide_index: usize,
    /// Sum of this slide's caption durations
    pub duration_seconds: f64,
    /// Caption lines sorted by `line_index`
    pub captions: Vec<CaptionRow>,
}

/// One module's flattened slides plus its running duration total
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ModuleEntry {
    pub module_id: Uuid,
    pub title: String,
    /// Sum of this module's slide durations
    pub duration_seconds: f64,
    /// Slides in lesson → slide order
    pub slides: Vec<SlideEntry>,
}

/// Derived course timeline index
///
/// Built from a [`CourseSnapshot`]; see module docs for the ordering and
/// partition invariants.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CourseIndex {
    pub modules: Vec<ModuleEntry>,
    /// Grand total course duration in seconds
    pub total_seconds: f64,
}

impl CourseIndex {
    /// Build the index from a flat snapshot
    ///
    /// Returns `None` while the snapshot is incomplete (no modules,
    /// lessons, or slides yet) — the index is not meaningful until all
    /// three lists have content. Callers treat `None` as "not ready" and
    /// keep rendering a loading state.
    ///
    /// A module with no lessons, a lesson with no slides, or a slide with
    /// no captions is kept with duration zero; zero-width spans do not
    /// disturb the partition math and keep module indices aligned with
    /// the snapshot rows.
    pub fn build(snapshot: &CourseSnapshot) -> Option<CourseIndex> {
        if snapshot.modules.is_empty()
            || snapshot.lessons.is_empty()
            || snapshot.slides.is_empty()
        {
            return None;
        }

        let mut lessons_by_module: HashMap<Uuid, Vec<&crate::model::LessonRow>> = HashMap::new();
        for lesson in &snapshot.lessons {
            lessons_by_module
                .entry(lesson.module_id)
                .or_default()
                .push(lesson);
        }
        for group in lessons_by_module.values_mut() {
            group.sort_by_key(|l| l.sort_order);
        }

        let mut slides_by_lesson: HashMap<Uuid, Vec<&crate::model::SlideRow>> = HashMap::new();
        for slide in &snapshot.slides {
            slides_by_lesson
                .entry(slide.lesson_id)
                .or_default()
                .push(slide);
        }
        for group in slides_by_lesson.values_mut() {
            group.sort_by_key(|s| s.order_index);
        }

        let mut captions_by_slide: HashMap<Uuid, Vec<CaptionRow>> = HashMap::new();
        for caption in &snapshot.captions {
            captions_by_slide
                .entry(caption.slide_id)
                .or_default()
                .push(caption.clone());
        }
        for group in captions_by_slide.values_mut() {
            group.sort_by_key(|c| c.line_index);
        }

        let mut module_rows: Vec<&crate::model::ModuleRow> = snapshot.modules.iter().collect();
        module_rows.sort_by_key(|m| m.sort_order);

        let mut modules = Vec::with_capacity(module_rows.len());
        let mut total_seconds = 0.0;

        for module_row in module_rows {
            let mut entry = ModuleEntry {
                module_id: module_row.id,
                title: module_row.title.clone(),
                duration_seconds: 0.0,
                slides: Vec::new(),
            };

            if let Some(lessons) = lessons_by_module.get(&module_row.id) {
                for (lesson_index, lesson) in lessons.iter().enumerate() {
                    let Some(slides) = slides_by_lesson.get(&lesson.id) else {
                        continue;
                    };
                    for (slide_index, slide) in slides.iter().enumerate() {
                        let captions = captions_by_slide
                            .get(&slide.id)
                            .cloned()
                            .unwrap_or_default();
                        let duration_seconds = caption_seconds(&captions);
                        entry.duration_seconds += duration_seconds;
                        entry.slides.push(SlideEntry {
                            slide_id: slide.id,
                            lesson_index,
                            slide_index,
                            duration_seconds,
                            captions,
                        });
                    }
                }
            }

            total_seconds += entry.duration_seconds;
            modules.push(entry);
        }

        Some(CourseIndex {
            modules,
            total_seconds,
        })
    }

    /// Number of modules in the index
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Total number of flattened slides across all modules
    pub fn slide_count(&self) -> usize {
        self.modules.iter().map(|m| m.slides.len()).sum()
    }

    /// Elapsed seconds at the start of the given module
    ///
    /// Used by deep links ("open module N") to convert a module index into
    /// an absolute timeline position before the normal resolve path.
    pub fn module_start_seconds(&self, module_index: usize) -> Option<f64> {
        if module_index >= self.modules.len() {
            return None;
        }
        Some(
            self.modules[..module_index]
                .iter()
                .map(|m| m.duration_seconds)
                .sum(),
        )
    }
}
