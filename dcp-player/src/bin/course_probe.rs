//! Course Snapshot Probe Utility
//!
//! Loads a JSON course snapshot, builds the timeline index, and prints the
//! module/duration table. Optionally resolves a timeline position to its
//! hierarchical coordinates, with karaoke pacing and voice-audio lookup
//! for the landed caption.
//!
//! **Usage:**
//! ```bash
//! course-probe snapshot.json [--at <seconds>] [--max-allowed <seconds>] [--voice <name>]
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use dcp_common::config::PlayerTuning;
use dcp_common::human_time::format_clock;
use dcp_common::karaoke::KaraokeTrack;
use dcp_common::model::{CourseSnapshot, VoiceId};
use dcp_common::CourseIndex;

/// Course snapshot probe utility
#[derive(Parser, Debug)]
#[clap(name = "course-probe")]
#[clap(about = "Inspect a course snapshot's timeline index and seek resolution")]
struct Args {
    /// Path to a JSON course snapshot (modules, lessons, slides, captions)
    snapshot: PathBuf,

    /// Resolve this timeline position (seconds)
    #[clap(long)]
    at: Option<f64>,

    /// Entitlement cap in seconds (default: unlimited)
    #[clap(long)]
    max_allowed: Option<f64>,

    /// Look up the landed caption's audio URL for this voice
    #[clap(long)]
    voice: Option<String>,

    /// Tuning file overriding the standard config locations
    #[clap(long, value_name = "FILE")]
    tuning: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let tuning = PlayerTuning::load(args.tuning.as_deref())?;

    let content = std::fs::read_to_string(&args.snapshot)
        .with_context(|| format!("cannot read snapshot {}", args.snapshot.display()))?;
    let snapshot: CourseSnapshot =
        serde_json::from_str(&content).context("snapshot is not valid course JSON")?;

    info!(
        modules = snapshot.modules.len(),
        lessons = snapshot.lessons.len(),
        slides = snapshot.slides.len(),
        captions = snapshot.captions.len(),
        "snapshot loaded"
    );

    let index = CourseIndex::build(&snapshot)
        .context("snapshot incomplete: modules, lessons, and slides are all required")?;

    println!("idx  module                                    duration  slides");
    for (i, module) in index.modules.iter().enumerate() {
        println!(
            "{:>3}  {:<40} {:>8}  {:>6}",
            i,
            module.title,
            format_clock(module.duration_seconds),
            module.slides.len()
        );
    }
    println!(
        "\ntotal {} across {} slides",
        format_clock(index.total_seconds),
        index.slide_count()
    );

    if let Some(at) = args.at {
        let max_allowed = args.max_allowed.unwrap_or(f64::INFINITY);
        let Some(target) = index.resolve(at, max_allowed) else {
            println!("\n{at}s does not resolve (empty chain in the index)");
            return Ok(());
        };

        println!(
            "\n{}s -> module {} / lesson {} / slide {} / caption {} (+{:.3}s)",
            at,
            target.module_index,
            target.lesson_index,
            target.slide_index,
            target.caption_index,
            target.caption_offset_seconds
        );

        let module = &index.modules[target.module_index];
        let slide = module
            .slides
            .iter()
            .find(|s| s.slide_id == target.slide_id)
            .context("resolved slide missing from index")?;
        let caption = slide
            .captions
            .get(target.caption_index)
            .context("resolved caption missing from slide")?;

        println!("caption text: {:?}", caption.text);
        let track = KaraokeTrack::new(
            &caption.text,
            caption.duration_seconds(),
            tuning.karaoke_speed,
        );
        println!(
            "karaoke: {} display words over {:.3}s",
            track.display_words.len(),
            caption.duration_seconds() * tuning.karaoke_speed
        );

        if let Some(voice) = &args.voice {
            let voice: VoiceId = voice.parse()?;
            match voice.audio_url(caption) {
                Some(url) => println!("{} audio: {}", voice, url),
                None => println!("{} audio: not generated", voice),
            }
        }
    }

    Ok(())
}
