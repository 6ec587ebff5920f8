//! Integration tests for the player layer
//!
//! Drives a `CoursePlayer` the way the UI adapters do: scrub gestures,
//! entitlement-clamped seeks, ambient media ticks, hover previews, and
//! volume fades, asserting on the broadcast event stream and the shared
//! state that consumers render from.

use std::time::Duration;

use tokio::time::timeout;
use uuid::Uuid;

use dcp_common::config::PlayerTuning;
use dcp_common::events::PlayerEvent;
use dcp_common::model::{CaptionRow, CourseSnapshot, LessonRow, ModuleRow, SlideRow, VoiceId};
use dcp_player::CoursePlayer;

fn caption(slide_id: Uuid, line_index: i64, text: &str, seconds: f64) -> CaptionRow {
    CaptionRow {
        id: Uuid::new_v4(),
        slide_id,
        line_index,
        text: text.to_string(),
        seconds: Some(seconds),
        audio_url_matthew: Some(format!("audio/matthew/{}.mp3", line_index)),
        audio_url_joanna: None,
        audio_url_lupe: None,
    }
}

/// Module A: one lesson, slides of 10s and 5s. Module B: one lesson, one
/// 20s slide. Total 35s.
fn snapshot() -> CourseSnapshot {
    let module_a = Uuid::new_v4();
    let module_b = Uuid::new_v4();
    let lesson_a = Uuid::new_v4();
    let lesson_b = Uuid::new_v4();
    let slide_a0 = Uuid::new_v4();
    let slide_a1 = Uuid::new_v4();
    let slide_b0 = Uuid::new_v4();

    CourseSnapshot {
        modules: vec![
            ModuleRow {
                id: module_a,
                title: "Signs and Signals".to_string(),
                sort_order: 1,
            },
            ModuleRow {
                id: module_b,
                title: "Right of Way".to_string(),
                sort_order: 2,
            },
        ],
        lessons: vec![
            LessonRow {
                id: lesson_a,
                module_id: module_a,
                title: "Regulatory Signs".to_string(),
                sort_order: 1,
            },
            LessonRow {
                id: lesson_b,
                module_id: module_b,
                title: "Intersections".to_string(),
                sort_order: 1,
            },
        ],
        slides: vec![
            SlideRow {
                id: slide_a0,
                lesson_id: lesson_a,
                order_index: 0,
                image_path: "a0.png".to_string(),
            },
            SlideRow {
                id: slide_a1,
                lesson_id: lesson_a,
                order_index: 1,
                image_path: "a1.png".to_string(),
            },
            SlideRow {
                id: slide_b0,
                lesson_id: lesson_b,
                order_index: 0,
                image_path: "b0.png".to_string(),
            },
        ],
        captions: vec![
            caption(slide_a0, 0, "Check your mirrors.", 10.0),
            caption(slide_a1, 0, "Signal early.", 5.0),
            caption(slide_b0, 0, "Yield to pedestrians, always.", 20.0),
        ],
    }
}

fn fast_tuning() -> PlayerTuning {
    PlayerTuning {
        hover_debounce_ms: 30,
        fade_seconds: 0.05,
        fade_tick_ms: 5,
        ..PlayerTuning::default()
    }
}

async fn loaded_player() -> CoursePlayer {
    let mut player = CoursePlayer::new(fast_tuning());
    assert!(player.load_course(snapshot()).await);
    player
}

#[tokio::test]
async fn scrub_session_applies_only_the_final_position() {
    let mut player = loaded_player().await;
    let state = player.shared_state();
    let mut rx = state.subscribe_events();

    player.begin_scrub().await;
    for seconds in [2.1, 2.4, 2.9, 3.0] {
        player.scrub_to(seconds);
    }
    let outcome = player.end_scrub().await.unwrap();
    assert!((outcome.seconds - 3.0).abs() < 1e-9);

    // Event order: ScrubStarted, ScrubCommitted(3.0), SeekApplied — and
    // exactly one SeekApplied for the whole gesture.
    match rx.recv().await.unwrap() {
        PlayerEvent::ScrubStarted { .. } => {}
        other => panic!("expected ScrubStarted, got {:?}", other),
    }
    match rx.recv().await.unwrap() {
        PlayerEvent::ScrubCommitted { seconds, .. } => assert!((seconds - 3.0).abs() < 1e-9),
        other => panic!("expected ScrubCommitted, got {:?}", other),
    }
    match rx.recv().await.unwrap() {
        PlayerEvent::SeekApplied { target, .. } => {
            assert_eq!(target.module_index, 0);
            assert_eq!(target.slide_index, 0);
        }
        other => panic!("expected SeekApplied, got {:?}", other),
    }
    assert!(
        timeout(Duration::from_millis(50), rx.recv()).await.is_err(),
        "intermediate scrub positions must not produce further applies"
    );

    assert!((state.position_seconds().await - 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn click_without_drag_leaves_position_untouched() {
    let mut player = loaded_player().await;
    player.request_seek(7.0).await.unwrap();
    player.confirm_media_positioned();

    player.begin_scrub().await;
    assert!(player.end_scrub().await.is_none());

    let state = player.shared_state();
    assert!((state.position_seconds().await - 7.0).abs() < 1e-9);
}

#[tokio::test]
async fn locked_module_snaps_back_to_boundary() {
    let mut player = loaded_player().await;
    player.set_entitlement(f64::INFINITY, 0);
    let state = player.shared_state();
    let mut rx = state.subscribe_events();

    // 20s is inside the locked module B
    let outcome = player.request_seek(20.0).await.unwrap();
    assert_eq!(outcome.target.module_index, 0);
    assert_eq!(outcome.clamped_to_module, Some(0));
    assert!((outcome.seconds - 15.0).abs() < 1e-9);

    match rx.recv().await.unwrap() {
        PlayerEvent::SeekClamped {
            requested_module,
            clamped_module,
            ..
        } => {
            assert_eq!(requested_module, 1);
            assert_eq!(clamped_module, 0);
        }
        other => panic!("expected SeekClamped, got {:?}", other),
    }
}

#[tokio::test]
async fn ambient_ticks_respect_the_in_flight_guard() {
    let mut player = loaded_player().await;

    player.request_seek(12.0).await.unwrap();

    // Committed but unconfirmed: the ambient tick loses
    assert!(!player.on_media_tick(0.5, true).await);
    let state = player.shared_state();
    assert!((state.position_seconds().await - 12.0).abs() < 1e-9);

    // Confirmed: ambient ticks flow again
    player.confirm_media_positioned();
    assert!(player.on_media_tick(12.4, true).await);
    assert!((state.position_seconds().await - 12.4).abs() < 1e-9);
}

#[tokio::test]
async fn ambient_ticks_are_suppressed_while_scrubbing() {
    let mut player = loaded_player().await;
    player.request_seek(3.0).await.unwrap();
    player.confirm_media_positioned();

    player.begin_scrub().await;
    player.scrub_to(9.0);
    assert!(!player.on_media_tick(3.5, true).await);

    let state = player.shared_state();
    assert!((state.position_seconds().await - 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn deep_link_module_seek_lands_on_module_start() {
    let mut player = loaded_player().await;

    let outcome = player.seek_to_module(1).await.unwrap();
    assert_eq!(outcome.target.module_index, 1);
    assert_eq!(outcome.target.caption_index, 0);
    assert_eq!(outcome.target.caption_offset_seconds, 0.0);
    assert!((outcome.seconds - 15.0).abs() < 1e-9);
}

#[tokio::test]
async fn hover_preview_debounces_to_the_latest_position() {
    let mut player = loaded_player().await;
    let state = player.shared_state();
    let mut rx = state.subscribe_events();

    player.schedule_hover_preview(5.0);
    player.schedule_hover_preview(12.0);

    let event = timeout(Duration::from_millis(500), rx.recv())
        .await
        .expect("hover preview never arrived")
        .unwrap();
    match event {
        PlayerEvent::HoverPreviewReady { seconds, target, .. } => {
            // Only the latest hover survives the debounce
            assert!((seconds - 12.0).abs() < 1e-9);
            assert_eq!(target.module_index, 0);
            assert_eq!(target.slide_index, 1);
        }
        other => panic!("expected HoverPreviewReady, got {:?}", other),
    }
    assert!(timeout(Duration::from_millis(100), rx.recv()).await.is_err());
}

#[tokio::test]
async fn unmount_cancels_pending_hover_preview() {
    let mut player = loaded_player().await;
    let state = player.shared_state();
    let mut rx = state.subscribe_events();

    player.schedule_hover_preview(5.0);
    player.unmount();

    assert!(
        timeout(Duration::from_millis(150), rx.recv()).await.is_err(),
        "cancelled hover preview must not fire"
    );
}

#[tokio::test]
async fn fade_requests_supersede_each_other() {
    let mut player = loaded_player().await;
    let state = player.shared_state();

    // Fade up immediately replaced by a fade down; only the second wins
    player.fade_to_volume(1.0);
    player.fade_to_volume(0.2);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!((state.volume().await - 0.2).abs() < 1e-9);
}

#[tokio::test]
async fn active_caption_follows_the_seek_target() {
    let mut player = loaded_player().await;

    player.request_seek(12.0).await.unwrap();
    let caption = player.active_caption().await.unwrap();
    assert_eq!(caption.text, "Signal early.");

    let audio = player.active_caption_audio(VoiceId::Matthew).await.unwrap();
    assert_eq!(audio, "audio/matthew/0.mp3");
    assert!(player.active_caption_audio(VoiceId::Lupe).await.is_none());

    // Karaoke track for the landed caption highlights from word zero
    let track = player.karaoke_track(&caption);
    assert_eq!(track.display_words.len(), 2);
    assert_eq!(player.karaoke_index(&track, 0.0), Some(0));
}

#[tokio::test]
async fn replacing_the_snapshot_rebuilds_the_index() {
    let mut player = loaded_player().await;
    let state = player.shared_state();
    let mut rx = state.subscribe_events();

    let mut changed = snapshot();
    changed.captions[0].seconds = Some(30.0); // A0: 10s -> 30s

    assert!(player.load_course(changed).await);
    match rx.recv().await.unwrap() {
        PlayerEvent::CourseIndexRebuilt { total_seconds, .. } => {
            assert!((total_seconds - 55.0).abs() < 1e-9);
        }
        other => panic!("expected CourseIndexRebuilt, got {:?}", other),
    }

    let index = state.course_index().await.unwrap();
    assert!((index.total_seconds - 55.0).abs() < 1e-9);
}
