use super::*;
use crate::assets::decode::encode_png;
use crate::assets::fonts::FontBook;
use crate::config::EditorConfig;
use crate::edit::model::Preset;
use crate::foundation::core::RasterBuffer;
use crate::foundation::error::EditorError;
use crate::script::model::{AdjustStep, CropStep, OverlaySpec};

fn session_with(raster: RasterBuffer) -> EditorSession {
    let mut s = EditorSession::with_fonts(&EditorConfig::default(), FontBook::empty());
    s.load_raster(raster);
    s
}

fn red(w: u32, h: u32) -> RasterBuffer {
    RasterBuffer::solid(w, h, [255, 0, 0, 255]).unwrap()
}

#[test]
fn family_steps_commit_once() {
    let mut s = session_with(red(4, 2));
    let script = EditScript {
        steps: vec![
            EditStep::Adjust(AdjustStep {
                brightness: Some(50.0),
                ..AdjustStep::default()
            }),
            EditStep::Rotate { degrees: 90.0 },
            EditStep::Flip {
                axis: FlipAxis::Horizontal,
            },
        ],
    };
    let report = replay(&mut s, &script, Path::new(".")).unwrap();
    assert_eq!(report.steps, 3);
    assert_eq!(report.end_revision, report.start_revision + 1);
    assert_eq!(s.active_tool(), None);
    let out = s.current().unwrap();
    assert_eq!((out.width(), out.height()), (2, 4));
    assert_eq!(out.pixel(1, 3), Some([128, 0, 0, 255]));
}

#[test]
fn crop_step_commits_family_first() {
    let mut s = session_with(red(200, 200));
    let script = EditScript {
        steps: vec![
            EditStep::Preset {
                name: Preset::Invert,
            },
            EditStep::Crop(CropStep {
                x: 25.0,
                y: 25.0,
                width: 50.0,
                height: 50.0,
            }),
        ],
    };
    replay(&mut s, &script, Path::new(".")).unwrap();
    let out = s.current().unwrap();
    assert_eq!((out.width(), out.height()), (100, 100));
    assert_eq!(out.pixel(0, 0), Some([0, 255, 255, 255]));
    assert_eq!(s.history().undo_depth(), 2);
}

#[test]
fn undo_and_redo_steps_move_history() {
    let original = red(8, 8);
    let mut s = session_with(original.clone());
    let script = EditScript {
        steps: vec![
            EditStep::Preset {
                name: Preset::Grayscale,
            },
            EditStep::Undo,
            EditStep::Redo,
            EditStep::Undo,
        ],
    };
    replay(&mut s, &script, Path::new(".")).unwrap();
    assert_eq!(s.current(), Some(&original));
    assert!(s.can_redo());
}

#[test]
fn layer_steps_read_overlays_relative_to_base_dir() {
    let dir = std::path::PathBuf::from("target").join("script_run_layers");
    std::fs::create_dir_all(&dir).unwrap();
    let blue = RasterBuffer::solid(2, 2, [0, 0, 255, 255]).unwrap();
    std::fs::write(dir.join("blue.png"), encode_png(&blue).unwrap()).unwrap();

    let mut s = session_with(red(10, 10));
    let script = EditScript {
        steps: vec![EditStep::Layer(LayerStep {
            overlays: vec![OverlaySpec {
                id: "blue".to_string(),
                source: "blue.png".into(),
                opacity: None,
                blend_mode: None,
                x: Some(0.0),
                y: Some(0.0),
                width: Some(50.0),
                height: Some(100.0),
            }],
        })],
    };
    let report = replay(&mut s, &script, &dir).unwrap();
    assert!(report.warnings.is_empty());
    let out = s.current().unwrap();
    assert_eq!(out.pixel(2, 5), Some([0, 0, 255, 255]));
    assert_eq!(out.pixel(8, 5), Some([255, 0, 0, 255]));
}

#[test]
fn missing_overlay_files_fail_the_replay() {
    let mut s = session_with(red(4, 4));
    let script = EditScript {
        steps: vec![EditStep::Layer(LayerStep {
            overlays: vec![OverlaySpec {
                id: "ghost".to_string(),
                source: "does/not/exist.png".into(),
                opacity: None,
                blend_mode: None,
                x: None,
                y: None,
                width: None,
                height: None,
            }],
        })],
    };
    let err = replay(&mut s, &script, Path::new(".")).unwrap_err();
    assert!(matches!(err, EditorError::Other(_)));
    assert!(!s.can_undo());
}

#[test]
fn invalid_scripts_touch_nothing() {
    let mut s = session_with(red(4, 4));
    let script = EditScript {
        steps: vec![
            EditStep::Preset {
                name: Preset::Sepia,
            },
            EditStep::Rotate { degrees: f64::NAN },
        ],
    };
    assert!(matches!(
        replay(&mut s, &script, Path::new(".")),
        Err(EditorError::Validation(_))
    ));
    assert!(!s.can_undo());
}

#[test]
fn replay_without_an_image_fails() {
    let mut s = EditorSession::with_fonts(&EditorConfig::default(), FontBook::empty());
    let script = EditScript {
        steps: vec![EditStep::Rotate { degrees: 90.0 }],
    };
    assert!(matches!(
        replay(&mut s, &script, Path::new(".")),
        Err(EditorError::NoImage)
    ));
}
