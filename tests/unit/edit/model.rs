use super::*;

#[test]
fn adjustments_clamp_to_domain() {
    let a = AdjustmentParams::new(-10.0, 250.0, f64::NAN, Preset::None);
    assert_eq!(a.brightness(), 0.0);
    assert_eq!(a.contrast(), 200.0);
    assert_eq!(a.saturation(), 100.0);
    assert!(AdjustmentParams::default().is_neutral());
}

#[test]
fn preset_toggles_back_to_none() {
    let mut a = AdjustmentParams::default();
    a.toggle_preset(Preset::Noir);
    assert_eq!(a.preset, Preset::Noir);
    assert!(!a.is_neutral());
    a.toggle_preset(Preset::Noir);
    assert_eq!(a.preset, Preset::None);
}

#[test]
fn rotation_normalizes_into_one_turn() {
    let mut g = GeometryParams::default();
    g.rotate_by(-90.0);
    assert_eq!(g.rotation(), 270.0);
    g.rotate_by(180.0);
    assert_eq!(g.rotation(), 90.0);
    g.rotate_by(270.0);
    assert_eq!(g.rotation(), 0.0);
    assert!(g.is_neutral());

    assert_eq!(GeometryParams::new(720.0 + 45.0, 1.0, 1.0).rotation(), 45.0);
}

#[test]
fn flips_are_involutions() {
    let mut g = GeometryParams::default();
    g.flip_horizontal();
    assert_eq!(g.scale_x(), -1.0);
    g.flip_horizontal();
    assert!(g.is_neutral());

    let g = GeometryParams::new(0.0, -3.0, 0.5);
    assert_eq!((g.scale_x(), g.scale_y()), (-1.0, 1.0));
}

#[test]
fn crop_region_detects_empty() {
    assert!(CropRegion::default().is_empty());
    assert!(CropRegion::new(10.0, 10.0, 0.0, 50.0).is_empty());
    assert!(!CropRegion::full().is_empty());
    assert_eq!(CropRegion::new(-5.0, 120.0, 50.0, 50.0).y, 100.0);
}

#[test]
fn blend_mode_ids_are_verbatim() {
    for mode in BlendMode::ALL {
        let json = serde_json::to_string(&mode).unwrap();
        assert_eq!(json, format!("\"{}\"", mode.id()));
        let back: BlendMode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mode);
    }
    assert_eq!(BlendMode::default().id(), "source-over");
}

#[test]
fn font_faces_serialize_by_display_name() {
    let json = serde_json::to_string(&FontFace::TimesNewRoman).unwrap();
    assert_eq!(json, "\"Times New Roman\"");
    let f: FontFace = serde_json::from_str("\"Comic Sans MS\"").unwrap();
    assert_eq!(f, FontFace::ComicSansMs);
    for face in FontFace::ALL {
        let json = serde_json::to_string(&face).unwrap();
        assert_eq!(json, format!("\"{}\"", face.family_name()));
    }
}

#[test]
fn presets_serialize_lowercase() {
    for preset in Preset::ALL {
        let json = serde_json::to_string(&preset).unwrap();
        assert_eq!(json, format!("\"{}\"", preset.name()));
    }
}

#[test]
fn overlay_opacity_is_clamped() {
    let src = OverlaySource::Raster(RasterBuffer::solid(1, 1, [0, 0, 0, 255]).unwrap());
    let o = OverlayImage::new("a", src).with_opacity(3.0);
    assert_eq!(o.opacity, 1.0);
    let o = o.with_opacity(-1.0);
    assert_eq!(o.opacity, 0.0);
}

#[test]
fn deserialized_adjustments_are_clamped() {
    let a: AdjustmentParams =
        serde_json::from_str(r#"{"brightness":500,"contrast":-20,"preset":"sepia"}"#).unwrap();
    assert_eq!(a.brightness(), 200.0);
    assert_eq!(a.contrast(), 0.0);
    assert_eq!(a.saturation(), NEUTRAL_PERCENT);
    assert_eq!(a.preset, Preset::Sepia);
}

#[test]
fn deserialized_geometry_is_normalized() {
    let g: GeometryParams =
        serde_json::from_str(r#"{"rotation":720,"scale_x":5,"scale_y":-3}"#).unwrap();
    assert_eq!(g.rotation(), 0.0);
    assert_eq!(g.scale_x(), 1.0);
    assert_eq!(g.scale_y(), -1.0);

    let g: GeometryParams = serde_json::from_str(r#"{"rotation":-90}"#).unwrap();
    assert_eq!(g.rotation(), 270.0);
    assert!(g.is_quarter_turn());
}

#[test]
fn params_survive_a_json_round_trip() {
    let mut g = GeometryParams::default();
    g.rotate_by(90.0);
    g.flip_vertical();
    let back: GeometryParams = serde_json::from_str(&serde_json::to_string(&g).unwrap()).unwrap();
    assert_eq!(back, g);

    let a = AdjustmentParams::new(40.0, 150.0, 0.0, Preset::Lomo);
    let back: AdjustmentParams =
        serde_json::from_str(&serde_json::to_string(&a).unwrap()).unwrap();
    assert_eq!(back, a);
}
