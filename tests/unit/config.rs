use super::*;

#[test]
fn defaults_match_recording_contract() {
    let opts = StudioOpts::default();
    assert_eq!(opts.fps, 30);
    assert_eq!(opts.video_bitrate_kbps, 8_000);
    assert_eq!(opts.canvas, Canvas::STAGE);
    opts.validate().unwrap();
}

#[test]
fn invalid_values_are_rejected() {
    let mut opts = StudioOpts {
        fps: 0,
        ..StudioOpts::default()
    };
    assert!(matches!(opts.validate(), Err(StudioError::Validation(_))));
    opts.fps = 30;
    opts.tick_ms = f64::NAN;
    assert!(matches!(opts.validate(), Err(StudioError::Validation(_))));
}

#[test]
fn partial_json_fills_defaults() {
    let opts: StudioOpts = serde_json::from_str(r#"{ "fps": 24, "overwrite": false }"#).unwrap();
    assert_eq!(opts.fps, 24);
    assert!(!opts.overwrite);
    assert_eq!(opts.video_bitrate_kbps, DEFAULT_VIDEO_BITRATE_KBPS);
    assert!(serde_json::from_str::<StudioOpts>(r#"{ "fsp": 24 }"#).is_err());
}

#[test]
fn missing_configured_font_is_a_setup_error() {
    let opts = StudioOpts {
        font_path: Some(PathBuf::from("/definitely/not/here.ttf")),
        ..StudioOpts::default()
    };
    assert!(matches!(opts.load_font(), Err(StudioError::Setup(_))));
}

#[test]
fn unconfigured_font_is_discovered_on_the_system() {
    let font = StudioOpts::default().load_font().unwrap();
    assert!(!font.is_empty());
}

#[test]
fn configured_font_bytes_are_used_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("face.ttf");
    std::fs::write(&path, b"font").unwrap();
    let opts = StudioOpts {
        font_path: Some(path),
        ..StudioOpts::default()
    };
    assert_eq!(opts.surface_opts().unwrap().font_bytes.as_slice(), b"font");
}

#[test]
fn ffmpeg_opts_carry_studio_settings() {
    let opts = StudioOpts {
        overwrite: false,
        video_bitrate_kbps: 4_000,
        bg_rgba: [1, 2, 3, 255],
        ..StudioOpts::default()
    };
    let ff = opts.ffmpeg_opts("out/x.mp4");
    assert_eq!(ff.out_path, PathBuf::from("out/x.mp4"));
    assert!(!ff.overwrite);
    assert_eq!(ff.video_bitrate_kbps, 4_000);
    assert_eq!(ff.bg_rgba, [1, 2, 3, 255]);
}
