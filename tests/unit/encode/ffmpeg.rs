use super::*;

fn frame(w: u32, h: u32, px: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: w,
        height: h,
        data: px.repeat((w * h) as usize),
    }
}

#[test]
fn flatten_premul_alpha_0_returns_bg() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_premul_alpha_255_is_identity() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn flatten_half_alpha_blends_with_background() {
    let src = vec![100u8, 0, 0, 128];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [0, 0, 254, 255]).unwrap();
    assert_eq!(dst, vec![100, 0, 127, 255]);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    let err = flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &[0u8; 4], [0; 4]).unwrap_err();
    assert!(matches!(err, StudioError::Validation(_)));
}

#[test]
fn cfr_clock_duplicates_slow_ticks_and_drops_fast_ones() {
    let mut clock = CfrClock::new(30);
    assert_eq!(clock.advance(0.0), 1);
    // Two ticks inside the same 33.3 ms slot.
    assert_eq!(clock.advance(16.0), 0);
    assert_eq!(clock.advance(34.0), 1);
    // A 100 ms stall covers three more slots.
    assert_eq!(clock.advance(134.0), 3);
    assert_eq!(clock.written(), 5);
}

#[test]
fn cfr_clock_tracks_elapsed_time_at_16ms_ticks() {
    let mut clock = CfrClock::new(30);
    let mut t = 0.0;
    while t <= 10_000.0 {
        clock.advance(t);
        t += 16.0;
    }
    // 10 s at 30 fps, give or take the slot holding the last tick.
    assert!((300..=301).contains(&clock.written()), "{}", clock.written());
}

#[test]
fn cfr_clock_clamps_negative_and_nan() {
    let mut clock = CfrClock::new(30);
    assert_eq!(clock.advance(-50.0), 1);
    assert_eq!(clock.advance(f64::NAN), 0);
}

#[test]
fn temp_file_guard_removes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.mp4");
    std::fs::write(&path, b"x").unwrap();
    drop(TempFileGuard(Some(path.clone())));
    assert!(!path.exists());
}

#[test]
fn ensure_parent_dir_creates_nested_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("a/b/out.mp4");
    ensure_parent_dir(&out).unwrap();
    assert!(dir.path().join("a/b").is_dir());
    ensure_parent_dir(Path::new("bare.mp4")).unwrap();
}

#[test]
fn begin_rejects_odd_dimensions() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4"));
    let err = sink
        .begin(SinkConfig {
            width: 721,
            height: 1280,
            fps: 30,
        })
        .unwrap_err();
    assert!(matches!(err, StudioError::Validation(_)));
}

#[test]
fn begin_refuses_to_overwrite_when_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("taken.mp4");
    std::fs::write(&out, b"keep").unwrap();
    let mut opts = FfmpegSinkOpts::new(&out);
    opts.overwrite = false;
    let mut sink = FfmpegSink::new(opts);
    let err = sink
        .begin(SinkConfig {
            width: 8,
            height: 8,
            fps: 30,
        })
        .unwrap_err();
    assert!(matches!(err, StudioError::Validation(_)));
    assert_eq!(std::fs::read(&out).unwrap(), b"keep");
}

#[test]
fn push_before_begin_is_a_playback_error() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4"));
    let err = sink.push_frame(0.0, &frame(2, 2, [0; 4])).unwrap_err();
    assert!(matches!(err, StudioError::Playback(_)));
    sink.abort();
    sink.abort();
}

#[test]
fn sink_config_checks_frame_size() {
    let cfg = SinkConfig {
        width: 4,
        height: 2,
        fps: 30,
    };
    cfg.check_frame(&frame(4, 2, [0; 4])).unwrap();
    let err = cfg.check_frame(&frame(2, 4, [0; 4])).unwrap_err();
    assert!(matches!(err, StudioError::Validation(_)));
}

#[test]
fn wrong_frame_size_is_rejected_when_ffmpeg_is_available() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(dir.path().join("sized.mp4")));
    sink.begin(SinkConfig {
        width: 16,
        height: 16,
        fps: 30,
    })
    .unwrap();
    let err = sink.push_frame(0.0, &frame(8, 8, [0; 4])).unwrap_err();
    assert!(matches!(err, StudioError::Validation(_)));
    sink.abort();
}

#[test]
fn encodes_short_clip_when_ffmpeg_is_available() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("clip.mp4");
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&out));
    sink.begin(SinkConfig {
        width: 16,
        height: 16,
        fps: 30,
    })
    .unwrap();
    for i in 0..10 {
        sink.push_frame(f64::from(i) * 50.0, &frame(16, 16, [255, 0, 0, 255]))
            .unwrap();
    }
    assert!(sink.frames_written() >= 14);
    sink.end(None).unwrap();
    assert!(out.is_file());
}

#[test]
fn abort_leaves_no_output_when_ffmpeg_is_available() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("aborted.mp4");
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&out));
    sink.begin(SinkConfig {
        width: 16,
        height: 16,
        fps: 30,
    })
    .unwrap();
    sink.push_frame(0.0, &frame(16, 16, [0, 0, 0, 255])).unwrap();
    sink.abort();
    assert!(!out.exists());
    assert!(sink.end(None).is_err());
}
