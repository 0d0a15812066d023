use super::*;

fn simulate(secs: f64, poses: usize, step: f64) -> Vec<(f64, Cue)> {
    let tl = Timeline::from_script_secs(secs).unwrap();
    let mut latches = CueLatches::new();
    let mut fired = Vec::new();
    let mut t = 0.0;
    while t < tl.total_ms() {
        for cue in latches.poll(t, &tl, poses) {
            fired.push((t, cue));
        }
        t += step;
    }
    fired
}

fn count(fired: &[(f64, Cue)], pred: impl Fn(&Cue) -> bool) -> usize {
    fired.iter().filter(|(_, c)| pred(c)).count()
}

#[test]
fn one_shots_fire_exactly_once_at_16ms_steps() {
    let fired = simulate(14.0, 4, 16.0);

    assert_eq!(count(&fired, |c| *c == Cue::RevealPing), 1);
    assert_eq!(count(&fired, |c| *c == Cue::CardSwish), 1);
    for track in [Track::Intro, Track::Script, Track::Outro] {
        assert_eq!(count(&fired, |c| *c == Cue::StartTrack(track)), 1, "{track:?}");
    }

    let whooshes: Vec<(f64, usize)> = fired
        .iter()
        .filter_map(|(t, c)| match c {
            Cue::GalleryWhoosh { index } => Some((*t, *index)),
            _ => None,
        })
        .collect();
    assert_eq!(
        whooshes.iter().map(|(_, i)| *i).collect::<Vec<_>>(),
        vec![0, 1, 2, 3]
    );
    // Gallery runs 7500..19500 split into four 3000 ms slots.
    for (t, i) in whooshes {
        let slot_start = 7500.0 + 3000.0 * i as f64;
        assert!(t >= slot_start && t < slot_start + 16.0, "whoosh {i} at {t}");
    }

    let ping_at = fired.iter().find(|(_, c)| *c == Cue::RevealPing).unwrap().0;
    assert_eq!(ping_at, 5504.0);
    let swish_at = fired.iter().find(|(_, c)| *c == Cue::CardSwish).unwrap().0;
    assert_eq!(swish_at, 19504.0);
}

#[test]
fn scan_beeps_repeat_only_inside_the_scan_window() {
    let fired = simulate(14.0, 4, 16.0);
    let beeps: Vec<f64> = fired
        .iter()
        .filter(|(_, c)| matches!(c, Cue::ScanBeep { .. }))
        .map(|(t, _)| *t)
        .collect();

    assert!(!beeps.is_empty());
    assert_eq!(beeps[0], 4000.0);
    assert!(beeps.iter().all(|&t| (4000.0..5500.0).contains(&t)));
    for pair in beeps.windows(2) {
        let gap = pair[1] - pair[0];
        assert!(gap > 180.0 && gap <= 200.0, "gap {gap}");
    }
}

#[test]
fn late_ticks_still_fire_each_one_shot_once() {
    let tl = Timeline::from_script_secs(10.0).unwrap();
    let mut latches = CueLatches::new();
    latches.poll(0.0, &tl, 3);
    let jumped = latches.poll(6_000.0, &tl, 3);
    assert!(jumped.contains(&Cue::RevealPing));
    assert!(jumped.contains(&Cue::StartTrack(Track::Script)));
    // The scan window was skipped entirely; no late beep.
    assert!(!jumped.iter().any(|c| matches!(c, Cue::ScanBeep { .. })));

    let again = latches.poll(6_016.0, &tl, 3);
    assert!(again.is_empty());

    let end = latches.poll(tl.total_ms() + 100.0, &tl, 3);
    assert!(end.contains(&Cue::CardSwish));
    assert!(end.contains(&Cue::StartTrack(Track::Outro)));
    assert!(latches.poll(tl.total_ms() + 200.0, &tl, 3).is_empty());
}

#[test]
fn short_script_has_no_gallery_whoosh() {
    let fired = simulate(1.0, 3, 16.0);
    assert_eq!(count(&fired, |c| matches!(c, Cue::GalleryWhoosh { .. })), 0);
    assert_eq!(count(&fired, |c| *c == Cue::CardSwish), 1);
}

#[test]
fn scan_jitter_is_deterministic_and_in_range() {
    for t in [4000.0, 4192.0, 4384.5, 5499.0] {
        let hz = scan_start_hz(t);
        assert_eq!(hz, scan_start_hz(t));
        assert!((800.0..1200.0).contains(&hz));
    }
    assert_ne!(scan_start_hz(4000.0), scan_start_hz(4192.0));
}

#[test]
fn cue_tones_map_to_presets() {
    assert_eq!(Cue::RevealPing.tone(), Some(ToneSpec::PING));
    assert_eq!(Cue::GalleryWhoosh { index: 2 }.tone(), Some(ToneSpec::WHOOSH));
    assert_eq!(Cue::CardSwish.tone(), Some(ToneSpec::SWISH));
    assert_eq!(
        Cue::ScanBeep { start_hz: 900.0 }.tone(),
        Some(ToneSpec::scan(900.0))
    );
    assert_eq!(Cue::StartTrack(Track::Intro).tone(), None);
}
