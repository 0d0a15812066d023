use super::*;

#[test]
fn total_duration_adds_intro_scan_and_card() {
    let tl = Timeline::from_script_secs(12.5).unwrap();
    assert_eq!(tl.total_ms(), 5500.0 + 12.5 * 1000.0 + 8000.0);
    assert_eq!(tl.card_start_ms(), 18_000.0);
    assert_eq!(tl.script_ms(), 12_500.0);
    assert!(Timeline::from_script_secs(-1.0).is_err());
    assert!(Timeline::from_script_secs(f64::NAN).is_err());
}

#[test]
fn boundaries_are_instantaneous() {
    let tl = Timeline::from_script_secs(30.0).unwrap();
    assert_eq!(tl.scene_at(0.0).scene, Scene::Intro);
    assert_eq!(tl.scene_at(3999.9).scene, Scene::Intro);
    assert_eq!(tl.scene_at(4000.0).scene, Scene::Scan);
    assert_eq!(tl.scene_at(4000.0).local_ms, 0.0);
    assert_eq!(tl.scene_at(5500.0).scene, Scene::Reveal);
    assert_eq!(tl.scene_at(7500.0).scene, Scene::Gallery);
    assert_eq!(tl.scene_at(tl.card_start_ms()).scene, Scene::Card);
    assert_eq!(tl.scene_at(tl.card_start_ms() + 250.0).local_ms, 250.0);
}

#[test]
fn scenes_partition_the_timeline_without_reentry() {
    for secs in [0.0, 0.5, 1.9, 2.0, 7.25, 42.0] {
        let tl = Timeline::from_script_secs(secs).unwrap();
        let mut covered = 0.0;
        for scene in Scene::ALL {
            let (start, end) = tl.window(scene);
            assert!(start <= end, "{scene:?} window inverted for {secs}s");
            assert_eq!(start, covered, "{scene:?} leaves a gap for {secs}s");
            covered = end;
        }
        assert_eq!(covered, tl.total_ms());

        let mut seen = Vec::<Scene>::new();
        let mut t = 0.0;
        while t < tl.total_ms() {
            let at = tl.scene_at(t);
            let (start, end) = tl.window(at.scene);
            assert!(start <= t && t < end, "t={t} outside {:?} window", at.scene);
            if seen.last() != Some(&at.scene) {
                assert!(!seen.contains(&at.scene), "{:?} re-entered", at.scene);
                seen.push(at.scene);
            }
            t += 16.0;
        }
    }
}

#[test]
fn short_script_shrinks_reveal_and_empties_gallery() {
    let tl = Timeline::from_script_secs(1.0).unwrap();
    assert_eq!(tl.card_start_ms(), 6500.0);
    assert_eq!(tl.window(Scene::Reveal), (5500.0, 6500.0));
    assert_eq!(tl.window(Scene::Gallery), (6500.0, 6500.0));
    assert_eq!(tl.scene_at(6600.0).scene, Scene::Card);
    assert!(tl.gallery_slot(6500.0, 3).is_none());
}

#[test]
fn out_of_range_elapsed_clamps() {
    let tl = Timeline::from_script_secs(10.0).unwrap();
    let before = tl.scene_at(-50.0);
    assert_eq!(before.scene, Scene::Intro);
    assert_eq!(before.local_ms, 0.0);

    let after = tl.scene_at(tl.total_ms() + 1000.0);
    assert_eq!(after.scene, Scene::Card);
    assert!(after.elapsed_ms < tl.total_ms());
    assert!(tl.is_finished(tl.total_ms()));
    assert!(!tl.is_finished(tl.total_ms() - 1.0));
    assert_eq!(tl.progress(tl.total_ms() * 2.0), 1.0);
}

#[test]
fn gallery_slots_divide_the_window_evenly() {
    let tl = Timeline::from_script_secs(14.0).unwrap();
    // Gallery spans [7500, 19500): 12000 ms across 4 poses.
    assert!(tl.gallery_slot(7499.0, 4).is_none());
    let first = tl.gallery_slot(7500.0, 4).unwrap();
    assert_eq!(first.index, 0);
    assert_eq!(first.progress, 0.0);

    let mid = tl.gallery_slot(7500.0 + 3000.0 + 1500.0, 4).unwrap();
    assert_eq!(mid.index, 1);
    assert!((mid.progress - 0.5).abs() < 1e-9);

    let last = tl.gallery_slot(19_499.0, 4).unwrap();
    assert_eq!(last.index, 3);
    assert!(tl.gallery_slot(19_500.0, 4).is_none());
    assert!(tl.gallery_slot(9000.0, 0).is_none());
}
