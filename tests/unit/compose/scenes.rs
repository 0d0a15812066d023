use super::*;
use crate::render::recording::{Op, RecordingSurface};

pub(crate) fn fixture(script: &str, script_ms: f64, poses: usize) -> RenderResources {
    let mut creature = image::RgbaImage::from_pixel(8, 16, image::Rgba([255, 255, 255, 255]));
    for y in 4..12 {
        for x in 2..6 {
            creature.put_pixel(x, y, image::Rgba([30, 160, 60, 255]));
        }
    }
    let gallery = (0..poses).map(|_| creature.clone()).collect();
    RenderResources::from_images("Bulbasaur", script, creature, gallery, script_ms).unwrap()
}

fn full(s: &RecordingSurface) -> Rect {
    Rect::new(0.0, 0.0, s.canvas.w(), s.canvas.h())
}

#[test]
fn bounce_and_card_scale_curves() {
    assert_eq!(bounce(0.0), 0.0);
    assert!((bounce(300.0 * std::f64::consts::FRAC_PI_2) - 20.0).abs() < 1e-9);
    assert_eq!(card_scale(0.0), 2.5);
    assert!((card_scale(200.0) - 1.85).abs() < 1e-12);
    assert_eq!(card_scale(400.0), 1.2);
    assert_eq!(card_scale(9_000.0), 1.2);
}

#[test]
fn intro_draws_sunburst_silhouette_and_question() {
    let res = fixture("", 1000.0, 0);
    let mut s = RecordingSurface::stage();
    let t = 300.0 * std::f64::consts::FRAC_PI_2;
    draw_intro(&mut s, t, &res);

    assert_eq!(s.first_fill_rect(), Some((full(&s), INTRO_BASE)));
    let images = s.images();
    assert_eq!(images.len(), 1);
    let (id, dest, _) = images[0];
    assert_eq!(id, res.silhouette.id());
    // 1:2 image contained in (50, 280, 670, 880): height-limited.
    assert!((dest.y0 - 280.0).abs() < 1e-9);
    assert!((dest.height() - 600.0).abs() < 1e-9);
    assert!((dest.width() - 300.0).abs() < 1e-9);
    assert_eq!(s.filled_texts(), vec![INTRO_TITLE, INTRO_SUBTITLE]);
    assert!(s.balanced());
}

#[test]
fn scan_opens_with_a_white_flash() {
    let res = fixture("", 1000.0, 0);
    let mut s = RecordingSurface::stage();
    draw_scan(&mut s, INTRO_END_MS + 100.0, &res);
    assert_eq!(s.ops, vec![Op::FillRect(full(&s), Rgba8::WHITE)]);
}

#[test]
fn hud_appears_after_delay_and_label_blinks() {
    let res = fixture("", 1000.0, 0);

    let mut s = RecordingSurface::stage();
    draw_scan(&mut s, INTRO_END_MS + 300.0, &res);
    assert_eq!(s.first_fill_rect(), Some((full(&s), SCAN_BASE)));
    assert_eq!(s.images()[0].0, res.creature.id());
    assert!(!s.ops.iter().any(|op| matches!(op, Op::Clip(_))));

    let mut s = RecordingSurface::stage();
    draw_scan(&mut s, INTRO_END_MS + 500.0, &res);
    assert!(s.ops.iter().any(|op| matches!(op, Op::Clip(_))));
    assert_eq!(s.filled_texts(), vec![crate::compose::hud::STATUS_LABEL]);

    let mut s = RecordingSurface::stage();
    draw_scan(&mut s, INTRO_END_MS + 700.0, &res);
    assert!(s.filled_texts().is_empty());
    assert!(s.balanced());
}

#[test]
fn reveal_adds_name_header_and_captions() {
    let res = fixture("uma duas tres", 3000.0, 0);
    let mut s = RecordingSurface::stage();
    draw_reveal(&mut s, SCRIPT_START_MS + 100.0, &res);

    let texts = s.filled_texts();
    assert!(texts.contains(&REVEAL_LEAD));
    assert!(texts.contains(&"BULBASAUR"));
    for word in ["uma", "duas", "tres"] {
        assert!(texts.contains(&word), "missing caption word {word}");
    }
    assert!(s.balanced());
}

#[test]
fn gallery_shows_backdrop_then_zoomed_pose() {
    let res = fixture("", 6_000.0, 2);
    let tl = res.timeline().unwrap();
    let (start, end) = tl.window(crate::timeline::Scene::Gallery);
    let slot = (end - start) / 2.0;
    let t = start + slot * 1.5;

    let mut s = RecordingSurface::stage();
    draw_gallery(&mut s, t, &tl, &res);
    assert_eq!(s.first_fill_rect(), Some((full(&s), GALLERY_BG)));

    let images = s.images();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0].0, res.gallery[1].backdrop.id());
    assert_eq!(images[0].2, Affine::IDENTITY);
    assert_eq!(images[1].0, res.gallery[1].pose.id());

    // Halfway through the slot the pose is scaled 1.05 about the canvas center.
    let center = Point::new(360.0, 640.0);
    let mapped = images[1].2 * center;
    assert!((mapped - center).hypot() < 1e-9);
    let coeffs = images[1].2.as_coeffs();
    assert!((coeffs[0] - 1.05).abs() < 1e-9);

    assert!(s.filled_texts().contains(&"Bulbasaur"));
    assert!(s.balanced());
}

#[test]
fn card_zooms_then_shows_calls_to_action() {
    let res = fixture("", 1000.0, 0);

    let mut s = RecordingSurface::stage();
    draw_card(&mut s, 0.0, &res);
    let (id, dest, tr) = s.images()[0];
    assert_eq!(id, res.card.id());
    assert_eq!(dest, Rect::new(-175.0, -245.0, 175.0, 245.0));
    assert_eq!(tr.as_coeffs(), [2.5, 0.0, 0.0, 2.5, 360.0, 640.0]);
    assert!(s.filled_texts().is_empty());

    let mut s = RecordingSurface::stage();
    draw_card(&mut s, 1500.0, &res);
    assert_eq!(s.filled_texts(), vec![CARD_CTA]);

    let mut s = RecordingSurface::stage();
    draw_card(&mut s, 3000.0, &res);
    assert_eq!(
        s.filled_texts(),
        vec![CARD_CTA, CARD_QUESTION_1, CARD_QUESTION_2]
    );
    assert!(s.balanced());
}
