use super::*;

#[test]
fn contain_wide_image_letterboxes_vertically() {
    let r = contain_rect(2.0, Rect::new(50.0, 300.0, 670.0, 900.0));
    assert_eq!(r.x0, 50.0);
    assert_eq!(r.x1, 670.0);
    assert!((r.height() - 310.0).abs() < 1e-9);
    assert!((r.y0 - (300.0 + (600.0 - 310.0) / 2.0)).abs() < 1e-9);
}

#[test]
fn contain_tall_image_pillarboxes_horizontally() {
    let r = contain_rect(0.5, Rect::new(0.0, 0.0, 720.0, 1280.0));
    assert_eq!(r.y0, 0.0);
    assert_eq!(r.y1, 1280.0);
    assert!((r.width() - 640.0).abs() < 1e-9);
    assert!((r.x0 - 40.0).abs() < 1e-9);
}

#[test]
fn contain_degenerate_aspect_returns_target() {
    let target = Rect::new(1.0, 2.0, 3.0, 4.0);
    assert_eq!(contain_rect(0.0, target), target);
    assert_eq!(contain_rect(f64::NAN, target), target);
}

#[test]
fn frame_pixel_lookup_is_bounds_checked() {
    let f = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![1, 2, 3, 255, 4, 5, 6, 255],
    };
    assert_eq!(f.pixel(1, 0), Some([4, 5, 6, 255]));
    assert_eq!(f.pixel(2, 0), None);
    assert_eq!(f.to_straight_rgba8(), f.data);
}
