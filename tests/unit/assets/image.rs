use super::*;

#[test]
fn rejects_mismatched_buffers() {
    assert!(RasterImage::from_premul(2, 2, vec![0; 15]).is_err());
    assert!(RasterImage::from_premul(0, 2, Vec::new()).is_err());
}

#[test]
fn ids_are_unique_and_clones_share_them() {
    let a = RasterImage::solid(1, 1, [255, 0, 0, 255]).unwrap();
    let b = RasterImage::solid(1, 1, [255, 0, 0, 255]).unwrap();
    assert_ne!(a.id(), b.id());
    assert_eq!(a.clone().id(), a.id());
}

#[test]
fn straight_input_is_premultiplied() {
    let img = RasterImage::from_straight(1, 1, vec![200, 100, 50, 0]).unwrap();
    assert_eq!(img.premul_bytes(), &[0, 0, 0, 0]);
    let img = RasterImage::from_straight(2, 1, vec![10, 20, 30, 255, 40, 50, 60, 255]).unwrap();
    assert_eq!(img.to_straight_rgba8(), vec![10, 20, 30, 255, 40, 50, 60, 255]);
    assert!((img.aspect() - 2.0).abs() < 1e-12);
}
