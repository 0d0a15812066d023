use super::*;

fn solid(w: u32, h: u32, px: [u8; 4]) -> image::RgbaImage {
    image::RgbaImage::from_pixel(w, h, image::Rgba(px))
}

#[test]
fn all_white_image_becomes_fully_transparent() {
    let mut img = solid(10, 10, [255, 255, 255, 255]);
    let cleared = remove_background(&mut img);
    assert_eq!(cleared, 100);
    assert!(img.pixels().all(|p| p.0[3] == 0));
    // Color channels are untouched.
    assert!(img.pixels().all(|p| p.0[..3] == [255, 255, 255]));
}

#[test]
fn enclosed_white_inside_a_ring_stays_opaque() {
    let mut img = solid(9, 9, [250, 250, 250, 255]);
    for i in 2..=6 {
        for (x, y) in [(i, 2), (i, 6), (2, i), (6, i)] {
            img.put_pixel(x, y, image::Rgba([200, 30, 30, 255]));
        }
    }
    remove_background(&mut img);

    assert_eq!(img.get_pixel(4, 4).0, [250, 250, 250, 255]);
    assert_eq!(img.get_pixel(3, 3).0[3], 255);
    assert_eq!(img.get_pixel(2, 4).0, [200, 30, 30, 255]);
    assert_eq!(img.get_pixel(0, 0).0[3], 0);
    assert_eq!(img.get_pixel(8, 4).0[3], 0);
}

#[test]
fn threshold_is_strict() {
    let mut img = solid(3, 3, [230, 255, 255, 255]);
    assert_eq!(remove_background(&mut img), 0);
    assert!(img.pixels().all(|p| p.0[3] == 255));
}

#[test]
fn colored_corner_does_not_seed() {
    let mut img = solid(4, 4, [255, 255, 255, 255]);
    img.put_pixel(0, 0, image::Rgba([0, 0, 0, 255]));
    remove_background(&mut img);
    assert_eq!(img.get_pixel(0, 0).0[3], 255);
    assert_eq!(img.get_pixel(1, 1).0[3], 0);
}

#[test]
fn silhouette_is_black_on_transparent() {
    let mut img = solid(3, 1, [255, 255, 255, 255]);
    img.put_pixel(1, 0, image::Rgba([10, 200, 90, 255]));
    img.put_pixel(2, 0, image::Rgba([10, 200, 90, 20]));
    make_silhouette(&mut img);

    assert_eq!(img.get_pixel(0, 0).0[3], 0);
    assert_eq!(img.get_pixel(1, 0).0, [0, 0, 0, 255]);
    assert_eq!(img.get_pixel(2, 0).0[3], 0);
}
