use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn premultiply_zero_alpha_clears_color() {
    let mut px = vec![200u8, 100, 50, 0, 255, 255, 255, 255];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![0, 0, 0, 0, 255, 255, 255, 255]);
}

#[test]
fn unpremultiply_restores_opaque_and_half_alpha() {
    let mut px = vec![100u8, 50, 200, 128];
    premultiply_rgba8_in_place(&mut px);
    unpremultiply_rgba8_in_place(&mut px);
    assert!((i32::from(px[0]) - 100).abs() <= 1);
    assert!((i32::from(px[1]) - 50).abs() <= 1);
    assert!((i32::from(px[2]) - 200).abs() <= 1);
    assert_eq!(px[3], 128);
}
