use super::*;

#[test]
fn stage_is_vertical_720p() {
    assert_eq!(Canvas::STAGE.width, 720);
    assert_eq!(Canvas::STAGE.height, 1280);
    assert_eq!(Canvas::STAGE.rgba8_len(), 720 * 1280 * 4);
    assert!(Canvas::new(0, 10).is_err());
}

#[test]
fn hex_colors_unpack_channels() {
    assert_eq!(Rgba8::hex(0xfbbf24), Rgba8::rgb(0xfb, 0xbf, 0x24));
    assert_eq!(Rgba8::hex(0x004a80).a, 255);
    assert_eq!(Rgba8::WHITE.with_alpha(0.6).a, 153);
}

#[test]
fn premul_rounds_like_canvas() {
    let p = Rgba8Premul::from_straight(Rgba8 {
        r: 100,
        g: 50,
        b: 200,
        a: 128,
    });
    assert_eq!(
        p.to_array(),
        [
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
    assert_eq!(Rgba8Premul::transparent().a, 0);
}
