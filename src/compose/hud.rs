//! Scanner HUD drawn over the scan and reveal scenes.

use kurbo::{Circle, Shape};

use crate::foundation::core::{BezPath, Point, Rect, Rgba8};
use crate::render::surface::{Surface, TextAlign};

/// Bezel color.
pub const BEZEL: Rgba8 = Rgba8::hex(0xC03028);
/// Height of the top and bottom bezel bands.
pub const BEZEL_BAND_PX: f64 = 120.0;
/// Width of the side bezel bands.
pub const BEZEL_SIDE_PX: f64 = 40.0;
/// Spacing of the scanner grid.
pub const GRID_STEP_PX: f64 = 50.0;
/// Scanline speed in pixels per millisecond.
pub const SCANLINE_SPEED: f64 = 0.8;
/// Scanline thickness.
pub const SCANLINE_PX: f64 = 5.0;
/// Status label blink half-period.
pub const BLINK_MS: f64 = 200.0;
/// Blinking status label.
pub const STATUS_LABEL: &str = "ANALISANDO DADOS...";

const CAMERA_CENTER: (f64, f64) = (90.0, 60.0);
const CAMERA_RADIUS: f64 = 35.0;
const CAMERA_BLUE: Rgba8 = Rgba8::hex(0x1E90FF);
const LIGHTS: [Rgba8; 3] = [
    Rgba8::hex(0xFF0000),
    Rgba8::hex(0xFFFF00),
    Rgba8::hex(0x00FF00),
];
const SCANLINE_GREEN: Rgba8 = Rgba8::hex(0x00ff00);

fn circle(center: (f64, f64), r: f64) -> BezPath {
    Circle::new(center, r).to_path(0.1)
}

/// Vertical position of the scanline `local_ms` into the scan.
pub fn scanline_y(local_ms: f64, height: f64) -> f64 {
    (local_ms * SCANLINE_SPEED).rem_euclid(height)
}

/// Return `true` while the status label is visible.
pub fn label_visible(local_ms: f64) -> bool {
    ((local_ms / BLINK_MS).floor() as i64).rem_euclid(2) == 0
}

/// Scanner interior: the canvas minus the bezel.
pub fn interior(w: f64, h: f64) -> Rect {
    Rect::new(BEZEL_SIDE_PX, BEZEL_BAND_PX, w - BEZEL_SIDE_PX, h - BEZEL_BAND_PX)
}

/// Draw the full HUD for `local_ms` since the scan started.
pub fn draw_hud(surface: &mut dyn Surface, local_ms: f64) {
    let c = surface.canvas();
    let (w, h) = (c.w(), c.h());

    surface.fill_rect(Rect::new(0.0, 0.0, w, BEZEL_BAND_PX), BEZEL);
    surface.fill_rect(Rect::new(0.0, h - BEZEL_BAND_PX, w, h), BEZEL);
    surface.fill_rect(Rect::new(0.0, 0.0, BEZEL_SIDE_PX, h), BEZEL);
    surface.fill_rect(Rect::new(w - BEZEL_SIDE_PX, 0.0, w, h), BEZEL);

    let camera = circle(CAMERA_CENTER, CAMERA_RADIUS);
    surface.fill_path(&camera, CAMERA_BLUE);
    surface.stroke_path(&camera, 4.0, Rgba8::WHITE);

    for (i, color) in LIGHTS.iter().enumerate() {
        let light = circle((160.0 + 40.0 * i as f64, 40.0), 10.0);
        surface.fill_path(&light, *color);
        surface.stroke_path(&light, 4.0, Rgba8::rgba(0, 0, 0, 0.5));
    }

    let inner = interior(w, h);
    surface.save();
    surface.clip_rect(inner);
    surface.fill_rect(inner, Rgba8::rgba(0, 255, 100, 0.05));
    surface.stroke_path(&grid_path(w, h), 1.0, Rgba8::rgba(0, 255, 100, 0.2));

    let y = scanline_y(local_ms, h);
    // Wide faint band stands in for the glow.
    surface.fill_rect(
        Rect::new(inner.x0, y - 8.0, inner.x1, y + SCANLINE_PX + 8.0),
        Rgba8::rgba(0, 255, 0, 0.25),
    );
    surface.fill_rect(
        Rect::new(inner.x0, y, inner.x1, y + SCANLINE_PX),
        SCANLINE_GREEN,
    );

    if label_visible(local_ms) {
        surface.fill_text(
            STATUS_LABEL,
            Point::new(w / 2.0, 160.0),
            30.0,
            TextAlign::Center,
            SCANLINE_GREEN,
        );
    }
    surface.restore();
}

fn grid_path(w: f64, h: f64) -> BezPath {
    let mut p = BezPath::new();
    let mut x = BEZEL_SIDE_PX;
    while x < w - BEZEL_SIDE_PX {
        p.move_to((x, 0.0));
        p.line_to((x, h));
        x += GRID_STEP_PX;
    }
    let mut y = BEZEL_BAND_PX;
    while y < h - BEZEL_BAND_PX {
        p.move_to((0.0, y));
        p.line_to((w, y));
        y += GRID_STEP_PX;
    }
    p
}

#[cfg(test)]
#[path = "../../tests/unit/compose/hud.rs"]
mod tests;
