use std::f64::consts::TAU;

use crate::foundation::core::{Affine, BezPath, Rect, Rgba8};
use crate::render::surface::Surface;

/// Number of alternating wedges in a sunburst.
pub const WEDGES: usize = 24;
/// Wedge radius as a multiple of the larger canvas side.
pub const RADIUS_FACTOR: f64 = 1.5;

/// Intro palette.
pub const INTRO_BASE: Rgba8 = Rgba8::hex(0x004a80);
/// Intro wedge color.
pub const INTRO_WEDGE: Rgba8 = Rgba8::hex(0x0066cc);
/// Scan/reveal palette.
pub const SCAN_BASE: Rgba8 = Rgba8::hex(0x800000);
/// Scan/reveal wedge color.
pub const SCAN_WEDGE: Rgba8 = Rgba8::hex(0xcc0000);

/// Path of the wedges around the origin. Each wedge spans half of its `2π/24` step.
pub fn wedge_path(radius: f64) -> BezPath {
    let step = TAU / WEDGES as f64;
    let mut path = BezPath::new();
    for i in 0..WEDGES {
        let a0 = i as f64 * step;
        let a1 = a0 + step / 2.0;
        path.move_to((0.0, 0.0));
        path.line_to((a0.cos() * radius, a0.sin() * radius));
        path.line_to((a1.cos() * radius, a1.sin() * radius));
        path.close_path();
    }
    path
}

/// Fill the canvas with `base` and draw wedges of `wedge` rotated by `rotation` radians about the
/// canvas center.
pub fn draw_sunburst(surface: &mut dyn Surface, base: Rgba8, wedge: Rgba8, rotation: f64) {
    let c = surface.canvas();
    let (w, h) = (c.w(), c.h());
    surface.fill_rect(Rect::new(0.0, 0.0, w, h), base);

    surface.save();
    surface.transform(Affine::translate((w / 2.0, h / 2.0)) * Affine::rotate(rotation));
    surface.fill_path(&wedge_path(w.max(h) * RADIUS_FACTOR), wedge);
    surface.restore();
}
