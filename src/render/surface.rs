use crate::assets::image::RasterImage;
use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8};
use crate::foundation::error::StudioResult;
use crate::foundation::math::unpremultiply_rgba8_in_place;

/// Outline width of [`Surface::draw_outlined_text`] relative to the font size.
pub const OUTLINE_WIDTH_EM: f64 = 0.15;

/// Horizontal anchoring of a text run. Text is always vertically centered on its origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    /// Origin marks the left edge.
    Left,
    /// Origin marks the horizontal center.
    Center,
}

/// Minimal drawing capability the frame compositor paints through.
///
/// Geometry is given in stage pixels and goes through the current transform. `save`/`restore`
/// bracket transform and clip changes the same way a 2D canvas context does.
pub trait Surface {
    /// Size of the drawing target.
    fn canvas(&self) -> Canvas;

    /// Push the current transform and clip state.
    fn save(&mut self);
    /// Pop back to the last saved state. Unbalanced calls are ignored.
    fn restore(&mut self);
    /// Concatenate `t` onto the current transform.
    fn transform(&mut self, t: Affine);
    /// Intersect the clip with `rect` until the next `restore`.
    fn clip_rect(&mut self, rect: Rect);

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Rgba8);
    /// Fill an arbitrary path (non-zero winding).
    fn fill_path(&mut self, path: &BezPath, color: Rgba8);
    /// Stroke an arbitrary path with round joins.
    fn stroke_path(&mut self, path: &BezPath, width: f64, color: Rgba8);
    /// Draw `image` stretched into `dest`.
    fn draw_image(&mut self, image: &RasterImage, dest: Rect, opacity: f32);

    /// Advance width of `text` at `size_px`, including trailing whitespace.
    fn measure_text(&mut self, text: &str, size_px: f32) -> f64;
    /// Fill a single line of bold text.
    fn fill_text(&mut self, text: &str, origin: Point, size_px: f32, align: TextAlign, color: Rgba8);
    /// Outline a single line of bold text with a stroke of `width` pixels.
    fn stroke_text(
        &mut self,
        text: &str,
        origin: Point,
        size_px: f32,
        align: TextAlign,
        width: f64,
        color: Rgba8,
    );

    /// Bold text with a round-joined black outline of `0.15 * size_px`, stroked then filled.
    fn draw_outlined_text(
        &mut self,
        text: &str,
        origin: Point,
        size_px: f32,
        align: TextAlign,
        color: Rgba8,
    ) {
        let width = f64::from(size_px) * OUTLINE_WIDTH_EM;
        self.stroke_text(text, origin, size_px, align, width, Rgba8::BLACK);
        self.fill_text(text, origin, size_px, align, color);
    }
}

/// A surface whose painted pixels can be read back once per tick.
pub trait FrameTarget: Surface {
    /// Discard previous drawing commands and reset transform/clip state.
    fn begin_frame(&mut self);
    /// Rasterize everything drawn since `begin_frame`.
    fn finish_frame(&mut self) -> StudioResult<FrameRGBA>;
}

/// A rendered frame as premultiplied RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major, premultiplied alpha.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Pixel at `(x, y)` as premultiplied `[r, g, b, a]`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Straight-alpha copy of the pixels for image export.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }
}

/// Largest rectangle with `aspect` (w/h) that fits inside `target`, centered.
pub fn contain_rect(aspect: f64, target: Rect) -> Rect {
    let (w, h) = (target.width(), target.height());
    if !(aspect.is_finite() && aspect > 0.0) || h <= 0.0 {
        return target;
    }
    if aspect > w / h {
        let fh = w / aspect;
        let y = target.y0 + (h - fh) / 2.0;
        Rect::new(target.x0, y, target.x1, y + fh)
    } else {
        let fw = h * aspect;
        let x = target.x0 + (w - fw) / 2.0;
        Rect::new(x, target.y0, x + fw, target.y1)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
