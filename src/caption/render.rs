use kurbo::{RoundedRect, Shape};

use crate::caption::karaoke::CaptionState;
use crate::foundation::core::{Point, Rect, Rgba8};
use crate::render::surface::{Surface, TextAlign};

/// Starting caption font size.
pub const MAX_FONT_PX: f32 = 42.0;
/// Smallest caption font size.
pub const MIN_FONT_PX: f32 = 20.0;
/// Font size decrement while fitting.
pub const FONT_STEP_PX: f32 = 2.0;
/// Horizontal padding; the box is inset by half of it and text fits inside the full padding.
pub const SIDE_PADDING_PX: f64 = 40.0;
/// Caption box height.
pub const BOX_HEIGHT_PX: f64 = 160.0;
/// Distance from the canvas bottom to the top of the caption box.
pub const BOX_BOTTOM_OFFSET_PX: f64 = 320.0;
/// Caption box corner radius.
pub const BOX_RADIUS_PX: f64 = 24.0;

/// Amber used for spoken words and the box border.
pub const AMBER: Rgba8 = Rgba8::hex(0xfbbf24);

const BOX_BORDER_PX: f64 = 3.0;

fn box_fill() -> Rgba8 {
    Rgba8::rgba(15, 23, 42, 0.9)
}

fn future_word() -> Rgba8 {
    Rgba8::rgba(255, 255, 255, 0.6)
}

fn glow() -> Rgba8 {
    Rgba8::rgba(251, 191, 36, 0.35)
}

/// Caption box rectangle for a canvas of `w` x `h`.
pub fn caption_box(w: f64, h: f64) -> Rect {
    let x = SIDE_PADDING_PX / 2.0;
    let y = h - BOX_BOTTOM_OFFSET_PX;
    Rect::new(x, y, w - x, y + BOX_HEIGHT_PX)
}

/// Largest font size (from 42 down to 20 in steps of 2) at which `words` fit in `max_width`.
///
/// Each word is measured with a trailing space. Returns the size and the measured width.
pub fn fit_font_size(surface: &mut dyn Surface, words: &[&str], max_width: f64) -> (f32, f64) {
    let mut size = MAX_FONT_PX;
    let mut width = measure_words(surface, words, size);
    while width > max_width && size > MIN_FONT_PX {
        size -= FONT_STEP_PX;
        width = measure_words(surface, words, size);
    }
    (size, width)
}

fn measure_words(surface: &mut dyn Surface, words: &[&str], size: f32) -> f64 {
    words
        .iter()
        .map(|w| surface.measure_text(&format!("{w} "), size))
        .sum()
}

/// Draw the caption box and the visible page of words.
pub fn draw_caption(surface: &mut dyn Surface, state: &CaptionState<'_>) {
    let canvas = surface.canvas();
    let (w, h) = (canvas.w(), canvas.h());
    let bx = caption_box(w, h);

    let rounded = RoundedRect::from_rect(bx, BOX_RADIUS_PX).to_path(0.1);
    surface.fill_path(&rounded, box_fill());
    surface.stroke_path(&rounded, BOX_BORDER_PX, AMBER);

    let (size, text_width) = fit_font_size(surface, &state.page_words, w - SIDE_PADDING_PX * 2.0);
    let outline = f64::from(size) * crate::render::surface::OUTLINE_WIDTH_EM;
    let center_y = bx.y0 + BOX_HEIGHT_PX / 2.0;
    let mut x = (w - text_width) / 2.0;

    for (i, word) in state.page_words.iter().enumerate() {
        let origin = Point::new(x, center_y);
        let color = if state.is_highlighted(i) {
            // Soft halo in place of a shadow blur.
            surface.stroke_text(word, origin, size, TextAlign::Left, outline * 3.0, glow());
            AMBER
        } else {
            future_word()
        };
        surface.draw_outlined_text(word, origin, size, TextAlign::Left, color);
        x += surface.measure_text(&format!("{word} "), size);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/caption/render.rs"]
mod tests;
