use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::image::RasterImage;
use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8};
use crate::foundation::error::{StudioError, StudioResult};
use crate::render::surface::{FrameRGBA, FrameTarget, Surface, TextAlign};
use crate::render::text::TextEngine;

/// Options for [`CpuSurface`].
#[derive(Debug, Clone)]
pub struct CpuSurfaceOpts {
    /// TrueType/OpenType font used for every text run.
    pub font_bytes: Arc<Vec<u8>>,
    /// If set, every frame starts filled with this straight-alpha color instead of transparent.
    pub clear_rgba: Option<[u8; 4]>,
}

impl CpuSurfaceOpts {
    /// Transparent frames drawing text with `font_bytes`.
    pub fn new(font_bytes: Arc<Vec<u8>>) -> Self {
        Self {
            font_bytes,
            clear_rgba: None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct SavedState {
    transform: Affine,
    clip_depth: usize,
}

/// CPU drawing surface powered by `vello_cpu` for vector/image rasterization and `parley` for
/// text shaping.
pub struct CpuSurface {
    canvas: Canvas,
    opts: CpuSurfaceOpts,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,

    transform: Affine,
    clip_depth: usize,
    stack: Vec<SavedState>,

    text: TextEngine,
    font: vello_cpu::peniko::FontData,
    image_cache: HashMap<u64, vello_cpu::Image>,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("canvas", &self.canvas)
            .field("cached_images", &self.image_cache.len())
            .finish()
    }
}

impl CpuSurface {
    /// Create a surface of `canvas` size.
    ///
    /// Fails with a setup error when the canvas exceeds the rasterizer limits or the font cannot
    /// be registered.
    pub fn new(canvas: Canvas, opts: CpuSurfaceOpts) -> StudioResult<Self> {
        let w: u16 = canvas
            .width
            .try_into()
            .map_err(|_| StudioError::setup("surface width exceeds u16"))?;
        let h: u16 = canvas
            .height
            .try_into()
            .map_err(|_| StudioError::setup("surface height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(StudioError::setup("surface width/height must be > 0"));
        }

        let text = TextEngine::new(opts.font_bytes.clone())?;
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(opts.font_bytes.as_ref().clone()),
            0,
        );

        Ok(Self {
            canvas,
            opts,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            transform: Affine::IDENTITY,
            clip_depth: 0,
            stack: Vec::new(),
            text,
            font,
            image_cache: HashMap::new(),
        })
    }

    fn image_paint_for(&mut self, image: &RasterImage) -> StudioResult<vello_cpu::Image> {
        if let Some(p) = self.image_cache.get(&image.id()) {
            return Ok(p.clone());
        }
        let pixmap = pixmap_from_premul_bytes(image.premul_bytes(), image.width(), image.height())?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.image_cache.insert(image.id(), paint.clone());
        Ok(paint)
    }

    fn draw_text_run(
        &mut self,
        text: &str,
        origin: Point,
        size_px: f32,
        align: TextAlign,
        stroke_width: Option<f64>,
        color: Rgba8,
    ) {
        let layout = match self.text.layout_line(text, size_px) {
            Ok(layout) => layout,
            Err(e) => {
                tracing::debug!("text layout skipped: {e}");
                return;
            }
        };

        let width = f64::from(layout.width());
        let height = f64::from(layout.height());
        let x = match align {
            TextAlign::Left => origin.x,
            TextAlign::Center => origin.x - width / 2.0,
        };
        let y = origin.y - height / 2.0;
        let tr = self.transform * Affine::translate((x, y));

        self.ctx.set_transform(affine_to_cpu(tr));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color_to_cpu(color));
        if let Some(w) = stroke_width {
            self.ctx.set_stroke(
                vello_cpu::kurbo::Stroke::new(w).with_join(vello_cpu::kurbo::Join::Round),
            );
        }

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                let builder = self
                    .ctx
                    .glyph_run(&self.font)
                    .font_size(run.run().font_size());
                if stroke_width.is_some() {
                    builder.stroke_glyphs(glyphs);
                } else {
                    builder.fill_glyphs(glyphs);
                }
            }
        }
    }
}

impl Surface for CpuSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn save(&mut self) {
        self.stack.push(SavedState {
            transform: self.transform,
            clip_depth: self.clip_depth,
        });
    }

    fn restore(&mut self) {
        let Some(state) = self.stack.pop() else {
            return;
        };
        while self.clip_depth > state.clip_depth {
            self.ctx.pop_layer();
            self.clip_depth -= 1;
        }
        self.transform = state.transform;
    }

    fn transform(&mut self, t: Affine) {
        self.transform *= t;
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.ctx.set_transform(affine_to_cpu(self.transform));
        self.ctx.push_clip_layer(&bezpath_to_cpu(&rect_path(rect)));
        self.clip_depth += 1;
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.ctx.set_transform(affine_to_cpu(self.transform));
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            rect.x0, rect.y0, rect.x1, rect.y1,
        ));
    }

    fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        self.ctx.set_transform(affine_to_cpu(self.transform));
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    fn stroke_path(&mut self, path: &BezPath, width: f64, color: Rgba8) {
        self.ctx.set_transform(affine_to_cpu(self.transform));
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.set_stroke(
            vello_cpu::kurbo::Stroke::new(width).with_join(vello_cpu::kurbo::Join::Round),
        );
        self.ctx.stroke_path(&bezpath_to_cpu(path));
    }

    fn draw_image(&mut self, image: &RasterImage, dest: Rect, opacity: f32) {
        let paint = match self.image_paint_for(image) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("image draw skipped: {e}");
                return;
            }
        };
        let (iw, ih) = (f64::from(image.width()), f64::from(image.height()));
        let tr = self.transform
            * Affine::translate((dest.x0, dest.y0))
            * Affine::scale_non_uniform(dest.width() / iw, dest.height() / ih);

        let opacity = opacity.clamp(0.0, 1.0);
        self.ctx.set_transform(affine_to_cpu(tr));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(paint);
        if opacity < 1.0 {
            self.ctx.push_opacity_layer(opacity);
        }
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
        if opacity < 1.0 {
            self.ctx.pop_layer();
        }
    }

    fn measure_text(&mut self, text: &str, size_px: f32) -> f64 {
        match self.text.layout_line(text, size_px) {
            Ok(layout) => f64::from(layout.full_width()),
            Err(_) => 0.0,
        }
    }

    fn fill_text(&mut self, text: &str, origin: Point, size_px: f32, align: TextAlign, color: Rgba8) {
        self.draw_text_run(text, origin, size_px, align, None, color);
    }

    fn stroke_text(
        &mut self,
        text: &str,
        origin: Point,
        size_px: f32,
        align: TextAlign,
        width: f64,
        color: Rgba8,
    ) {
        self.draw_text_run(text, origin, size_px, align, Some(width), color);
    }
}

impl FrameTarget for CpuSurface {
    fn begin_frame(&mut self) {
        self.ctx.reset();
        self.transform = Affine::IDENTITY;
        self.clip_depth = 0;
        self.stack.clear();
        if let Some([r, g, b, a]) = self.opts.clear_rgba {
            let (w, h) = (self.canvas.w(), self.canvas.h());
            self.fill_rect(Rect::new(0.0, 0.0, w, h), Rgba8 { r, g, b, a });
        }
    }

    fn finish_frame(&mut self) -> StudioResult<FrameRGBA> {
        while self.clip_depth > 0 {
            self.ctx.pop_layer();
            self.clip_depth -= 1;
        }
        self.stack.clear();

        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);

        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.pixmap.data_as_u8_slice().to_vec(),
        })
    }
}

fn rect_path(rect: Rect) -> BezPath {
    let mut p = BezPath::new();
    p.move_to((rect.x0, rect.y0));
    p.line_to((rect.x1, rect.y0));
    p.line_to((rect.x1, rect.y1));
    p.line_to((rect.x0, rect.y1));
    p.close_path();
    p
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> StudioResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| StudioError::asset("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| StudioError::asset("image height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(StudioError::asset("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
