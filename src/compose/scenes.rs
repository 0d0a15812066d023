use crate::assets::image::RasterImage;
use crate::assets::loader::RenderResources;
use crate::caption::{caption_at, draw_caption};
use crate::compose::hud::draw_hud;
use crate::compose::sunburst::{
    INTRO_BASE, INTRO_WEDGE, SCAN_BASE, SCAN_WEDGE, draw_sunburst,
};
use crate::foundation::core::{Affine, Point, Rect, Rgba8};
use crate::render::surface::{Surface, TextAlign, contain_rect};
use crate::timeline::{INTRO_END_MS, SCRIPT_START_MS, Timeline};

/// Amber used for titles.
pub const TITLE_AMBER: Rgba8 = Rgba8::hex(0xfbbf24);
/// Gallery background behind the backdrop.
pub const GALLERY_BG: Rgba8 = Rgba8::hex(0x101010);

/// First title line of the intro.
pub const INTRO_TITLE: &str = "QUEM É ESSE";
/// Second title line of the intro.
pub const INTRO_SUBTITLE: &str = "POKÉMON?";
/// Line above the name during the reveal.
pub const REVEAL_LEAD: &str = "É O...";
/// Call to action shown 1 s into the card.
pub const CARD_CTA: &str = "DEIXE SEU LIKE!";
/// First line of the closing question.
pub const CARD_QUESTION_1: &str = "QUEM DEVE SER";
/// Second line of the closing question.
pub const CARD_QUESTION_2: &str = "O PRÓXIMO?";

/// Duration of the white flash opening the scan.
pub const FLASH_MS: f64 = 200.0;
/// Delay before the HUD appears in the scan.
pub const HUD_DELAY_MS: f64 = 400.0;
/// Maximum silhouette bounce in pixels.
pub const BOUNCE_PX: f64 = 20.0;
/// Logical card size before scaling.
pub const CARD_SIZE: (f64, f64) = (350.0, 490.0);
/// Duration of the card zoom-in.
pub const CARD_ZOOM_MS: f64 = 400.0;

/// Box the creature (and silhouette) is contained in; `dy` shifts it vertically.
fn creature_box(w: f64, dy: f64) -> Rect {
    Rect::new(50.0, 300.0 + dy, w - 50.0, 900.0 + dy)
}

fn draw_contained(surface: &mut dyn Surface, image: &RasterImage, target: Rect) {
    surface.draw_image(image, contain_rect(image.aspect(), target), 1.0);
}

fn title(surface: &mut dyn Surface, text: &str, y: f64, size: f32, color: Rgba8) {
    let x = surface.canvas().w() / 2.0;
    surface.draw_outlined_text(text, Point::new(x, y), size, TextAlign::Center, color);
}

fn caption_overlay(surface: &mut dyn Surface, elapsed_ms: f64, res: &RenderResources) {
    if let Some(state) = caption_at(
        &res.script,
        elapsed_ms - SCRIPT_START_MS,
        res.script_duration_ms,
    ) {
        draw_caption(surface, &state);
    }
}

/// Silhouette bounce offset at `elapsed_ms`.
pub fn bounce(elapsed_ms: f64) -> f64 {
    (elapsed_ms / 300.0).sin().abs() * BOUNCE_PX
}

/// Card scale `card_ms` into the card scene.
pub fn card_scale(card_ms: f64) -> f64 {
    if card_ms < CARD_ZOOM_MS {
        2.5 - 1.3 * (card_ms / CARD_ZOOM_MS)
    } else {
        1.2
    }
}

/// Rotating blue sunburst, bouncing silhouette and the question.
pub fn draw_intro(surface: &mut dyn Surface, elapsed_ms: f64, res: &RenderResources) {
    draw_sunburst(surface, INTRO_BASE, INTRO_WEDGE, elapsed_ms / 2000.0);
    let w = surface.canvas().w();
    draw_contained(surface, &res.silhouette, creature_box(w, -bounce(elapsed_ms)));
    title(surface, INTRO_TITLE, 150.0, 60.0, TITLE_AMBER);
    title(surface, INTRO_SUBTITLE, 230.0, 80.0, TITLE_AMBER);
}

/// Flash, then the red sunburst, the creature and the HUD. Shared by the scan and the reveal,
/// timed from the end of the intro.
pub fn draw_scan(surface: &mut dyn Surface, elapsed_ms: f64, res: &RenderResources) {
    let local = elapsed_ms - INTRO_END_MS;
    let c = surface.canvas();
    if local < FLASH_MS {
        surface.fill_rect(Rect::new(0.0, 0.0, c.w(), c.h()), Rgba8::WHITE);
        return;
    }
    draw_sunburst(surface, SCAN_BASE, SCAN_WEDGE, -elapsed_ms / 2000.0);
    draw_contained(surface, &res.creature, creature_box(c.w(), 0.0));
    if local > HUD_DELAY_MS {
        draw_hud(surface, local);
    }
}

/// Scan layers plus the name header and captions.
pub fn draw_reveal(surface: &mut dyn Surface, elapsed_ms: f64, res: &RenderResources) {
    draw_scan(surface, elapsed_ms, res);
    title(surface, REVEAL_LEAD, 150.0, 50.0, Rgba8::WHITE);
    title(surface, &res.name.to_uppercase(), 230.0, 80.0, Rgba8::WHITE);
    caption_overlay(surface, elapsed_ms, res);
}

/// Current pose over its blurred backdrop, slowly zooming, with the name band and captions.
pub fn draw_gallery(
    surface: &mut dyn Surface,
    elapsed_ms: f64,
    timeline: &Timeline,
    res: &RenderResources,
) {
    let c = surface.canvas();
    let (w, h) = (c.w(), c.h());
    surface.fill_rect(Rect::new(0.0, 0.0, w, h), GALLERY_BG);

    if !res.gallery.is_empty() {
        let (index, progress) = timeline
            .gallery_slot(elapsed_ms, res.gallery.len())
            .map_or((0, 0.0), |s| (s.index, s.progress));
        let pose = &res.gallery[index];

        let bleed = crate::assets::loader::BACKDROP_BLEED_PX;
        draw_contained(
            surface,
            &pose.backdrop,
            Rect::new(-bleed, -bleed, w + bleed, h + bleed),
        );

        let zoom = 1.0 + progress * 0.1;
        surface.save();
        surface.transform(
            Affine::translate((w / 2.0, h / 2.0))
                * Affine::scale(zoom)
                * Affine::translate((-w / 2.0, -h / 2.0)),
        );
        draw_contained(surface, &pose.pose, Rect::new(0.0, 0.0, w, h));
        surface.restore();
    }

    surface.fill_rect(Rect::new(0.0, 80.0, w, 180.0), Rgba8::rgba(0, 0, 0, 0.5));
    title(surface, &res.name, 130.0, 50.0, Rgba8::WHITE);
    caption_overlay(surface, elapsed_ms, res);
}

/// Card zooming in on black, then the calls to action.
pub fn draw_card(surface: &mut dyn Surface, card_ms: f64, res: &RenderResources) {
    let c = surface.canvas();
    let (w, h) = (c.w(), c.h());
    surface.fill_rect(Rect::new(0.0, 0.0, w, h), Rgba8::BLACK);

    let (cw, ch) = CARD_SIZE;
    surface.save();
    surface.transform(Affine::translate((w / 2.0, h / 2.0)) * Affine::scale(card_scale(card_ms)));
    surface.draw_image(
        &res.card,
        Rect::new(-cw / 2.0, -ch / 2.0, cw / 2.0, ch / 2.0),
        1.0,
    );
    surface.restore();

    if card_ms > 1000.0 {
        title(surface, CARD_CTA, 120.0, 60.0, TITLE_AMBER);
    }
    if card_ms > 2500.0 {
        title(surface, CARD_QUESTION_1, h - 200.0, 40.0, Rgba8::WHITE);
        title(surface, CARD_QUESTION_2, h - 140.0, 60.0, Rgba8::WHITE);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/scenes.rs"]
pub(crate) mod tests;
