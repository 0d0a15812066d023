//! Frame compositor: one pure draw routine per scene.
//!
//! Every routine depends only on the elapsed time, the loaded resources and the surface size, so
//! the same instant always paints the same frame whether it is previewed or recorded.

pub mod hud;
/// Draw routines for each scene.
pub mod scenes;
/// Rotating wedge backgrounds.
pub mod sunburst;

use crate::assets::loader::RenderResources;
use crate::render::surface::Surface;
use crate::timeline::{Scene, SceneAt, Timeline};

/// Paint the frame for `at` onto `surface`.
pub fn draw_frame(
    surface: &mut dyn Surface,
    at: SceneAt,
    timeline: &Timeline,
    res: &RenderResources,
) {
    match at.scene {
        Scene::Intro => scenes::draw_intro(surface, at.elapsed_ms, res),
        Scene::Scan => scenes::draw_scan(surface, at.elapsed_ms, res),
        Scene::Reveal => scenes::draw_reveal(surface, at.elapsed_ms, res),
        Scene::Gallery => scenes::draw_gallery(surface, at.elapsed_ms, timeline, res),
        Scene::Card => scenes::draw_card(surface, at.local_ms, res),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/frame.rs"]
mod tests;
