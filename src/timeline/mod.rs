//! Scene timeline: a pure mapping from elapsed milliseconds to the active scene.
//!
//! The timeline has no clock of its own. Preview and recording both feed it the elapsed time of
//! the current tick, which keeps visual output identical regardless of capture mode.

/// Scene windows and the gallery time division.
pub mod scene;

pub use scene::{
    CARD_DURATION_MS, GALLERY_START_MS, GallerySlot, INTRO_END_MS, SCAN_END_MS, SCRIPT_START_MS,
    Scene, SceneAt, Timeline, scene_at,
};
