//! Karaoke captions synchronized to narration without word timings.

/// Word highlighting derived from playback progress.
pub mod karaoke;
/// Caption box and word drawing.
pub mod render;

pub use karaoke::{CaptionState, WORDS_PER_PAGE, caption_at};
pub use render::{caption_box, draw_caption, fit_font_size};
