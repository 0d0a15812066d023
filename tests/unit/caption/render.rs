use super::*;
use crate::caption::karaoke::caption_at;
use crate::render::recording::{Op, RecordingSurface};

#[test]
fn caption_box_geometry() {
    let b = caption_box(720.0, 1280.0);
    assert_eq!(b, Rect::new(20.0, 960.0, 700.0, 1120.0));
}

#[test]
fn short_page_keeps_max_font_size() {
    let mut s = RecordingSurface::stage();
    let (size, width) = fit_font_size(&mut s, &["hi", "there"], 640.0);
    assert_eq!(size, 42.0);
    // "hi " + "there " at 0.5 em per char.
    assert!((width - 9.0 * 21.0).abs() < 1e-9);
}

#[test]
fn long_page_shrinks_in_steps_of_two() {
    let mut s = RecordingSurface::stage();
    // 5 words x 8 chars + spaces = 45 chars; fits 640 once 45 * size/2 <= 640, i.e. size <= 28.4.
    let words = ["abcdefgh"; 5];
    let (size, width) = fit_font_size(&mut s, &words, 640.0);
    assert_eq!(size, 28.0);
    assert!(width <= 640.0);
}

#[test]
fn font_size_floors_at_twenty() {
    let mut s = RecordingSurface::stage();
    let words = ["supercalifragilisticexpialidocious"; 5];
    let (size, width) = fit_font_size(&mut s, &words, 640.0);
    assert_eq!(size, 20.0);
    assert!(width > 640.0);
}

#[test]
fn spoken_words_are_amber_and_later_words_dim() {
    let script = "one two three four";
    let state = caption_at(script, 400.0, 1000.0).unwrap();
    assert_eq!(state.current_word_index, 1);

    let mut s = RecordingSurface::stage();
    draw_caption(&mut s, &state);

    let fills: Vec<(String, Rgba8)> = s
        .ops
        .iter()
        .filter_map(|op| match op {
            Op::FillText { text, color, .. } => Some((text.clone(), *color)),
            _ => None,
        })
        .collect();
    assert_eq!(fills.len(), 4);
    assert_eq!(fills[0].1, AMBER);
    assert_eq!(fills[1].1, AMBER);
    assert_eq!(fills[2].1, Rgba8::rgba(255, 255, 255, 0.6));
    assert_eq!(fills[3].0, "four");

    // Every word is outlined in black at 15% of the font size before it is filled.
    let outlines = s
        .ops
        .iter()
        .filter(|op| matches!(op, Op::StrokeText { color, .. } if *color == Rgba8::BLACK))
        .count();
    assert_eq!(outlines, 4);
}

#[test]
fn words_advance_left_to_right_as_a_centered_block() {
    let state = caption_at("ab cd", 0.0, 1000.0).unwrap();
    let mut s = RecordingSurface::stage();
    draw_caption(&mut s, &state);

    let origins: Vec<Point> = s
        .ops
        .iter()
        .filter_map(|op| match op {
            Op::FillText { origin, .. } => Some(*origin),
            _ => None,
        })
        .collect();
    // 6 chars at 21 px = 126 px wide block.
    assert!((origins[0].x - (720.0 - 126.0) / 2.0).abs() < 1e-9);
    assert!((origins[1].x - origins[0].x - 63.0).abs() < 1e-9);
    assert!((origins[0].y - 1040.0).abs() < 1e-9);
}
