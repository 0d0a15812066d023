use super::*;

const SCRIPT: &str = "Este pequeno ser elétrico adora maçãs e trovões, \
                      mas fica tímido perto de estranhos na floresta";

#[test]
fn empty_script_or_duration_renders_nothing() {
    assert!(caption_at("", 100.0, 1000.0).is_none());
    assert!(caption_at("   \n\t ", 100.0, 1000.0).is_none());
    assert!(caption_at("hello", 100.0, 0.0).is_none());
    assert!(caption_at("hello", 100.0, -5.0).is_none());
    assert!(caption_at("hello", 100.0, f64::NAN).is_none());
}

#[test]
fn start_highlights_first_word() {
    let c = caption_at("one two three", 0.0, 3000.0).unwrap();
    assert_eq!(c.current_word_index, 0);
    assert_eq!(c.highlight_count(), 1);
    assert_eq!(c.page_words.as_slice(), &["one", "two", "three"]);
}

#[test]
fn progress_is_measured_in_characters() {
    // 1 + 10 chars; at 50% the target is char 5, inside the long word.
    let c = caption_at("a bbbbbbbbbb", 500.0, 1000.0).unwrap();
    assert_eq!(c.current_word_index, 1);
    // At 9% the target is char 0, still on the first word.
    let c = caption_at("a bbbbbbbbbb", 90.0, 1000.0).unwrap();
    assert_eq!(c.current_word_index, 0);
}

#[test]
fn current_word_index_never_decreases() {
    let total = 7_300.0;
    let mut last = 0usize;
    let mut t = -500.0;
    while t < total + 500.0 {
        let c = caption_at(SCRIPT, t, total).unwrap();
        assert!(c.current_word_index >= last, "index went back at t={t}");
        last = c.current_word_index;
        t += 16.0;
    }
    assert_eq!(last, SCRIPT.split_whitespace().count() - 1);
}

#[test]
fn past_98_percent_forces_the_last_word() {
    let words = SCRIPT.split_whitespace().count();
    let c = caption_at(SCRIPT, 981.0, 1000.0).unwrap();
    assert_eq!(c.current_word_index, words - 1);
    assert!(c.is_highlighted(c.page_words.len() - 1));
}

#[test]
fn pages_hold_five_words() {
    let script = "w1 w2 w3 w4 w5 w6 w7";
    let c = caption_at(script, 999.0, 1000.0).unwrap();
    assert_eq!(c.page_start, 5);
    assert_eq!(c.page_words.as_slice(), &["w6", "w7"]);
    assert_eq!(c.highlight_count(), 2);
    assert!(!caption_at(script, 0.0, 1000.0).unwrap().is_highlighted(1));
}

#[test]
fn identical_inputs_give_identical_output() {
    let a = caption_at(SCRIPT, 3_210.5, 7_300.0);
    let b = caption_at(SCRIPT, 3_210.5, 7_300.0);
    assert_eq!(a, b);
}
