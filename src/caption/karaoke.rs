use smallvec::SmallVec;

/// Words shown at once in the caption box.
pub const WORDS_PER_PAGE: usize = 5;
/// Above this progress the last word is highlighted regardless of character count.
pub const FORCE_LAST_WORD_PROGRESS: f64 = 0.98;

/// Highlighted word window derived from narration progress.
///
/// Recomputed every frame from `(script, elapsed, total)`; nothing is carried between frames.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptionState<'a> {
    /// Index of the word being spoken, over the whole script.
    pub current_word_index: usize,
    /// Index of the first word on the visible page.
    pub page_start: usize,
    /// Words on the visible page.
    pub page_words: SmallVec<[&'a str; WORDS_PER_PAGE]>,
}

impl CaptionState<'_> {
    /// Number of page words already spoken, including the current one.
    pub fn highlight_count(&self) -> usize {
        self.current_word_index + 1 - self.page_start
    }

    /// Return `true` when the `i`-th word on the page is spoken or being spoken.
    pub fn is_highlighted(&self, i: usize) -> bool {
        self.page_start + i <= self.current_word_index
    }
}

/// Resolve the caption window for `elapsed_ms` into narration lasting `total_ms`.
///
/// There is no word timing metadata. Progress through the audio is mapped onto the script's
/// character count, so long words hold the highlight longer than short ones. Returns `None` when
/// the script has no words or `total_ms` is not positive.
pub fn caption_at(script: &str, elapsed_ms: f64, total_ms: f64) -> Option<CaptionState<'_>> {
    if total_ms.is_nan() || total_ms <= 0.0 {
        return None;
    }
    let words: Vec<&str> = script.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }

    let total_chars: usize = words.iter().map(|w| w.chars().count()).sum();
    let progress = if elapsed_ms.is_nan() {
        0.0
    } else {
        (elapsed_ms / total_ms).clamp(0.0, 1.0)
    };
    let target = (progress * total_chars as f64).floor() as usize;

    let current_word_index = if progress > FORCE_LAST_WORD_PROGRESS {
        words.len() - 1
    } else {
        let mut cumulative = 0usize;
        words
            .iter()
            .position(|w| {
                cumulative += w.chars().count();
                cumulative >= target
            })
            .unwrap_or(words.len() - 1)
    };

    let page_start = (current_word_index / WORDS_PER_PAGE) * WORDS_PER_PAGE;
    let page_end = (page_start + WORDS_PER_PAGE).min(words.len());
    Some(CaptionState {
        current_word_index,
        page_start,
        page_words: words[page_start..page_end].iter().copied().collect(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/caption/karaoke.rs"]
mod tests;
