use smallvec::SmallVec;
use xxhash_rust::xxh3::xxh3_64;

use crate::audio::tone::ToneSpec;
use crate::timeline::{INTRO_END_MS, SCAN_END_MS, SCRIPT_START_MS, Timeline};

/// Minimum spacing between scan beeps.
pub const SCAN_BEEP_INTERVAL_MS: f64 = 180.0;

/// Narration track selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Track {
    /// Intro jingle, from 0.
    Intro,
    /// Narration, from the reveal.
    Script,
    /// Outro, from the card.
    Outro,
}

/// Something the cue scheduler wants heard at a given elapsed time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cue {
    /// Short blip during the scan; start frequency carries the per-beep jitter.
    ScanBeep {
        /// Oscillator start frequency in Hz.
        start_hz: f64,
    },
    /// Reveal chime.
    RevealPing,
    /// Gallery pose change.
    GalleryWhoosh {
        /// Pose that just appeared.
        index: usize,
    },
    /// Card entrance.
    CardSwish,
    /// Start a narration track.
    StartTrack(Track),
}

impl Cue {
    /// Tone to synthesize for this cue, or `None` for track starts.
    pub fn tone(&self) -> Option<ToneSpec> {
        match *self {
            Self::ScanBeep { start_hz } => Some(ToneSpec::scan(start_hz)),
            Self::RevealPing => Some(ToneSpec::PING),
            Self::GalleryWhoosh { .. } => Some(ToneSpec::WHOOSH),
            Self::CardSwish => Some(ToneSpec::SWISH),
            Self::StartTrack(_) => None,
        }
    }
}

/// Cues produced by one poll; rarely more than two.
pub type CueBatch = SmallVec<[Cue; 4]>;

/// Per-session latches ensuring each one-shot fires at most once.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CueLatches {
    /// Reveal ping played.
    pub reveal_fired: bool,
    /// Highest gallery pose index a whoosh was played for.
    pub gallery_index_fired: Option<usize>,
    /// Card swish played.
    pub card_fired: bool,
    /// Elapsed time of the last scan beep.
    pub last_scan_beep_at: Option<f64>,
    /// Intro track started.
    pub intro_started: bool,
    /// Narration track started.
    pub script_started: bool,
    /// Outro track started.
    pub outro_started: bool,
}

impl CueLatches {
    /// Fresh latches for a new session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cues to fire at `elapsed_ms`, updating the latches.
    ///
    /// One-shots fire on the first poll at or past their threshold, so a late tick still fires
    /// them once. Gallery whooshes only fire while a pose is on screen.
    pub fn poll(&mut self, elapsed_ms: f64, timeline: &Timeline, pose_count: usize) -> CueBatch {
        let mut out = CueBatch::new();
        let card_start = timeline.card_start_ms();

        if !self.intro_started && elapsed_ms >= 0.0 {
            self.intro_started = true;
            out.push(Cue::StartTrack(Track::Intro));
        }

        if (INTRO_END_MS..SCAN_END_MS).contains(&elapsed_ms)
            && elapsed_ms < card_start
            && self
                .last_scan_beep_at
                .is_none_or(|last| elapsed_ms - last > SCAN_BEEP_INTERVAL_MS)
        {
            self.last_scan_beep_at = Some(elapsed_ms);
            out.push(Cue::ScanBeep {
                start_hz: scan_start_hz(elapsed_ms),
            });
        }

        if elapsed_ms >= SCRIPT_START_MS {
            if !self.reveal_fired {
                self.reveal_fired = true;
                out.push(Cue::RevealPing);
            }
            if !self.script_started {
                self.script_started = true;
                out.push(Cue::StartTrack(Track::Script));
            }
        }

        if let Some(slot) = timeline.gallery_slot(elapsed_ms, pose_count)
            && self.gallery_index_fired.is_none_or(|i| slot.index > i)
        {
            self.gallery_index_fired = Some(slot.index);
            out.push(Cue::GalleryWhoosh { index: slot.index });
        }

        if elapsed_ms >= card_start {
            if !self.card_fired {
                self.card_fired = true;
                out.push(Cue::CardSwish);
            }
            if !self.outro_started {
                self.outro_started = true;
                out.push(Cue::StartTrack(Track::Outro));
            }
        }

        out
    }
}

/// Scan beep start frequency in `[800, 1200)`, a pure function of the firing instant.
pub fn scan_start_hz(elapsed_ms: f64) -> f64 {
    let h = xxh3_64(&elapsed_ms.to_bits().to_le_bytes());
    // Top 53 bits as a uniform fraction.
    let unit = (h >> 11) as f64 / (1u64 << 53) as f64;
    ToneSpec::SCAN_MIN_START_HZ + unit * ToneSpec::SCAN_START_SPREAD_HZ
}

#[cfg(test)]
#[path = "../../tests/unit/cues/scheduler.rs"]
mod tests;
