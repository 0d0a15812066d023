use crate::audio::AudioPcm;
use crate::audio::graph::AudioGraph;
use crate::audio::tone::ToneSpec;
use crate::foundation::error::StudioResult;

/// Where voices fired by sound cues go.
///
/// A recording places them on an [`AudioGraph`] for the final mixdown; a preview plays them on a
/// live output device as they fire.
pub trait VoiceOut {
    /// Start `clip` at `at_ms` of the playback timeline.
    fn play_clip(&mut self, at_ms: f64, clip: &AudioPcm) -> StudioResult<()>;

    /// Synthesize `tone` and start it at `at_ms`.
    fn play_tone(&mut self, at_ms: f64, tone: &ToneSpec) -> StudioResult<()>;

    /// Cut every voice still sounding. Idempotent.
    fn silence(&mut self) {}
}

impl VoiceOut for AudioGraph {
    fn play_clip(&mut self, at_ms: f64, clip: &AudioPcm) -> StudioResult<()> {
        AudioGraph::play_clip(self, at_ms, clip)
    }

    fn play_tone(&mut self, at_ms: f64, tone: &ToneSpec) -> StudioResult<()> {
        AudioGraph::play_tone(self, at_ms, tone)
    }

    fn silence(&mut self) {
        self.close();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/voice.rs"]
mod tests;
