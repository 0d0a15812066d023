use crate::assets::loader::RenderResources;
use crate::audio::voice::VoiceOut;
use crate::compose::draw_frame;
use crate::cues::{Cue, CueLatches, Track};
use crate::encode::sink::FrameSink;
use crate::foundation::error::StudioResult;
use crate::render::surface::FrameTarget;
use crate::timeline::Timeline;

/// What the loop should do after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Keep ticking.
    Continue,
    /// The timeline has been played to the end; the final frame was emitted.
    Finished,
}

/// Everything carried from one tick to the next.
#[derive(Debug, Clone)]
pub struct PlaybackState {
    timeline: Timeline,
    latches: CueLatches,
    last_elapsed_ms: f64,
    ticks: u64,
}

impl PlaybackState {
    /// Fresh state at the start of `timeline`.
    pub fn new(timeline: Timeline) -> Self {
        Self {
            timeline,
            latches: CueLatches::new(),
            last_elapsed_ms: 0.0,
            ticks: 0,
        }
    }

    /// Timeline being played.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Elapsed time of the last tick.
    pub fn last_elapsed_ms(&self) -> f64 {
        self.last_elapsed_ms
    }

    /// Run one tick: paint the frame for `elapsed_ms`, fire due cues into `voices`, push the frame.
    ///
    /// Elapsed time never goes backwards: an earlier or non-finite value repeats the previous
    /// instant. Cue failures are logged and ignored; surface and sink failures end the run.
    pub fn tick<T: FrameTarget>(
        &mut self,
        elapsed_ms: f64,
        surface: &mut T,
        res: &RenderResources,
        sink: &mut dyn FrameSink,
        mut voices: Option<&mut dyn VoiceOut>,
    ) -> StudioResult<TickOutcome> {
        let forward = self.ticks == 0 || elapsed_ms >= self.last_elapsed_ms;
        let elapsed = if elapsed_ms.is_finite() && forward {
            elapsed_ms.max(0.0)
        } else {
            self.last_elapsed_ms
        };
        self.last_elapsed_ms = elapsed;
        self.ticks += 1;

        let at = self.timeline.scene_at(elapsed);
        surface.begin_frame();
        draw_frame(surface, at, &self.timeline, res);
        let frame = surface.finish_frame()?;

        for cue in self.latches.poll(elapsed, &self.timeline, res.gallery.len()) {
            tracing::debug!(?cue, elapsed_ms = elapsed, "cue");
            if let Some(out) = voices.as_deref_mut() {
                fire_cue(out, cue, elapsed, res);
            }
        }

        sink.push_frame(elapsed, &frame)?;

        if self.timeline.is_finished(elapsed) {
            Ok(TickOutcome::Finished)
        } else {
            Ok(TickOutcome::Continue)
        }
    }
}

fn fire_cue(out: &mut dyn VoiceOut, cue: Cue, at_ms: f64, res: &RenderResources) {
    let outcome = match cue {
        Cue::StartTrack(track) => {
            let clip = match track {
                Track::Intro => res.intro_audio.as_ref(),
                Track::Script => res.script_audio.as_ref(),
                Track::Outro => res.outro_audio.as_ref(),
            };
            match clip {
                Some(clip) => out.play_clip(at_ms, clip),
                None => Ok(()),
            }
        }
        _ => match cue.tone() {
            Some(tone) => out.play_tone(at_ms, &tone),
            None => Ok(()),
        },
    };
    if let Err(e) = outcome {
        tracing::warn!(?cue, error = %e, "cue playback rejected");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/player.rs"]
mod tests;
