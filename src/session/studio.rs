use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::assets::loader::RenderResources;
use crate::audio::MIX_SAMPLE_RATE;
use crate::audio::graph::{AudioGraph, write_f32le_file};
use crate::audio::voice::VoiceOut;
use crate::config::StudioOpts;
use crate::encode::ffmpeg::{TempFileGuard, temp_path};
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::error::{StudioError, StudioResult};
use crate::render::cpu::CpuSurface;
use crate::session::clock::Driver;
use crate::session::player::{PlaybackState, TickOutcome};

/// Visible lifecycle state of a [`Studio`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StudioState {
    /// Nothing running; a run may start.
    Idle,
    /// Surface and output are being prepared.
    Preparing,
    /// The tick loop is running.
    Running,
    /// The last run failed; cleared by [`Studio::acknowledge_error`].
    Failed(String),
}

/// Shared cancellation flag, checked around every wait for the next tick.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// New handle with no stop requested.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the running loop to stop; it cleans up on its next tick.
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Return `true` once a stop was requested.
    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunSummary {
    /// Ticks executed.
    pub ticks: u64,
    /// Elapsed time of the last tick.
    pub last_elapsed_ms: f64,
    /// `true` when the whole timeline was played; `false` after a stop.
    pub completed: bool,
}

/// Output side of a recording: the encoder sink, the audio graph and temporary files.
///
/// Teardown closes the graph, aborts the sink unless it finished, and removes temporaries. It runs
/// at most once, whether called explicitly, through [`RecordingSession::finish`], or on drop.
pub struct RecordingSession<'a> {
    sink: &'a mut dyn FrameSink,
    audio: AudioGraph,
    audio_tmp: TempFileGuard,
    ended: bool,
    torn_down: bool,
}

impl std::fmt::Debug for RecordingSession<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingSession")
            .field("audio", &self.audio)
            .field("ended", &self.ended)
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

impl<'a> RecordingSession<'a> {
    /// Begin `sink` and open an audio graph mixing at `sample_rate`.
    pub fn start(
        sink: &'a mut dyn FrameSink,
        cfg: SinkConfig,
        sample_rate: u32,
    ) -> StudioResult<Self> {
        if let Err(e) = sink.begin(cfg) {
            sink.abort();
            return Err(e);
        }
        Ok(Self {
            sink,
            audio: AudioGraph::new(sample_rate),
            audio_tmp: TempFileGuard(None),
            ended: false,
            torn_down: false,
        })
    }

    /// The audio graph cues are scheduled into.
    pub fn audio(&self) -> &AudioGraph {
        &self.audio
    }

    /// Return `true` once teardown ran.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    fn parts(&mut self) -> (&mut dyn FrameSink, &mut AudioGraph) {
        (&mut *self.sink, &mut self.audio)
    }

    /// Mix `total_ms` of audio, hand it to the sink and finish the output.
    pub fn finish(mut self, total_ms: f64) -> StudioResult<()> {
        let res = self.finish_output(total_ms);
        self.teardown();
        res
    }

    fn finish_output(&mut self, total_ms: f64) -> StudioResult<()> {
        let audio = if self.sink.wants_audio() {
            let mixed = self.audio.mix(total_ms);
            let path = temp_path("audio_mix", "f32le");
            self.audio_tmp = TempFileGuard(Some(path.clone()));
            write_f32le_file(&mixed, &path)?;
            Some(AudioInputConfig {
                path,
                sample_rate: self.audio.sample_rate(),
                channels: self.audio.channels(),
            })
        } else {
            None
        };
        self.sink.end(audio)?;
        self.ended = true;
        Ok(())
    }

    /// Release everything the session holds. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.audio.close();
        if !self.ended {
            self.sink.abort();
        }
        self.audio_tmp = TempFileGuard(None);
        tracing::debug!(completed = self.ended, "recording session torn down");
    }
}

impl Drop for RecordingSession<'_> {
    fn drop(&mut self) {
        self.teardown();
    }
}

enum Output<'a> {
    Display {
        sink: &'a mut dyn FrameSink,
        live: Option<&'a mut dyn VoiceOut>,
    },
    Recording(RecordingSession<'a>),
}

impl Output<'_> {
    fn parts(&mut self) -> (&mut dyn FrameSink, Option<&mut dyn VoiceOut>) {
        match self {
            Self::Display { sink, live } => {
                let live = match live {
                    Some(live) => Some(&mut **live as &mut dyn VoiceOut),
                    None => None,
                };
                (&mut **sink, live)
            }
            Self::Recording(session) => {
                let (sink, audio) = session.parts();
                (sink, Some(audio as &mut dyn VoiceOut))
            }
        }
    }

    fn finish(self, total_ms: f64) -> StudioResult<()> {
        match self {
            Self::Display { sink, .. } => sink.end(None),
            Self::Recording(session) => session.finish(total_ms),
        }
    }

    fn teardown(self) {
        match self {
            Self::Display { sink, live } => {
                sink.abort();
                if let Some(live) = live {
                    live.silence();
                }
            }
            Self::Recording(mut session) => session.teardown(),
        }
    }
}

enum Mode<'a> {
    Preview(Option<&'a mut dyn VoiceOut>),
    Record,
}

/// Owns the preview and recording lifecycle.
#[derive(Debug)]
pub struct Studio {
    opts: StudioOpts,
    state: StudioState,
    stop: StopHandle,
}

impl Studio {
    /// Idle studio using `opts`.
    pub fn new(opts: StudioOpts) -> Self {
        Self {
            opts,
            state: StudioState::Idle,
            stop: StopHandle::new(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &StudioState {
        &self.state
    }

    /// Options the studio was built with.
    pub fn opts(&self) -> &StudioOpts {
        &self.opts
    }

    /// Handle that stops the running loop; clone it into signal handlers.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Leave the failed state. No-op in any other state.
    pub fn acknowledge_error(&mut self) {
        if matches!(self.state, StudioState::Failed(_)) {
            self.state = StudioState::Idle;
        }
    }

    /// Play the timeline into a display sink without sound.
    #[tracing::instrument(level = "info", skip_all, fields(name = %res.name))]
    pub fn preview(
        &mut self,
        res: &RenderResources,
        display: &mut dyn FrameSink,
        driver: &mut dyn Driver,
    ) -> StudioResult<RunSummary> {
        self.run(res, display, driver, Mode::Preview(None))
    }

    /// Play the timeline into a display sink, sending narration and cue voices to `live` as
    /// they fire. Rejected voices are logged and skipped.
    #[tracing::instrument(level = "info", skip_all, fields(name = %res.name))]
    pub fn preview_with_audio(
        &mut self,
        res: &RenderResources,
        display: &mut dyn FrameSink,
        live: &mut dyn VoiceOut,
        driver: &mut dyn Driver,
    ) -> StudioResult<RunSummary> {
        self.run(res, display, driver, Mode::Preview(Some(live)))
    }

    /// Play the timeline into a recording sink, mixing narration and cues into its soundtrack.
    ///
    /// An explicit stop discards the recording.
    #[tracing::instrument(level = "info", skip_all, fields(name = %res.name))]
    pub fn record(
        &mut self,
        res: &RenderResources,
        sink: &mut dyn FrameSink,
        driver: &mut dyn Driver,
    ) -> StudioResult<RunSummary> {
        self.run(res, sink, driver, Mode::Record)
    }

    fn fail(&mut self, err: StudioError) -> StudioError {
        tracing::error!(error = %err, "studio run failed");
        self.state = StudioState::Failed(err.to_string());
        err
    }

    fn run<'a>(
        &mut self,
        res: &RenderResources,
        sink: &'a mut dyn FrameSink,
        driver: &mut dyn Driver,
        mode: Mode<'a>,
    ) -> StudioResult<RunSummary> {
        let record = matches!(mode, Mode::Record);
        match &self.state {
            StudioState::Idle => {}
            StudioState::Failed(_) => {
                return Err(StudioError::validation(
                    "previous run failed; acknowledge the error before starting again",
                ));
            }
            StudioState::Preparing | StudioState::Running => {
                return Err(StudioError::validation("a run is already in progress"));
            }
        }
        self.stop.reset();
        self.state = StudioState::Preparing;

        let prepared = self.prepare(res).and_then(|(state, surface)| {
            let cfg = SinkConfig {
                width: self.opts.canvas.width,
                height: self.opts.canvas.height,
                fps: self.opts.fps,
            };
            let output = match mode {
                Mode::Record => {
                    Output::Recording(RecordingSession::start(sink, cfg, MIX_SAMPLE_RATE)?)
                }
                Mode::Preview(live) => {
                    if let Err(e) = sink.begin(cfg) {
                        sink.abort();
                        return Err(e);
                    }
                    Output::Display { sink, live }
                }
            };
            Ok((state, surface, output))
        });
        let (mut state, mut surface, mut output) = match prepared {
            Ok(p) => p,
            Err(e) => return Err(self.fail(e)),
        };

        self.state = StudioState::Running;
        tracing::info!(
            total_ms = state.timeline().total_ms(),
            record,
            "playback started"
        );

        loop {
            if self.stop.is_stop_requested() {
                return Ok(self.stopped(output, &state));
            }
            let elapsed = driver.next_tick();
            // A stop that arrived while the driver waited wins over the pending tick.
            if self.stop.is_stop_requested() {
                return Ok(self.stopped(output, &state));
            }

            let (sink, audio) = output.parts();
            match state.tick(elapsed, &mut surface, res, sink, audio) {
                Ok(TickOutcome::Continue) => {}
                Ok(TickOutcome::Finished) => break,
                Err(e) => {
                    output.teardown();
                    return Err(self.fail(e));
                }
            }
        }

        if let Err(e) = output.finish(state.timeline().total_ms()) {
            return Err(self.fail(e));
        }
        self.state = StudioState::Idle;
        tracing::info!(ticks = state.ticks(), "playback finished");
        Ok(RunSummary {
            ticks: state.ticks(),
            last_elapsed_ms: state.last_elapsed_ms(),
            completed: true,
        })
    }

    fn stopped(&mut self, output: Output<'_>, state: &PlaybackState) -> RunSummary {
        output.teardown();
        self.state = StudioState::Idle;
        tracing::info!(elapsed_ms = state.last_elapsed_ms(), "playback stopped");
        RunSummary {
            ticks: state.ticks(),
            last_elapsed_ms: state.last_elapsed_ms(),
            completed: false,
        }
    }

    fn prepare(&self, res: &RenderResources) -> StudioResult<(PlaybackState, CpuSurface)> {
        self.opts.validate()?;
        let timeline = res.timeline()?;
        let surface = CpuSurface::new(self.opts.canvas, self.opts.surface_opts()?)?;
        Ok((PlaybackState::new(timeline), surface))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/studio.rs"]
mod tests;
