use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::error::{StudioError, StudioResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::surface::FrameRGBA;

/// Default H.264 bitrate in kbit/s.
pub const DEFAULT_VIDEO_BITRATE_KBPS: u32 = 8_000;

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Background color used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
    /// H.264 bitrate in kbit/s.
    pub video_bitrate_kbps: u32,
}

impl FfmpegSinkOpts {
    /// Create options for outputting an MP4 to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            bg_rgba: [0, 0, 0, 255],
            video_bitrate_kbps: DEFAULT_VIDEO_BITRATE_KBPS,
        }
    }
}

/// Maps irregular tick times onto a constant-rate frame grid.
///
/// Output frame `n` covers `[n, n + 1) / fps` seconds. A tick at `elapsed_ms` fills every slot up
/// to and including the one it falls in: slow ticks repeat the frame, fast ticks are dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CfrClock {
    fps: u32,
    written: u64,
}

impl CfrClock {
    pub(crate) fn new(fps: u32) -> Self {
        Self { fps, written: 0 }
    }

    /// Number of copies of the frame painted at `elapsed_ms` to emit, advancing the clock.
    pub(crate) fn advance(&mut self, elapsed_ms: f64) -> u64 {
        let t = if elapsed_ms.is_finite() {
            elapsed_ms.max(0.0)
        } else {
            0.0
        };
        let slot = (t * f64::from(self.fps) / 1000.0).floor() as u64;
        let target = slot + 1;
        let copies = target.saturating_sub(self.written);
        self.written = self.written.max(target);
        copies
    }

    pub(crate) fn written(&self) -> u64 {
        self.written
    }
}

/// Removes the file it points at when dropped.
#[derive(Debug, Default)]
pub(crate) struct TempFileGuard(pub(crate) Option<PathBuf>);

impl TempFileGuard {
    pub(crate) fn path(&self) -> Option<&Path> {
        self.0.as_deref()
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

/// Unique path in the system temp dir, e.g. `dexreel_video_<pid>_<nanos>.mp4`.
pub(crate) fn temp_path(stem: &str, ext: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "dexreel_{stem}_{}_{}.{ext}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ))
}

/// A child process reading raw RGBA frames on stdin.
struct RawVideoPipe {
    program: &'static str,
    child: Child,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
}

impl RawVideoPipe {
    fn spawn(program: &'static str, mut cmd: Command) -> StudioResult<Self> {
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        // Terminal Ctrl-C goes to the studio's stop handle, not straight to the encoder.
        #[cfg(unix)]
        std::os::unix::process::CommandExt::process_group(&mut cmd, 0);
        let mut child = cmd.spawn().map_err(|e| {
            StudioError::setup(format!(
                "failed to spawn {program} (is it installed and on PATH?): {e}"
            ))
        })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| StudioError::setup(format!("failed to open {program} stdin")))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| StudioError::setup(format!("failed to open {program} stderr")))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });
        Ok(Self {
            program,
            child,
            stdin: Some(stdin),
            stderr_drain: Some(stderr_drain),
        })
    }

    fn write(&mut self, bytes: &[u8]) -> StudioResult<()> {
        use std::io::Write as _;
        let program = self.program;
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| StudioError::playback(format!("{program} input is already closed")))?;
        stdin.write_all(bytes).map_err(|e| {
            StudioError::playback(format!("failed to write frame to {program} stdin: {e}"))
        })
    }

    fn finish(mut self) -> StudioResult<()> {
        drop(self.stdin.take());
        let status = self.child.wait().map_err(|e| {
            StudioError::encode(format!("failed to wait for {} to finish: {e}", self.program))
        })?;
        let stderr_bytes = self.drain_stderr()?;
        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(StudioError::encode(format!(
                "{} exited with status {}: {}",
                self.program,
                status,
                stderr.trim()
            )));
        }
        Ok(())
    }

    fn drain_stderr(&mut self) -> StudioResult<Vec<u8>> {
        match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| StudioError::encode("stderr drain thread panicked"))?
                .map_err(|e| StudioError::encode(format!("stderr read failed: {e}"))),
            None => Ok(Vec::new()),
        }
    }

    fn kill(mut self) {
        drop(self.stdin.take());
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = self.drain_stderr();
    }
}

impl Drop for RawVideoPipe {
    fn drop(&mut self) {
        if self.stdin.is_some() {
            drop(self.stdin.take());
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

fn rawvideo_input_args(cmd: &mut Command, cfg: &SinkConfig) {
    cmd.args([
        "-loglevel",
        "error",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
        "-s",
        &format!("{}x{}", cfg.width, cfg.height),
        "-r",
        &cfg.fps.to_string(),
        "-i",
        "pipe:0",
    ]);
}

/// Recording sink: a constant-rate H.264 stream encoded by the system `ffmpeg`, muxed with the
/// mixed soundtrack once the recording completes.
///
/// Video goes to a temporary file while the loop runs; the final output only appears after a
/// successful `end`, so an aborted recording never leaves a partial file behind.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    pipe: Option<RawVideoPipe>,
    video_tmp: TempFileGuard,
    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    clock: CfrClock,
    last_elapsed_ms: f64,
}

impl std::fmt::Debug for FfmpegSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegSink")
            .field("opts", &self.opts)
            .field("running", &self.pipe.is_some())
            .field("frames_written", &self.clock.written())
            .finish()
    }
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            pipe: None,
            video_tmp: TempFileGuard(None),
            scratch: Vec::new(),
            cfg: None,
            clock: CfrClock::new(1),
            last_elapsed_ms: f64::NEG_INFINITY,
        }
    }

    /// Constant-rate frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.clock.written()
    }

    fn mux(&self, video: &Path, audio: Option<&AudioInputConfig>) -> StudioResult<()> {
        let out = &self.opts.out_path;
        let Some(audio) = audio else {
            if std::fs::rename(video, out).is_err() {
                std::fs::copy(video, out).map_err(|e| {
                    StudioError::encode(format!("failed to move video to '{}': {e}", out.display()))
                })?;
            }
            return Ok(());
        };
        if audio.sample_rate == 0 || audio.channels == 0 {
            return Err(StudioError::validation(
                "audio sample_rate and channels must be non-zero",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.arg(if self.opts.overwrite { "-y" } else { "-n" });
        cmd.args(["-loglevel", "error", "-i"])
            .arg(video)
            .args([
                "-f",
                "f32le",
                "-ar",
                &audio.sample_rate.to_string(),
                "-ac",
                &audio.channels.to_string(),
                "-i",
            ])
            .arg(&audio.path)
            .args([
                "-c:v",
                "copy",
                "-c:a",
                "aac",
                "-shortest",
                "-movflags",
                "+faststart",
            ])
            .arg(out)
            .stdin(Stdio::null())
            .stdout(Stdio::null());

        let output = cmd
            .output()
            .map_err(|e| StudioError::encode(format!("failed to spawn ffmpeg for muxing: {e}")))?;
        if !output.status.success() {
            let _ = std::fs::remove_file(out);
            return Err(StudioError::encode(format!(
                "ffmpeg mux exited with status {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

impl FrameSink for FfmpegSink {
    #[tracing::instrument(level = "debug", skip(self), fields(out = %self.opts.out_path.display()))]
    fn begin(&mut self, cfg: SinkConfig) -> StudioResult<()> {
        cfg.validate()?;
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(StudioError::validation(
                "ffmpeg sink width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(StudioError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(StudioError::setup(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let video_path = temp_path("video", "mp4");
        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-y");
        // ffmpeg does not understand premultiplied alpha; frames are flattened in push_frame.
        rawvideo_input_args(&mut cmd, &cfg);
        cmd.args([
            "-an",
            "-c:v",
            "libx264",
            "-b:v",
            &format!("{}k", self.opts.video_bitrate_kbps),
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ])
        .arg(&video_path);

        self.pipe = Some(RawVideoPipe::spawn("ffmpeg", cmd)?);
        self.video_tmp = TempFileGuard(Some(video_path));
        self.scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.clock = CfrClock::new(cfg.fps);
        self.last_elapsed_ms = f64::NEG_INFINITY;
        tracing::debug!(width = cfg.width, height = cfg.height, fps = cfg.fps, "encoder started");
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, elapsed_ms: f64, frame: &FrameRGBA) -> StudioResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| StudioError::playback("ffmpeg sink not started"))?;
        if elapsed_ms < self.last_elapsed_ms {
            return Err(StudioError::playback(
                "ffmpeg sink received frames out of order",
            ));
        }
        self.last_elapsed_ms = elapsed_ms;
        cfg.check_frame(frame)?;
        if frame.data.len() != self.scratch.len() {
            return Err(StudioError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }

        let copies = self.clock.advance(elapsed_ms);
        if copies == 0 {
            return Ok(());
        }
        flatten_premul_over_bg_to_opaque_rgba8(&mut self.scratch, &frame.data, self.opts.bg_rgba)?;
        let pipe = self
            .pipe
            .as_mut()
            .ok_or_else(|| StudioError::playback("ffmpeg sink is already finalized"))?;
        for _ in 0..copies {
            pipe.write(&self.scratch)?;
        }
        Ok(())
    }

    fn end(&mut self, audio: Option<AudioInputConfig>) -> StudioResult<()> {
        let pipe = self
            .pipe
            .take()
            .ok_or_else(|| StudioError::encode("ffmpeg sink not started"))?;
        self.cfg = None;
        if let Err(e) = pipe.finish() {
            self.video_tmp = TempFileGuard(None);
            return Err(e);
        }
        let video = self
            .video_tmp
            .path()
            .map(Path::to_path_buf)
            .ok_or_else(|| StudioError::encode("video temp file is missing"))?;
        let res = self.mux(&video, audio.as_ref());
        self.video_tmp = TempFileGuard(None);
        res?;
        tracing::info!(
            out = %self.opts.out_path.display(),
            frames = self.clock.written(),
            "recording written"
        );
        Ok(())
    }

    fn abort(&mut self) {
        if let Some(pipe) = self.pipe.take() {
            pipe.kill();
            tracing::debug!("encoder aborted");
        }
        self.cfg = None;
        self.video_tmp = TempFileGuard(None);
    }

    fn wants_audio(&self) -> bool {
        true
    }
}

/// Preview window: streams frames to `ffplay` at a constant rate.
pub struct FfplaySink {
    bg_rgba: [u8; 4],
    pipe: Option<RawVideoPipe>,
    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    clock: CfrClock,
}

impl std::fmt::Debug for FfplaySink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfplaySink")
            .field("running", &self.pipe.is_some())
            .finish_non_exhaustive()
    }
}

impl FfplaySink {
    /// Create a preview sink flattening alpha over `bg_rgba`.
    pub fn new(bg_rgba: [u8; 4]) -> Self {
        Self {
            bg_rgba,
            pipe: None,
            scratch: Vec::new(),
            cfg: None,
            clock: CfrClock::new(1),
        }
    }
}

impl FrameSink for FfplaySink {
    fn begin(&mut self, cfg: SinkConfig) -> StudioResult<()> {
        cfg.validate()?;
        let mut cmd = Command::new("ffplay");
        cmd.args([
            "-loglevel",
            "error",
            "-window_title",
            "dexreel",
            "-autoexit",
            "-f",
            "rawvideo",
            "-pixel_format",
            "rgba",
            "-video_size",
            &format!("{}x{}", cfg.width, cfg.height),
            "-framerate",
            &cfg.fps.to_string(),
            "-i",
            "pipe:0",
        ]);
        self.pipe = Some(RawVideoPipe::spawn("ffplay", cmd)?);
        self.scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.clock = CfrClock::new(cfg.fps);
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, elapsed_ms: f64, frame: &FrameRGBA) -> StudioResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| StudioError::playback("preview sink not started"))?;
        cfg.check_frame(frame)?;
        let copies = self.clock.advance(elapsed_ms);
        if copies == 0 {
            return Ok(());
        }
        flatten_premul_over_bg_to_opaque_rgba8(&mut self.scratch, &frame.data, self.bg_rgba)?;
        let pipe = self
            .pipe
            .as_mut()
            .ok_or_else(|| StudioError::playback("preview window is closed"))?;
        for _ in 0..copies {
            pipe.write(&self.scratch)?;
        }
        Ok(())
    }

    fn end(&mut self, _audio: Option<AudioInputConfig>) -> StudioResult<()> {
        self.cfg = None;
        match self.pipe.take() {
            Some(pipe) => pipe.finish(),
            None => Ok(()),
        }
    }

    fn abort(&mut self) {
        self.cfg = None;
        if let Some(pipe) = self.pipe.take() {
            pipe.kill();
        }
    }
}

pub(crate) fn flatten_premul_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src_premul: &[u8],
    bg_rgba: [u8; 4],
) -> StudioResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(StudioError::validation(
            "flatten_premul_over_bg_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = u16::from(bg_rgba[0]);
    let bg_g = u16::from(bg_rgba[1]);
    let bg_b = u16::from(bg_rgba[2]);

    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        d[0] = (u16::from(s[0]) + mul_div255_u16(bg_r, inv)).min(255) as u8;
        d[1] = (u16::from(s[1]) + mul_div255_u16(bg_g, inv)).min(255) as u8;
        d[2] = (u16::from(s[2]) + mul_div255_u16(bg_b, inv)).min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> StudioResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
