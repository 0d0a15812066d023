//! Frame sinks.
//!
//! The render loop hands every painted frame to a sink together with the elapsed time it was
//! painted at. Display sinks keep or show the latest frame; the encoder sink turns the irregular
//! tick stream into a constant-rate video.

/// `ffmpeg`-based sinks (MP4 recording and the preview window).
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;

pub use ffmpeg::{FfmpegSink, FfmpegSinkOpts, FfplaySink};
pub use sink::{AudioInputConfig, FrameSink, InMemorySink, LatestFrameSink, SinkConfig};
