//! dexreel renders vertical "who's that creature?" reveal videos.
//!
//! A run is driven by elapsed time alone:
//!
//! - Load a [`Project`] manifest into [`RenderResources`] (background removal, silhouette,
//!   blurred gallery backdrops, narration audio)
//! - Hand the resources to a [`Studio`] together with a [`FrameSink`] and a [`Driver`]
//! - Every tick the [`Timeline`] picks the scene, the compositor paints it, captions and sound
//!   cues follow, and the frame goes to the sink
//!
//! Recording streams frames to `ffmpeg` at a constant 30 fps and muxes the mixed soundtrack once
//! the timeline completes.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Asset manifest, decoding, background removal and resource loading.
pub mod assets;
/// Audio decoding, tone synthesis, mixing and WAV support.
pub mod audio;
/// Karaoke caption synchronization and drawing.
pub mod caption;
/// Studio options.
pub mod config;
/// Per-scene frame compositor.
pub mod compose;
/// Sound cue scheduler.
pub mod cues;
/// Frame sinks (in-memory, display and `ffmpeg`).
pub mod encode;
/// Core types and errors.
pub mod foundation;
/// Tracing subscriber setup.
pub mod logging;
/// Drawing surfaces.
pub mod render;
/// Playback loop and recording lifecycle.
pub mod session;
/// Scene timeline.
pub mod timeline;

pub use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8, Rgba8Premul};
pub use crate::foundation::error::{StudioError, StudioResult};

pub use crate::assets::{Project, RenderResources};
pub use crate::audio::voice::VoiceOut;
pub use crate::config::StudioOpts;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, FfplaySink};
pub use crate::encode::sink::{
    AudioInputConfig, FrameSink, InMemorySink, LatestFrameSink, SinkConfig,
};
pub use crate::render::{CpuSurface, CpuSurfaceOpts, FrameRGBA};
pub use crate::session::{
    Driver, PlaybackState, RealtimeDriver, RunSummary, SteppedDriver, StopHandle, Studio,
    StudioState,
};
pub use crate::timeline::{Scene, SceneAt, Timeline};
