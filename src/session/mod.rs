//! Capture and playback loop.
//!
//! A [`Studio`] owns the run lifecycle: it prepares the surface and the output, asks a
//! [`Driver`] for the elapsed time of every tick, lets [`PlaybackState`] paint and schedule
//! sounds, and tears everything down on every exit path.

/// Tick time sources.
pub mod clock;
/// Per-tick work and the state carried between ticks.
pub mod player;
/// Run lifecycle, stop handle and recording session.
pub mod studio;

pub use clock::{Driver, RealtimeDriver, SteppedDriver};
pub use player::{PlaybackState, TickOutcome};
pub use studio::{RecordingSession, RunSummary, StopHandle, Studio, StudioState};
