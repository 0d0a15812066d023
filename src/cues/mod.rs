//! Sound cue scheduling.
//!
//! The scheduler is polled once per tick with the elapsed time and returns the one-shot effects
//! and narration track starts that became due since the previous poll.

/// Cue latches and the per-tick poll.
pub mod scheduler;

pub use scheduler::{Cue, CueBatch, CueLatches, SCAN_BEEP_INTERVAL_MS, Track, scan_start_hz};
