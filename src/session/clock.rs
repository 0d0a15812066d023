use std::time::{Duration, Instant};

/// Source of elapsed time, asked once per tick.
pub trait Driver {
    /// Elapsed milliseconds for the next tick. The first tick is at (or near) zero.
    fn next_tick(&mut self) -> f64;
}

/// Wall-clock driver pacing ticks at a fixed interval, like a display refresh.
///
/// A late tick is not made up for: the next one is scheduled one interval after it.
#[derive(Debug, Clone)]
pub struct RealtimeDriver {
    interval: Duration,
    start: Option<Instant>,
    last: Option<Instant>,
}

impl RealtimeDriver {
    /// Pace ticks every `tick_ms` milliseconds.
    pub fn new(tick_ms: f64) -> Self {
        let interval = if tick_ms.is_finite() && tick_ms > 0.0 {
            Duration::from_secs_f64(tick_ms / 1000.0)
        } else {
            Duration::ZERO
        };
        Self {
            interval,
            start: None,
            last: None,
        }
    }
}

impl Driver for RealtimeDriver {
    fn next_tick(&mut self) -> f64 {
        let Some(start) = self.start else {
            let now = Instant::now();
            self.start = Some(now);
            self.last = Some(now);
            return 0.0;
        };
        if let Some(last) = self.last {
            let deadline = last + self.interval;
            let now = Instant::now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            }
        }
        let now = Instant::now();
        self.last = Some(now);
        now.duration_since(start).as_secs_f64() * 1000.0
    }
}

/// Deterministic driver advancing by a fixed step: `0, step, 2 * step, ...`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteppedDriver {
    step_ms: f64,
    next_ms: f64,
}

impl SteppedDriver {
    /// Advance by `step_ms` each tick.
    pub fn new(step_ms: f64) -> Self {
        Self {
            step_ms,
            next_ms: 0.0,
        }
    }
}

impl Driver for SteppedDriver {
    fn next_tick(&mut self) -> f64 {
        let t = self.next_ms;
        self.next_ms += self.step_ms;
        t
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/clock.rs"]
mod tests;
