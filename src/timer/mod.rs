//! Time sources for the listener's inter-arrival measurement.
//!
//! The listener timestamps every tag-matched frame against a free-running
//! millisecond clock and reports the gap since the previous match. Any source
//! implementing [`Clock`] works; [`TickCounter`] is a ready-made one driven from
//! a periodic timer interrupt.
//!
//! All arithmetic wraps, so a clock rolling over after ~49.7 days still yields
//! correct intervals shorter than that.

mod isr;
pub use isr::*;

/// A free-running millisecond clock.
pub trait Clock {
    /// Starts the clock. Called once when the listener is initialised.
    fn start(&mut self) {}

    /// Milliseconds since the clock was started.
    fn now_ms(&mut self) -> u32;
}

/// Timestamps of the last two tag-matched arrivals.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ArrivalTimer {
    previous_ms: u32,
    latest_ms: u32,
}

impl ArrivalTimer {
    /// Creates a timer whose previous arrival is at 0 ms.
    pub const fn new() -> Self {
        Self {
            previous_ms: 0,
            latest_ms: 0,
        }
    }

    /// Records an arrival at `now_ms` and returns the interval since the last one.
    ///
    /// The first arrival is measured from 0, i.e. from when the clock started.
    pub fn record(&mut self, now_ms: u32) -> u32 {
        self.latest_ms = now_ms;
        let elapsed = now_ms.wrapping_sub(self.previous_ms);
        self.previous_ms = now_ms;
        elapsed
    }

    /// Timestamp of the most recent arrival.
    pub fn latest_ms(&self) -> u32 {
        self.latest_ms
    }
}
