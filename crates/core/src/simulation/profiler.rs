//! Wall-clock timing of model phases.
//!
//! A [`ProfilerScope`] lives for the duration of the work it times and reports
//! through `tracing` at `trace` level when dropped, so timing costs nothing
//! unless a subscriber asks for it.

use std::time::{Duration, Instant};
use tracing::trace;

/// Times the enclosing block; reported when dropped.
pub struct ProfilerScope {
    start: Instant,
    name: &'static str,
}

impl ProfilerScope {
    /// Start timing `name`.
    pub fn new(name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            name,
        }
    }

    /// Time since the scope opened.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time since the scope opened, in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ProfilerScope {
    fn drop(&mut self) {
        trace!(scope = self.name, elapsed_ms = self.elapsed_ms(), "scope closed");
    }
}
