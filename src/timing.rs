//! Build phase timing.

use std::time::{Duration, Instant};

/// Measures how long a build phase takes.
pub struct Timer {
    name: String,
    start: Instant,
}

impl Timer {
    /// Start a new timer with the given phase name.
    pub fn start(name: &str) -> Self {
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }

    /// Print the elapsed time and return it.
    pub fn finish(self) -> Duration {
        let elapsed = self.start.elapsed();
        let secs = elapsed.as_secs_f64();
        if secs >= 60.0 {
            println!("  [{:.1}m] {}", secs / 60.0, self.name);
        } else {
            println!("  [{:.1}s] {}", secs, self.name);
        }
        tracing::debug!(phase = %self.name, secs, "phase finished");
        elapsed
    }
}
