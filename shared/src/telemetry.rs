use std::time::Duration;
use tokio::time::Instant;

/// Wall-clock stopwatch for a quiz session.
///
/// Backed by `tokio::time::Instant` so paused test runtimes control it.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Instant,
    frozen: Option<Duration>,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            frozen: None,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.frozen.unwrap_or_else(|| self.start.elapsed())
    }

    /// Whole seconds, as shown in the running clock.
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed().as_secs()
    }

    /// Pins the elapsed value. Later calls keep the first frozen value.
    pub fn freeze(&mut self) -> Duration {
        let value = self.elapsed();
        self.frozen = Some(value);
        value
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.is_some()
    }
}
