//! Millisecond time sources.
//!
//! Components never read the system clock directly. They hold a
//! [`SharedTime`] handle so tests can swap in [`ManualTime`] and step
//! through timers deterministically.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic millisecond clock.
pub trait TimeSource: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Shared handle passed to the simulation clock and the notification sink.
pub type SharedTime = Arc<dyn TimeSource>;

/// Wall time, measured in milliseconds since construction.
#[derive(Debug, Clone, Copy)]
pub struct WallTime {
    epoch: Instant,
}

impl WallTime {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    /// Instant matching a millisecond reading of this source.
    pub fn instant_at(&self, ms: u64) -> Instant {
        self.epoch + Duration::from_millis(ms)
    }
}

impl Default for WallTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for WallTime {
    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }
}

/// Virtual time that only moves when told to. Clones share one reading.
#[derive(Debug, Clone, Default)]
pub struct ManualTime {
    now: Arc<AtomicU64>,
}

impl ManualTime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(&self) -> SharedTime {
        Arc::new(self.clone())
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTime {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
