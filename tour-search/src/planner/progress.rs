//! Progress reporting threshold.
//!
//! The search logs a partial itinerary whenever it is longer than the
//! current threshold, then raises the threshold to that length. A
//! background task lowers the threshold by one on a fixed interval so that
//! progress keeps being reported while the search is stuck at one depth.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tracing::trace;

/// Default interval between threshold decays.
pub const DEFAULT_DECAY_INTERVAL: Duration = Duration::from_secs(60);

/// Shared "longest reported partial" counter.
///
/// Cheap to clone; all clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct Gauge(Arc<AtomicUsize>);

impl Gauge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current threshold.
    pub fn threshold(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }

    /// If `len` exceeds the threshold, raise the threshold to `len` and
    /// return `true`.
    pub fn raise_to(&self, len: usize) -> bool {
        self.0
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                (len > current).then_some(len)
            })
            .is_ok()
    }

    /// Lower the threshold by one, stopping at zero.
    pub fn decay(&self) {
        let _ = self
            .0
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                current.checked_sub(1)
            });
    }

    pub fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }

    /// Spawn a task on the current tokio runtime that decays the gauge every
    /// `every`.
    pub fn spawn_decay(&self, every: Duration) -> tokio::task::JoinHandle<()> {
        let gauge = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.tick().await; // First tick is immediate, skip it
            loop {
                interval.tick().await;
                gauge.decay();
                trace!(threshold = gauge.threshold(), "decayed progress threshold");
            }
        })
    }
}
