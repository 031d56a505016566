//! Shared per-interval packet counters.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Counts observed in one sampling interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntervalCounters {
    pub syn: u64,
    pub synack: u64,
    pub udp: u64,
}

/// Counter handle shared between capture callbacks and the sampling
/// loop.
///
/// Writers bump individual counters; the sampling loop reads and zeroes
/// all of them in one step, so no packet is counted in two intervals.
#[derive(Debug, Clone, Default)]
pub struct SharedCounters {
    inner: Arc<Mutex<IntervalCounters>>,
}

impl SharedCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_syn(&self) {
        let mut counters = self.lock();
        counters.syn = counters.syn.saturating_add(1);
    }

    pub fn record_synack(&self) {
        let mut counters = self.lock();
        counters.synack = counters.synack.saturating_add(1);
    }

    pub fn record_udp(&self) {
        let mut counters = self.lock();
        counters.udp = counters.udp.saturating_add(1);
    }

    /// Returns the counts of the interval just ended and zeroes them.
    pub fn snapshot_and_reset(&self) -> IntervalCounters {
        let mut counters = self.lock();
        std::mem::take(&mut *counters)
    }

    // A writer that panicked mid-increment cannot leave the counters in
    // a torn state, so a poisoned guard is safe to keep using.
    fn lock(&self) -> MutexGuard<'_, IntervalCounters> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_returns_counts_exactly_once() {
        let counters = SharedCounters::new();
        counters.record_syn();
        counters.record_syn();
        counters.record_synack();
        counters.record_udp();

        let snapshot = counters.snapshot_and_reset();
        assert_eq!(
            snapshot,
            IntervalCounters {
                syn: 2,
                synack: 1,
                udp: 1
            }
        );
        assert_eq!(counters.snapshot_and_reset(), IntervalCounters::default());
    }

    #[test]
    fn clones_share_the_same_counters() {
        let counters = SharedCounters::new();
        let writer = counters.clone();
        writer.record_udp();
        writer.record_udp();
        assert_eq!(counters.snapshot_and_reset().udp, 2);
    }

    #[test]
    fn concurrent_writers_lose_nothing_across_snapshots() {
        let counters = SharedCounters::new();
        let mut handles = Vec::new();
        for _ in 0..4 {
            let writer = counters.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..1000 {
                    writer.record_syn();
                }
            }));
        }
        let reader = counters.clone();
        let drained = std::thread::spawn(move || {
            let mut total = 0;
            for _ in 0..50 {
                total += reader.snapshot_and_reset().syn;
                std::thread::yield_now();
            }
            total
        });
        for handle in handles {
            handle.join().expect("writer thread");
        }
        let mid_drain = drained.join().expect("reader thread");
        let total = mid_drain + counters.snapshot_and_reset().syn;
        assert_eq!(total, 4000);
    }
}
