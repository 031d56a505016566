//! Bounded in-memory queue for metric points awaiting export.

use std::collections::VecDeque;

use crate::point::MetricPoint;

/// FIFO buffer with a point-count cap; the oldest points are dropped
/// first once the cap is reached.
#[derive(Debug)]
pub struct MetricBuffer {
    points: VecDeque<MetricPoint>,
    cap_points: usize,
    dropped: u64,
}

impl MetricBuffer {
    pub fn new(cap_points: usize) -> Self {
        Self {
            points: VecDeque::new(),
            cap_points,
            dropped: 0,
        }
    }

    pub fn enqueue(&mut self, point: MetricPoint) {
        if self.cap_points == 0 {
            self.dropped = self.dropped.saturating_add(1);
            return;
        }
        while self.points.len() >= self.cap_points {
            self.points.pop_front();
            self.dropped = self.dropped.saturating_add(1);
        }
        self.points.push_back(point);
    }

    /// Removes and returns up to `max` of the oldest points.
    pub fn drain_batch(&mut self, max: usize) -> Vec<MetricPoint> {
        let take = max.min(self.points.len());
        self.points.drain(..take).collect()
    }

    pub fn pending(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points dropped to make room since the buffer was created.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
