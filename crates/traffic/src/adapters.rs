//! Adapters turning per-interval counts into detector samples.

use std::collections::VecDeque;

use crate::counters::IntervalCounters;

/// Share of SYN segments that never saw a matching SYN-ACK, in [0, 1].
/// Zero when the interval carried no SYN at all.
pub fn syn_asymmetry(counters: &IntervalCounters) -> f64 {
    if counters.syn == 0 {
        return 0.0;
    }
    let unanswered = counters.syn as f64 - counters.synack as f64;
    (unanswered / counters.syn as f64).max(0.0)
}

/// Relative excess of the UDP count over its trailing mean.
///
/// The trailing window only extends while traffic is normal. During an
/// attack it is frozen and the mean keeps the full-window denominator,
/// which biases the reference low until the attack is over.
#[derive(Debug, Clone)]
pub struct UdpDeviation {
    window: VecDeque<u64>,
    capacity: usize,
    factor: f64,
}

impl UdpDeviation {
    pub fn new(capacity: usize, factor: f64) -> Self {
        Self {
            window: VecDeque::with_capacity(capacity + 1),
            capacity,
            factor,
        }
    }

    /// Feeds one interval's UDP count and returns the deviation sample.
    pub fn sample(&mut self, udp_count: u64, under_attack: bool) -> f64 {
        let mean = if under_attack {
            self.frozen_mean()
        } else {
            self.window.push_back(udp_count);
            while self.window.len() > self.capacity {
                self.window.pop_front();
            }
            self.rolling_mean()
        };

        if udp_count == 0 {
            return 0.0;
        }
        let excess = udp_count as f64 - mean * self.factor;
        if excess > 0.0 {
            excess / udp_count as f64
        } else {
            0.0
        }
    }

    fn rolling_mean(&self) -> f64 {
        if self.window.is_empty() {
            return 0.0;
        }
        self.window.iter().sum::<u64>() as f64 / self.window.len() as f64
    }

    fn frozen_mean(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.window.iter().sum::<u64>() as f64 / self.capacity as f64
    }

    #[cfg(test)]
    pub(crate) fn window_len(&self) -> usize {
        self.window.len()
    }
}
