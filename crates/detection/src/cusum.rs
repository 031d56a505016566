//! Cumulative-sum accumulator with a self-scaling alarm threshold.

/// Running CUSUM statistic over the per-tick deviation, floored at zero,
/// plus the adaptive threshold it is compared against.
///
/// The threshold starts unset. On each tick with positive deviation while
/// traffic is normal it moves toward `deviation * start_alarm_delay`: the
/// first such tick sets it outright, later ticks average the previous
/// threshold with the new weighted deviation.
#[derive(Debug, Clone)]
pub struct CusumAccumulator {
    statistic: f64,
    threshold: f64,
    start_alarm_delay: u32,
}

impl CusumAccumulator {
    pub fn new(start_alarm_delay: u32) -> Self {
        Self {
            statistic: 0.0,
            threshold: 0.0,
            start_alarm_delay,
        }
    }

    /// Adds one deviation to the running statistic, flooring at zero.
    /// A non-finite result collapses back to zero.
    pub fn accumulate(&mut self, deviation: f64) -> f64 {
        self.statistic = (self.statistic + deviation).max(0.0);
        if !self.statistic.is_finite() {
            self.statistic = 0.0;
        }
        self.statistic
    }

    /// Adapts the threshold for a positive deviation and reports whether
    /// the statistic now violates it.
    pub fn adapt_and_check(&mut self, deviation: f64) -> bool {
        let weighted = deviation * f64::from(self.start_alarm_delay);
        self.threshold = if self.threshold == 0.0 {
            weighted
        } else {
            self.threshold / 2.0 + weighted / 2.0
        };
        self.statistic >= self.threshold
    }

    /// Clears both the statistic and the threshold.
    pub fn reset(&mut self) {
        self.statistic = 0.0;
        self.threshold = 0.0;
    }

    pub fn statistic(&self) -> f64 {
        self.statistic
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}
