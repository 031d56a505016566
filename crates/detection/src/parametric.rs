//! Parametric CUSUM detector with a fixed threshold.

use crate::config::ParametricConfig;

/// CUSUM over raw per-interval counts with assumed mean drift and
/// variance.
///
/// Each update adds `(alpha * mu / sigma^2) * (value - mu - alpha * mu / 2)`
/// to the statistic, floored at zero, where `mu` is an exponentially
/// weighted mean of past counts. Crossing the fixed threshold flags an
/// attack for that tick and resets the statistic.
#[derive(Debug, Clone)]
pub struct ParametricCusum {
    threshold: f64,
    sigma_square: f64,
    alpha: f64,
    ewma_factor: f64,
    mu: f64,
    statistic: f64,
    under_attack: bool,
}

impl ParametricCusum {
    pub fn new(config: ParametricConfig) -> Self {
        Self {
            threshold: config.threshold,
            sigma_square: config.sigma * config.sigma,
            alpha: config.alpha,
            ewma_factor: config.ewma_factor,
            mu: 0.0,
            statistic: 0.0,
            under_attack: false,
        }
    }

    /// Feeds one raw count and returns the statistic after the update.
    pub fn update(&mut self, value: f64) -> f64 {
        let gain = self.alpha * self.mu / self.sigma_square;
        let shifted = value - self.mu - self.alpha * self.mu / 2.0;
        self.statistic = (self.statistic + gain * shifted).max(0.0);
        self.mu = self.ewma_factor * self.mu + (1.0 - self.ewma_factor) * value;
        if self.statistic > self.threshold {
            self.statistic = 0.0;
            self.under_attack = true;
        } else {
            self.under_attack = false;
        }
        self.statistic
    }

    /// Whether the threshold was crossed on the most recent update.
    pub fn under_attack(&self) -> bool {
        self.under_attack
    }

    pub fn statistic(&self) -> f64 {
        self.statistic
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}
