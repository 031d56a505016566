//! Tuning for the detection engines.

use serde::{Deserialize, Serialize};

use crate::smoothing::SmoothingKind;

/// Closed interval constraining a fitted smoothing factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorBounds {
    pub low: f64,
    pub high: f64,
}

impl FactorBounds {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

/// Tuning for one change-point detector instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Sliding window length; also the bootstrap training size.
    pub window_size: usize,
    /// Ticks of start evidence needed before an attack is declared.
    pub start_alarm_delay: u32,
    /// Ticks of ending evidence needed before an attack is declared over.
    pub stop_alarm_delay: u32,
    /// Raw-sample level feeding the fast outlier gate.
    pub outlier_threshold: f64,
    /// Bounds for the fitted level smoothing factor.
    pub level_bounds: FactorBounds,
    /// Bounds for the fitted trend smoothing factor.
    pub trend_bounds: FactorBounds,
    /// Smoothing variant backing the traffic baseline.
    pub smoothing: SmoothingKind,
    /// Seed for the fit starting point; a fixed seed makes runs reproducible.
    pub fit_seed: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_size: 3,
            start_alarm_delay: 4,
            stop_alarm_delay: 4,
            outlier_threshold: 0.65,
            level_bounds: FactorBounds::new(0.95, 0.99),
            trend_bounds: FactorBounds::new(0.0, 1.0),
            smoothing: SmoothingKind::Double,
            fit_seed: 0,
        }
    }
}

/// Tuning for the parametric CUSUM detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParametricConfig {
    /// Fixed alarm threshold for the running statistic.
    pub threshold: f64,
    /// Assumed standard deviation of the per-interval counts.
    pub sigma: f64,
    /// Expected relative mean shift under attack.
    pub alpha: f64,
    /// Weight of history in the exponentially weighted mean.
    pub ewma_factor: f64,
}

impl Default for ParametricConfig {
    fn default() -> Self {
        Self {
            threshold: 10.0,
            sigma: 100.0,
            alpha: 0.5,
            ewma_factor: 0.98,
        }
    }
}
