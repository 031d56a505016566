//! Exponential smoothing models backing the traffic forecaster.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::config::FactorBounds;
use crate::fitting::minimize_bounded;

/// Smoothing variant used for a traffic baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmoothingKind {
    /// Single exponential smoothing; multi-step projections stay level.
    Single,
    /// Holt double exponential smoothing with a trend component.
    Double,
}

/// A fitted exponential smoothing model.
///
/// `forecast` folds one observation into the state and returns the new
/// smoothed value; `forecast_for` projects ahead on a copy without
/// advancing the model.
#[derive(Debug, Clone)]
pub enum Smoothing {
    Single(SingleSmoothing),
    Double(DoubleSmoothing),
}

#[derive(Debug, Clone)]
pub struct SingleSmoothing {
    level: f64,
    factor: f64,
}

#[derive(Debug, Clone)]
pub struct DoubleSmoothing {
    level: f64,
    trend: f64,
    level_factor: f64,
    trend_factor: f64,
}

impl Smoothing {
    /// Fits a model on a training series.
    ///
    /// The initial level is the series mean; the double variant also takes
    /// the average first-to-last slope as its initial trend. Factors are
    /// picked by minimizing the one-step squared forecast error over the
    /// series, constrained to the given bounds. The model is returned in
    /// its initial state, not advanced through the series.
    pub fn fit(
        kind: SmoothingKind,
        training: &[f64],
        level_bounds: FactorBounds,
        trend_bounds: FactorBounds,
        rng: &mut StdRng,
    ) -> Self {
        let level = series_mean(training);
        match kind {
            SmoothingKind::Single => {
                let best = minimize_bounded(
                    |factors| {
                        Smoothing::Single(SingleSmoothing {
                            level,
                            factor: factors[0],
                        })
                        .training_cost(training)
                    },
                    &[(level_bounds.low, level_bounds.high)],
                    rng,
                );
                Smoothing::Single(SingleSmoothing {
                    level,
                    factor: best[0],
                })
            }
            SmoothingKind::Double => {
                let trend = initial_trend(training);
                let best = minimize_bounded(
                    |factors| {
                        Smoothing::Double(DoubleSmoothing {
                            level,
                            trend,
                            level_factor: factors[0],
                            trend_factor: factors[1],
                        })
                        .training_cost(training)
                    },
                    &[
                        (level_bounds.low, level_bounds.high),
                        (trend_bounds.low, trend_bounds.high),
                    ],
                    rng,
                );
                Smoothing::Double(DoubleSmoothing {
                    level,
                    trend,
                    level_factor: best[0],
                    trend_factor: best[1],
                })
            }
        }
    }

    /// Folds one observation into the model and returns the smoothed value.
    pub fn forecast(&mut self, value: f64) -> f64 {
        match self {
            Smoothing::Single(model) => model.forecast(value),
            Smoothing::Double(model) => model.forecast(value),
        }
    }

    /// Current smoothed value, without advancing the model.
    pub fn smoothed_value(&self) -> f64 {
        match self {
            Smoothing::Single(model) => model.level,
            Smoothing::Double(model) => model.level + model.trend,
        }
    }

    /// Weight the model places on new observations when updating its level.
    pub fn level_factor(&self) -> f64 {
        match self {
            Smoothing::Single(model) => model.factor,
            Smoothing::Double(model) => model.level_factor,
        }
    }

    /// Projects the next `steps` smoothed values by feeding the model its
    /// own output. Runs on a copy; calling it twice gives the same path.
    pub fn forecast_for(&self, steps: usize) -> Vec<f64> {
        let mut scratch = self.clone();
        let mut projection = Vec::with_capacity(steps);
        for _ in 0..steps {
            let next = scratch.smoothed_value();
            projection.push(scratch.forecast(next));
        }
        projection
    }

    /// One-step squared forecast error accumulated over a series.
    /// Non-finite totals collapse to `f64::MAX`.
    fn training_cost(mut self, training: &[f64]) -> f64 {
        let mut cost = 0.0;
        for &value in training {
            let err = value - self.smoothed_value();
            cost += err * err;
            self.forecast(value);
        }
        if cost.is_finite() {
            cost
        } else {
            f64::MAX
        }
    }
}

impl SingleSmoothing {
    fn forecast(&mut self, value: f64) -> f64 {
        self.level = self.factor * value + (1.0 - self.factor) * self.level;
        self.level
    }
}

impl DoubleSmoothing {
    fn forecast(&mut self, value: f64) -> f64 {
        let last_level = self.level;
        self.level =
            self.level_factor * value + (1.0 - self.level_factor) * (self.level + self.trend);
        self.trend = self.trend_factor * (self.level - last_level)
            + (1.0 - self.trend_factor) * self.trend;
        self.level + self.trend
    }
}

fn series_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn initial_trend(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    (values[values.len() - 1] - values[0]) / (values.len() - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn pinned(value: f64) -> FactorBounds {
        FactorBounds::new(value, value)
    }

    #[test]
    fn single_recursion_matches_hand_computation() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut model = Smoothing::fit(
            SmoothingKind::Single,
            &[1.0, 1.0, 1.0],
            pinned(0.5),
            pinned(0.5),
            &mut rng,
        );
        assert!((model.smoothed_value() - 1.0).abs() < 1e-12);
        assert!((model.forecast(2.0) - 1.5).abs() < 1e-12);
        assert!((model.forecast(2.0) - 1.75).abs() < 1e-12);
    }

    #[test]
    fn double_recursion_matches_hand_computation() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut model = Smoothing::fit(
            SmoothingKind::Double,
            &[1.0, 2.0, 3.0],
            pinned(0.5),
            pinned(0.5),
            &mut rng,
        );
        // initial state: level 2, trend 1
        assert!((model.smoothed_value() - 3.0).abs() < 1e-12);
        // level 0.5*4 + 0.5*3 = 3.5, trend 0.5*1.5 + 0.5*1 = 1.25
        assert!((model.forecast(4.0) - 4.75).abs() < 1e-12);
    }

    #[test]
    fn projection_leaves_the_model_untouched() {
        let mut rng = StdRng::seed_from_u64(9);
        let model = Smoothing::fit(
            SmoothingKind::Double,
            &[1.0, 2.0, 4.0, 7.0],
            FactorBounds::new(0.95, 0.99),
            FactorBounds::new(0.0, 1.0),
            &mut rng,
        );
        let before = model.smoothed_value();
        let first = model.forecast_for(5);
        let second = model.forecast_for(5);
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
        assert!((model.smoothed_value() - before).abs() < 1e-12);
    }

    #[test]
    fn single_projection_stays_level() {
        let mut rng = StdRng::seed_from_u64(3);
        let model = Smoothing::fit(
            SmoothingKind::Single,
            &[2.0, 2.0, 2.0],
            pinned(0.97),
            pinned(0.97),
            &mut rng,
        );
        for value in model.forecast_for(4) {
            assert!((value - model.smoothed_value()).abs() < 1e-12);
        }
    }

    #[test]
    fn fitted_factors_respect_bounds_for_overflowing_series() {
        let mut rng = StdRng::seed_from_u64(17);
        let series = [1e300, -1e300, 1e300, -1e300];
        let model = Smoothing::fit(
            SmoothingKind::Double,
            &series,
            FactorBounds::new(0.95, 0.99),
            FactorBounds::new(0.0, 1.0),
            &mut rng,
        );
        assert!(FactorBounds::new(0.95, 0.99).contains(model.level_factor()));
    }

    #[test]
    fn refitting_with_the_same_seed_reproduces_factors() {
        let series = [0.4, 0.9, 0.3, 1.4, 0.8];
        let first = Smoothing::fit(
            SmoothingKind::Double,
            &series,
            FactorBounds::new(0.95, 0.99),
            FactorBounds::new(0.0, 1.0),
            &mut StdRng::seed_from_u64(21),
        );
        let second = Smoothing::fit(
            SmoothingKind::Double,
            &series,
            FactorBounds::new(0.95, 0.99),
            FactorBounds::new(0.0, 1.0),
            &mut StdRng::seed_from_u64(21),
        );
        assert_eq!(first.level_factor(), second.level_factor());
    }
}
