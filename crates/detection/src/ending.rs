//! Predictive detector for the end of an ongoing attack.

use rand::rngs::StdRng;

use crate::config::FactorBounds;
use crate::smoothing::{Smoothing, SmoothingKind};

/// Where the predictor currently is in its ending decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndingPhase {
    /// Buffering deviation and level samples for the forecast models.
    Collecting,
    /// Counting consecutive non-positive deviations.
    ZSign,
    /// Counting abrupt drops of the raw traffic value.
    AbruptDecrease,
}

/// Outcome of feeding one attack tick to the predictor.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndingSignal {
    /// The predictor moved to the abrupt-decrease test this tick.
    pub switched_path: bool,
    /// Enough consecutive ending evidence accumulated; the attack is over.
    pub attack_over: bool,
}

/// Decides when an ongoing attack has ended.
///
/// While collecting, the predictor buffers the deviation statistic and
/// the forecaster level of each attack tick. Once `stop_alarm_delay`
/// pairs are buffered it fits one double-smoothing model per series and
/// starts counting ending evidence: consecutive non-positive deviations
/// by default, or abrupt drops of the raw value once the projections show
/// levels still climbing while a projected deviation goes negative. The
/// drop test is permanent once entered.
#[derive(Debug, Clone)]
pub struct EndingPredictor {
    stop_alarm_delay: u32,
    level_bounds: FactorBounds,
    trend_bounds: FactorBounds,
    phase: EndingPhase,
    deviation_samples: Vec<f64>,
    level_samples: Vec<f64>,
    deviation_model: Option<Smoothing>,
    level_model: Option<Smoothing>,
    deviation_run: u32,
    drop_run: u32,
    delta: f64,
}

impl EndingPredictor {
    pub fn new(stop_alarm_delay: u32, level_bounds: FactorBounds, trend_bounds: FactorBounds) -> Self {
        Self {
            stop_alarm_delay,
            level_bounds,
            trend_bounds,
            phase: EndingPhase::Collecting,
            deviation_samples: Vec::new(),
            level_samples: Vec::new(),
            deviation_model: None,
            level_model: None,
            deviation_run: 0,
            drop_run: 0,
            delta: 0.0,
        }
    }

    pub fn phase(&self) -> EndingPhase {
        self.phase
    }

    /// Feeds one attack tick.
    ///
    /// `deviation` and `level` are this tick's statistic inputs,
    /// `window_value` the current raw sample and `level_factor` the main
    /// model's level weight, which decays the drop reference.
    pub fn observe(
        &mut self,
        deviation: f64,
        level: f64,
        window_value: f64,
        level_factor: f64,
        rng: &mut StdRng,
    ) -> EndingSignal {
        let mut signal = EndingSignal::default();
        match self.phase {
            EndingPhase::Collecting => {
                self.collect(deviation, level, rng);
            }
            EndingPhase::ZSign | EndingPhase::AbruptDecrease => {
                self.advance_models(deviation, level);
                if self.phase == EndingPhase::ZSign && self.should_switch_to_drop_test() {
                    self.phase = EndingPhase::AbruptDecrease;
                    self.delta = window_value;
                    signal.switched_path = true;
                }
                signal.attack_over = match self.phase {
                    EndingPhase::ZSign => self.count_deviation_sign(deviation),
                    EndingPhase::AbruptDecrease => {
                        self.count_abrupt_drop(window_value, level_factor)
                    }
                    EndingPhase::Collecting => false,
                };
            }
        }
        signal
    }

    fn collect(&mut self, deviation: f64, level: f64, rng: &mut StdRng) {
        let capacity = self.stop_alarm_delay as usize;
        if self.deviation_samples.len() < capacity {
            self.deviation_samples.push(deviation);
        }
        if self.level_samples.len() < capacity {
            self.level_samples.push(level);
        }
        if self.deviation_samples.len() >= capacity && self.level_samples.len() >= capacity {
            self.deviation_model = Some(Smoothing::fit(
                SmoothingKind::Double,
                &self.deviation_samples,
                self.level_bounds,
                self.trend_bounds,
                rng,
            ));
            self.level_model = Some(Smoothing::fit(
                SmoothingKind::Double,
                &self.level_samples,
                self.level_bounds,
                self.trend_bounds,
                rng,
            ));
            self.deviation_samples.clear();
            self.level_samples.clear();
            self.phase = EndingPhase::ZSign;
        }
    }

    fn advance_models(&mut self, deviation: f64, level: f64) {
        if let Some(model) = self.deviation_model.as_mut() {
            model.forecast(deviation);
        }
        if let Some(model) = self.level_model.as_mut() {
            model.forecast(level);
        }
    }

    /// Projected levels strictly climbing while some projected deviation
    /// turns negative.
    fn should_switch_to_drop_test(&self) -> bool {
        let steps = self.stop_alarm_delay as usize;
        let (Some(deviation_model), Some(level_model)) =
            (&self.deviation_model, &self.level_model)
        else {
            return false;
        };
        if !strictly_increasing(&level_model.forecast_for(steps)) {
            return false;
        }
        deviation_model
            .forecast_for(steps)
            .iter()
            .any(|value| *value < 0.0)
    }

    fn count_deviation_sign(&mut self, deviation: f64) -> bool {
        if deviation <= 0.0 {
            self.deviation_run += 1;
        }
        self.deviation_run >= self.stop_alarm_delay
    }

    fn count_abrupt_drop(&mut self, window_value: f64, level_factor: f64) -> bool {
        if self.delta - window_value >= self.delta {
            self.drop_run += 1;
        } else {
            self.delta = level_factor * self.delta + (1.0 - level_factor) * window_value;
            if self.drop_run > 0 {
                self.drop_run -= 1;
            }
        }
        self.drop_run >= self.stop_alarm_delay
    }
}

fn strictly_increasing(values: &[f64]) -> bool {
    values.windows(2).all(|pair| pair[0] < pair[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn predictor(stop_alarm_delay: u32) -> EndingPredictor {
        EndingPredictor::new(
            stop_alarm_delay,
            FactorBounds::new(0.95, 0.99),
            FactorBounds::new(0.0, 1.0),
        )
    }

    #[test]
    fn collects_before_forecasting() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut ending = predictor(3);
        for _ in 0..2 {
            let signal = ending.observe(0.5, 1.0, 1.0, 0.97, &mut rng);
            assert!(!signal.attack_over);
            assert_eq!(ending.phase(), EndingPhase::Collecting);
        }
        ending.observe(0.5, 1.0, 1.0, 0.97, &mut rng);
        assert_eq!(ending.phase(), EndingPhase::ZSign);
    }

    #[test]
    fn consecutive_non_positive_deviations_end_the_attack() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut ending = predictor(3);
        for _ in 0..3 {
            ending.observe(0.0, 1.0, 1.0, 0.97, &mut rng);
        }
        assert_eq!(ending.phase(), EndingPhase::ZSign);
        assert!(!ending.observe(0.0, 1.0, 1.0, 0.97, &mut rng).attack_over);
        assert!(!ending.observe(-0.1, 1.0, 1.0, 0.97, &mut rng).attack_over);
        assert!(ending.observe(0.0, 1.0, 1.0, 0.97, &mut rng).attack_over);
    }

    #[test]
    fn positive_deviation_does_not_clear_the_run() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut ending = predictor(3);
        for _ in 0..3 {
            ending.observe(0.2, 1.0, 1.0, 0.97, &mut rng);
        }
        assert!(!ending.observe(-0.1, 1.0, 1.0, 0.97, &mut rng).attack_over);
        assert!(!ending.observe(5.0, 1.0, 1.0, 0.97, &mut rng).attack_over);
        assert!(!ending.observe(-0.1, 1.0, 1.0, 0.97, &mut rng).attack_over);
        assert!(ending.observe(-0.1, 1.0, 1.0, 0.97, &mut rng).attack_over);
    }

    #[test]
    fn switches_to_the_drop_test_when_projected_levels_keep_climbing() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut ending = predictor(3);
        ending.observe(0.5, 1.0, 9.0, 0.97, &mut rng);
        ending.observe(0.2, 2.0, 9.0, 0.97, &mut rng);
        ending.observe(-0.4, 3.0, 9.0, 0.97, &mut rng);
        assert_eq!(ending.phase(), EndingPhase::ZSign);

        let signal = ending.observe(-0.5, 4.0, 5.0, 0.97, &mut rng);
        assert!(signal.switched_path);
        assert!(!signal.attack_over);
        assert_eq!(ending.phase(), EndingPhase::AbruptDecrease);

        assert!(!ending.observe(-0.5, 5.0, 0.0, 0.97, &mut rng).attack_over);
        assert!(!ending.observe(-0.5, 5.0, 0.0, 0.97, &mut rng).attack_over);
        assert!(ending.observe(-0.5, 5.0, 0.0, 0.97, &mut rng).attack_over);
    }

    #[test]
    fn soft_declines_decay_the_drop_reference_instead_of_counting() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut ending = predictor(3);
        ending.observe(0.5, 1.0, 9.0, 0.97, &mut rng);
        ending.observe(0.2, 2.0, 9.0, 0.97, &mut rng);
        ending.observe(-0.4, 3.0, 9.0, 0.97, &mut rng);
        let signal = ending.observe(-0.5, 4.0, 5.0, 0.97, &mut rng);
        assert!(signal.switched_path);

        // a mild decline never satisfies the drop test with a positive reference
        for _ in 0..6 {
            assert!(!ending.observe(-0.5, 5.0, 4.0, 0.5, &mut rng).attack_over);
        }
    }
}
