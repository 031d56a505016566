//! Change-point detector joining the outlier gate, the smoothing
//! forecaster and the CUSUM accumulator.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::DetectorConfig;
use crate::cusum::CusumAccumulator;
use crate::ending::EndingPredictor;
use crate::outlier::OutlierGate;
use crate::smoothing::Smoothing;
use crate::window::SampleWindow;

#[cfg(test)]
use crate::ending::EndingPhase;

/// Lifecycle state of one monitored metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    /// Filling the sample window and fitting the baseline model.
    Bootstrapping,
    Normal,
    Attack,
}

/// Which path declared the attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackTrigger {
    OutlierGate,
    Cusum,
}

/// State transition produced by a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorEvent {
    BootstrapComplete,
    AttackStarted { trigger: AttackTrigger },
    EndingPathSwitched,
    AttackEnded,
}

/// Per-tick reading returned by [`ChangePointDetector::update`].
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub statistic: f64,
    pub threshold: f64,
    pub under_attack: bool,
    pub events: Vec<DetectorEvent>,
}

/// Deviation data produced by one post-bootstrap tick.
#[derive(Debug, Clone, Copy)]
struct SmoothedTick {
    deviation: f64,
    level: f64,
    level_factor: f64,
}

/// Non-parametric change-point detector for one traffic metric.
///
/// A tick passes through three stages: the fast outlier gate on the raw
/// sample, the sliding-window forecaster producing the deviation
/// statistic, and the CUSUM accumulation with its adaptive threshold.
/// An ongoing attack is handed to an [`EndingPredictor`] until it
/// confirms the end, which resets statistic and threshold to zero.
///
/// The first `window_size` samples only fill the window. On the tick the
/// window becomes full the baseline model is fitted and sigma seeded
/// from the window contents; deviations start flowing the tick after.
#[derive(Debug)]
pub struct ChangePointDetector {
    config: DetectorConfig,
    state: DetectorState,
    window: SampleWindow,
    model: Option<Smoothing>,
    sigma: f64,
    deviation: f64,
    outlier: OutlierGate,
    cusum: CusumAccumulator,
    ending: Option<EndingPredictor>,
    rng: StdRng,
}

impl ChangePointDetector {
    pub fn new(config: DetectorConfig) -> Self {
        let window = SampleWindow::new(config.window_size);
        let outlier = OutlierGate::new(config.outlier_threshold, config.start_alarm_delay);
        let cusum = CusumAccumulator::new(config.start_alarm_delay);
        let rng = StdRng::seed_from_u64(config.fit_seed);
        Self {
            config,
            state: DetectorState::Bootstrapping,
            window,
            model: None,
            sigma: 0.0,
            deviation: 0.0,
            outlier,
            cusum,
            ending: None,
            rng,
        }
    }

    /// Feeds one per-interval sample and returns the tick reading.
    pub fn update(&mut self, value: f64) -> TickOutcome {
        let mut events = Vec::new();

        if self.outlier.observe(value, self.under_attack()) {
            self.enter_attack(AttackTrigger::OutlierGate, &mut events);
        }

        if let Some(tick) = self.advance_baseline(value, &mut events) {
            self.run_cusum(tick, value, &mut events);
        }

        TickOutcome {
            statistic: self.cusum.statistic(),
            threshold: self.cusum.threshold(),
            under_attack: self.under_attack(),
            events,
        }
    }

    pub fn state(&self) -> DetectorState {
        self.state
    }

    pub fn under_attack(&self) -> bool {
        self.state == DetectorState::Attack
    }

    pub fn statistic(&self) -> f64 {
        self.cusum.statistic()
    }

    pub fn threshold(&self) -> f64 {
        self.cusum.threshold()
    }

    /// Deviation statistic of the most recent completed tick.
    pub fn deviation(&self) -> f64 {
        self.deviation
    }

    /// Current smoothed deviation scale.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Slides the window and, once bootstrapped, produces this tick's
    /// deviation. The bootstrap-completing tick itself produces nothing.
    fn advance_baseline(
        &mut self,
        value: f64,
        events: &mut Vec<DetectorEvent>,
    ) -> Option<SmoothedTick> {
        self.window.push(value);
        let Some(model) = self.model.as_mut() else {
            if self.window.is_full() {
                self.finish_bootstrap(events);
            }
            return None;
        };

        let window_mean = self.window.mean();
        let last_level = model.smoothed_value();
        let last_sigma_sq = self.sigma * self.sigma;
        model.forecast(window_mean);
        let level = model.smoothed_value();
        let level_factor = model.level_factor();
        self.sigma = (level_factor * last_sigma_sq
            + (1.0 - level_factor) * (window_mean - last_level).powi(2))
        .sqrt();
        let deviation = window_mean - last_level - 3.0 * last_sigma_sq;
        self.deviation = deviation;
        Some(SmoothedTick {
            deviation,
            level,
            level_factor,
        })
    }

    fn finish_bootstrap(&mut self, events: &mut Vec<DetectorEvent>) {
        let training = self.window.to_vec();
        self.model = Some(Smoothing::fit(
            self.config.smoothing,
            &training,
            self.config.level_bounds,
            self.config.trend_bounds,
            &mut self.rng,
        ));
        self.sigma = self.window.population_std_dev();
        if self.state == DetectorState::Bootstrapping {
            self.state = DetectorState::Normal;
        }
        events.push(DetectorEvent::BootstrapComplete);
    }

    /// Start and stop handling for one deviation tick. Deviations only
    /// flow once the model is fitted, so the state here is never
    /// `Bootstrapping`.
    fn run_cusum(&mut self, tick: SmoothedTick, value: f64, events: &mut Vec<DetectorEvent>) {
        self.cusum.accumulate(tick.deviation);

        if !self.under_attack() {
            if tick.deviation > 0.0 && self.cusum.adapt_and_check(tick.deviation) {
                self.enter_attack(AttackTrigger::Cusum, events);
                if let Some(predictor) = self.ending.as_mut() {
                    predictor.observe(
                        tick.deviation,
                        tick.level,
                        value,
                        tick.level_factor,
                        &mut self.rng,
                    );
                }
            }
            return;
        }

        let Some(predictor) = self.ending.as_mut() else {
            return;
        };
        let signal = predictor.observe(
            tick.deviation,
            tick.level,
            value,
            tick.level_factor,
            &mut self.rng,
        );
        if signal.switched_path {
            events.push(DetectorEvent::EndingPathSwitched);
        }
        if signal.attack_over {
            self.cusum.reset();
            self.ending = None;
            self.state = DetectorState::Normal;
            events.push(DetectorEvent::AttackEnded);
        }
    }

    fn enter_attack(&mut self, trigger: AttackTrigger, events: &mut Vec<DetectorEvent>) {
        self.state = DetectorState::Attack;
        self.ending = Some(EndingPredictor::new(
            self.config.stop_alarm_delay,
            self.config.level_bounds,
            self.config.trend_bounds,
        ));
        events.push(DetectorEvent::AttackStarted { trigger });
    }

    #[cfg(test)]
    pub(crate) fn debug_outlier_count(&self) -> u32 {
        self.outlier.count()
    }

    #[cfg(test)]
    pub(crate) fn debug_ending_phase(&self) -> Option<EndingPhase> {
        self.ending.as_ref().map(|predictor| predictor.phase())
    }
}
