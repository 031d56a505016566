use detection::{
    AttackTrigger, ChangePointDetector, DetectorConfig, DetectorEvent, ParametricConfig,
    ParametricCusum, TickOutcome,
};

/// One monitored metric: the change-point detector or the parametric
/// CUSUM, chosen at startup.
pub(crate) enum FloodMonitor {
    ChangePoint(ChangePointDetector),
    Parametric(ParametricCusum),
}

impl FloodMonitor {
    pub(crate) fn change_point(config: DetectorConfig) -> Self {
        Self::ChangePoint(ChangePointDetector::new(config))
    }

    pub(crate) fn parametric(config: ParametricConfig) -> Self {
        Self::Parametric(ParametricCusum::new(config))
    }

    /// Whether this monitor models raw per-interval counts instead of
    /// the derived samples.
    pub(crate) fn is_parametric(&self) -> bool {
        matches!(self, Self::Parametric(_))
    }

    /// Feeds one interval sample and reports the tick in the detector's
    /// outcome shape. The parametric CUSUM has no ending machinery, so
    /// each threshold crossing surfaces as a fresh attack start.
    pub(crate) fn update(&mut self, sample: f64) -> TickOutcome {
        match self {
            Self::ChangePoint(detector) => detector.update(sample),
            Self::Parametric(cusum) => {
                let statistic = cusum.update(sample);
                let mut events = Vec::new();
                if cusum.under_attack() {
                    events.push(DetectorEvent::AttackStarted {
                        trigger: AttackTrigger::Cusum,
                    });
                }
                TickOutcome {
                    statistic,
                    threshold: cusum.threshold(),
                    under_attack: cusum.under_attack(),
                    events,
                }
            }
        }
    }

    pub(crate) fn under_attack(&self) -> bool {
        match self {
            Self::ChangePoint(detector) => detector.under_attack(),
            Self::Parametric(cusum) => cusum.under_attack(),
        }
    }
}
