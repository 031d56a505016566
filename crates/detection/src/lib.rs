//! Statistical engines for SYN and UDP flood detection.
//!
//! The core is a non-parametric change-point detector: an exponential
//! smoothing forecaster over a sliding sample window produces a per-tick
//! deviation statistic, a CUSUM accumulator with an adaptive threshold
//! turns sustained deviations into an attack alarm, and a predictive
//! ending detector decides when the attack is over. A classic parametric
//! CUSUM over raw counts is available as an alternative.

mod config;
mod cusum;
mod detector;
mod ending;
mod fitting;
mod outlier;
mod parametric;
mod smoothing;
mod window;

pub use config::{DetectorConfig, FactorBounds, ParametricConfig};
pub use cusum::CusumAccumulator;
pub use detector::{AttackTrigger, ChangePointDetector, DetectorEvent, DetectorState, TickOutcome};
pub use ending::{EndingPhase, EndingPredictor, EndingSignal};
pub use outlier::OutlierGate;
pub use parametric::ParametricCusum;
pub use smoothing::{DoubleSmoothing, SingleSmoothing, Smoothing, SmoothingKind};
pub use window::SampleWindow;

#[cfg(test)]
mod tests;
