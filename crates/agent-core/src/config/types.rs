use detection::{DetectorConfig, ParametricConfig};

/// Fully resolved agent configuration.
///
/// Built by [`AgentConfig::load`]: defaults first, then the optional
/// TOML file, then environment overrides, then validation.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Seconds between counter snapshots in live mode.
    pub interval_secs: u64,
    /// Change-point detector tuning shared by both monitors.
    pub detection: DetectorConfig,
    /// Trailing window length for the UDP rolling mean.
    pub udp_mean_window: usize,
    /// Multiplier applied to the UDP rolling mean before the excess test.
    pub udp_factor: f64,
    /// Run the parametric CUSUM instead of the change-point detector.
    pub parametric_mode: bool,
    /// Parametric CUSUM tuning, used when `parametric_mode` is set.
    pub parametric: ParametricConfig,
    pub telemetry_enabled: bool,
    pub telemetry_url: String,
    /// Replay a recorded trace instead of sampling live counters.
    pub trace_path: Option<String>,
}
