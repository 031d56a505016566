use detection::{DetectorConfig, ParametricConfig};

use super::types::AgentConfig;

pub(super) const DEFAULT_CONFIG_FILE: &str = "floodwatch.toml";

const DEFAULT_INTERVAL_SECS: u64 = 5;
const DEFAULT_UDP_MEAN_WINDOW: usize = 10;
const DEFAULT_UDP_FACTOR: f64 = 1.2;
const DEFAULT_TELEMETRY_URL: &str = "http://127.0.0.1:8086/write?db=floodwatch";

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            detection: DetectorConfig::default(),
            udp_mean_window: DEFAULT_UDP_MEAN_WINDOW,
            udp_factor: DEFAULT_UDP_FACTOR,
            parametric_mode: false,
            parametric: ParametricConfig::default(),
            telemetry_enabled: false,
            telemetry_url: DEFAULT_TELEMETRY_URL.to_string(),
            trace_path: None,
        }
    }
}
