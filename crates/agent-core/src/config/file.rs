use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use detection::FactorBounds;

use super::defaults::DEFAULT_CONFIG_FILE;
use super::types::AgentConfig;
use super::util::{env_non_empty, non_empty};

impl AgentConfig {
    /// Overlays the TOML config file, if one is configured or present.
    pub(super) fn apply_file_config(&mut self) -> Result<bool> {
        let Some(path) = resolve_config_path() else {
            return Ok(false);
        };

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed reading config file {}", path.display()))?;
        let file_cfg: FileConfig = toml::from_str(&raw)
            .with_context(|| format!("failed parsing TOML config {}", path.display()))?;

        self.apply_file_agent(file_cfg.agent);
        self.apply_file_detection(file_cfg.detection);
        self.apply_file_udp(file_cfg.udp);
        self.apply_file_parametric(file_cfg.parametric);
        self.apply_file_telemetry(file_cfg.telemetry);
        self.apply_file_source(file_cfg.source);

        Ok(true)
    }

    fn apply_file_agent(&mut self, agent: Option<FileAgentConfig>) {
        let Some(agent) = agent else {
            return;
        };

        if let Some(v) = agent.interval_secs {
            self.interval_secs = v;
        }
    }

    fn apply_file_detection(&mut self, detection: Option<FileDetectionConfig>) {
        let Some(detection) = detection else {
            return;
        };

        if let Some(v) = detection.window_size {
            self.detection.window_size = v;
        }
        if let Some(v) = detection.start_alarm_delay {
            self.detection.start_alarm_delay = v;
        }
        if let Some(v) = detection.stop_alarm_delay {
            self.detection.stop_alarm_delay = v;
        }
        if let Some(v) = detection.outlier_threshold {
            self.detection.outlier_threshold = v;
        }
        if let Some(v) = detection.level_bounds {
            self.detection.level_bounds = v;
        }
        if let Some(v) = detection.trend_bounds {
            self.detection.trend_bounds = v;
        }
        if let Some(v) = detection.fit_seed {
            self.detection.fit_seed = v;
        }
    }

    fn apply_file_udp(&mut self, udp: Option<FileUdpConfig>) {
        let Some(udp) = udp else {
            return;
        };

        if let Some(v) = udp.mean_window {
            self.udp_mean_window = v;
        }
        if let Some(v) = udp.factor {
            self.udp_factor = v;
        }
    }

    fn apply_file_parametric(&mut self, parametric: Option<FileParametricConfig>) {
        let Some(parametric) = parametric else {
            return;
        };

        if let Some(v) = parametric.enabled {
            self.parametric_mode = v;
        }
        if let Some(v) = parametric.threshold {
            self.parametric.threshold = v;
        }
        if let Some(v) = parametric.sigma {
            self.parametric.sigma = v;
        }
        if let Some(v) = parametric.alpha {
            self.parametric.alpha = v;
        }
        if let Some(v) = parametric.ewma_factor {
            self.parametric.ewma_factor = v;
        }
    }

    fn apply_file_telemetry(&mut self, telemetry: Option<FileTelemetryConfig>) {
        let Some(telemetry) = telemetry else {
            return;
        };

        if let Some(v) = telemetry.enabled {
            self.telemetry_enabled = v;
        }
        if let Some(v) = non_empty(telemetry.url) {
            self.telemetry_url = v;
        }
    }

    fn apply_file_source(&mut self, source: Option<FileSourceConfig>) {
        let Some(source) = source else {
            return;
        };

        if let Some(v) = non_empty(source.trace) {
            self.trace_path = Some(v);
        }
    }
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Some(path) = env_non_empty("FLOODWATCH_CONFIG") {
        return Some(PathBuf::from(path));
    }

    let default = Path::new(DEFAULT_CONFIG_FILE);
    default.exists().then(|| default.to_path_buf())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    agent: Option<FileAgentConfig>,
    detection: Option<FileDetectionConfig>,
    udp: Option<FileUdpConfig>,
    parametric: Option<FileParametricConfig>,
    telemetry: Option<FileTelemetryConfig>,
    source: Option<FileSourceConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileAgentConfig {
    interval_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileDetectionConfig {
    window_size: Option<usize>,
    start_alarm_delay: Option<u32>,
    stop_alarm_delay: Option<u32>,
    outlier_threshold: Option<f64>,
    level_bounds: Option<FactorBounds>,
    trend_bounds: Option<FactorBounds>,
    fit_seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileUdpConfig {
    mean_window: Option<usize>,
    factor: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileParametricConfig {
    enabled: Option<bool>,
    threshold: Option<f64>,
    sigma: Option<f64>,
    alpha: Option<f64>,
    ewma_factor: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileTelemetryConfig {
    enabled: Option<bool>,
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSourceConfig {
    trace: Option<String>,
}
