use anyhow::{anyhow, Result};

use detection::FactorBounds;

use super::types::AgentConfig;

impl AgentConfig {
    pub(super) fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            return Err(anyhow!("interval_secs must be at least 1"));
        }
        if self.detection.window_size < 2 {
            return Err(anyhow!("window_size must be at least 2"));
        }
        if self.detection.start_alarm_delay == 0 || self.detection.stop_alarm_delay == 0 {
            return Err(anyhow!("alarm delays must be at least 1"));
        }
        if !self.detection.outlier_threshold.is_finite() || self.detection.outlier_threshold < 0.0 {
            return Err(anyhow!("outlier_threshold must be finite and non-negative"));
        }
        validate_bounds("level_bounds", self.detection.level_bounds)?;
        validate_bounds("trend_bounds", self.detection.trend_bounds)?;
        if self.udp_mean_window == 0 {
            return Err(anyhow!("udp mean_window must be at least 1"));
        }
        if !self.udp_factor.is_finite() || self.udp_factor <= 0.0 {
            return Err(anyhow!("udp factor must be positive"));
        }
        if self.parametric_mode && self.parametric.sigma <= 0.0 {
            return Err(anyhow!("parametric sigma must be positive"));
        }
        Ok(())
    }
}

fn validate_bounds(name: &str, bounds: FactorBounds) -> Result<()> {
    if !(0.0..=1.0).contains(&bounds.low) || !(0.0..=1.0).contains(&bounds.high) {
        return Err(anyhow!("{name} must lie within [0, 1]"));
    }
    if bounds.low >= bounds.high {
        return Err(anyhow!("{name} low must be below high"));
    }
    Ok(())
}
