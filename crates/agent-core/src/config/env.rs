use super::types::AgentConfig;
use super::util::{env_non_empty, parse_bool};

impl AgentConfig {
    pub(super) fn apply_env_overrides(&mut self) {
        if let Some(v) = env_non_empty("FLOODWATCH_INTERVAL_SECS") {
            if let Ok(parsed) = v.parse::<u64>() {
                self.interval_secs = parsed;
            }
        }
        if let Some(v) = env_non_empty("FLOODWATCH_TRACE") {
            self.trace_path = Some(v);
        }
        // Pointing the agent at a sink implies the export should run.
        if let Some(v) = env_non_empty("FLOODWATCH_TELEMETRY_URL") {
            self.telemetry_enabled = true;
            self.telemetry_url = v;
        }
        if let Some(v) = env_non_empty("FLOODWATCH_PARAMETRIC") {
            self.parametric_mode = parse_bool(&v);
        }
    }
}
