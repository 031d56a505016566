use detection::SmoothingKind;
use telemetry::{HttpWriter, MetricBuffer};
use traffic::{SharedCounters, UdpDeviation};

use crate::config::AgentConfig;

use super::monitor::FloodMonitor;
use super::METRIC_BUFFER_CAP;

/// Buffered line-protocol export, present when telemetry is enabled.
pub(super) struct MetricExporter {
    pub(super) writer: HttpWriter,
    pub(super) buffer: MetricBuffer,
}

pub struct AgentRuntime {
    pub(super) counters: SharedCounters,
    pub(super) syn_monitor: FloodMonitor,
    pub(super) udp_monitor: FloodMonitor,
    pub(super) udp_adapter: UdpDeviation,
    pub(super) exporter: Option<MetricExporter>,
    pub(super) tick_count: u64,
}

impl AgentRuntime {
    pub fn new(config: AgentConfig) -> Self {
        let syn_monitor = build_monitor(&config, SmoothingKind::Double);
        let udp_monitor = build_monitor(&config, SmoothingKind::Single);
        let udp_adapter = UdpDeviation::new(config.udp_mean_window, config.udp_factor);
        let exporter = config.telemetry_enabled.then(|| MetricExporter {
            writer: HttpWriter::new(config.telemetry_url.clone()),
            buffer: MetricBuffer::new(METRIC_BUFFER_CAP),
        });

        Self {
            counters: SharedCounters::new(),
            syn_monitor,
            udp_monitor,
            udp_adapter,
            exporter,
            tick_count: 0,
        }
    }
}

/// SYN watches handshake asymmetry with trend tracking; UDP watches
/// count deviations with the level-only baseline.
fn build_monitor(config: &AgentConfig, smoothing: SmoothingKind) -> FloodMonitor {
    if config.parametric_mode {
        return FloodMonitor::parametric(config.parametric.clone());
    }

    let mut detector_config = config.detection.clone();
    detector_config.smoothing = smoothing;
    FloodMonitor::change_point(detector_config)
}
