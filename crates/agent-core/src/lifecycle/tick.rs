use tracing::{info, warn};

use detection::{DetectorEvent, TickOutcome};
use telemetry::MetricPoint;
use traffic::{syn_asymmetry, IntervalCounters};

use super::{AgentRuntime, METRIC_BATCH_SIZE};

/// Both monitor outcomes for one interval.
pub(super) struct IntervalReport {
    pub(super) syn: TickOutcome,
    pub(super) udp: TickOutcome,
}

impl AgentRuntime {
    /// One interval boundary: drains the shared counters and runs both
    /// monitors.
    pub async fn tick(&mut self, now_unix: i64) {
        let counts = self.counters.snapshot_and_reset();
        self.process_interval(now_unix, counts).await;
    }

    /// The change-point monitors watch the derived samples; the
    /// parametric CUSUM models the raw per-interval counts.
    pub(super) async fn process_interval(
        &mut self,
        now_unix: i64,
        counts: IntervalCounters,
    ) -> IntervalReport {
        self.tick_count = self.tick_count.saturating_add(1);

        let syn_sample = if self.syn_monitor.is_parametric() {
            counts.syn as f64
        } else {
            syn_asymmetry(&counts)
        };
        let syn = self.syn_monitor.update(syn_sample);
        log_monitor_events("syn", &syn);

        let udp_sample = if self.udp_monitor.is_parametric() {
            counts.udp as f64
        } else {
            // The window feeding the rolling mean stays frozen while UDP
            // is under attack, so the attack state is read before the
            // update.
            self.udp_adapter
                .sample(counts.udp, self.udp_monitor.under_attack())
        };
        let udp = self.udp_monitor.update(udp_sample);
        log_monitor_events("udp", &udp);

        self.export_interval(now_unix, &counts, syn_sample, &syn, udp_sample, &udp)
            .await;

        IntervalReport { syn, udp }
    }

    async fn export_interval(
        &mut self,
        now_unix: i64,
        counts: &IntervalCounters,
        syn_sample: f64,
        syn: &TickOutcome,
        udp_sample: f64,
        udp: &TickOutcome,
    ) {
        let Some(exporter) = self.exporter.as_mut() else {
            return;
        };

        let point = MetricPoint::new("data_interval", now_unix)
            .field("syn_count", counts.syn as f64)
            .field("synack_count", counts.synack as f64)
            .field("udp_count", counts.udp as f64)
            .field("syn_value", syn_sample)
            .field("syn_statistic", syn.statistic)
            .field("syn_threshold", syn.threshold)
            .field("udp_value", udp_sample)
            .field("udp_statistic", udp.statistic)
            .field("udp_threshold", udp.threshold);

        exporter.buffer.enqueue(point);
        let batch = exporter.buffer.drain_batch(METRIC_BATCH_SIZE);
        if let Err(err) = exporter.writer.write(&batch).await {
            warn!(error = %err, points = batch.len(), "telemetry flush failed");
        }
    }
}

fn log_monitor_events(metric: &'static str, reading: &TickOutcome) {
    for event in &reading.events {
        match event {
            DetectorEvent::BootstrapComplete => {
                info!(metric, "traffic baseline established");
            }
            DetectorEvent::AttackStarted { trigger } => {
                warn!(
                    metric,
                    trigger = ?trigger,
                    statistic = reading.statistic,
                    threshold = reading.threshold,
                    "flood attack detected"
                );
            }
            DetectorEvent::EndingPathSwitched => {
                info!(metric, "ending forecast switched to the abrupt-decrease test");
            }
            DetectorEvent::AttackEnded => {
                info!(metric, "attack traffic subsided");
            }
        }
    }
}
