use anyhow::{Context, Result};
use tracing::warn;

use detection::DetectorEvent;
use traffic::{IntervalCounters, TraceError, TraceReader};

use super::AgentRuntime;

/// Attack counts observed while replaying a recorded trace.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub intervals: u64,
    pub syn_attacks_started: u64,
    pub syn_attacks_ended: u64,
    pub udp_attacks_started: u64,
    pub udp_attacks_ended: u64,
}

impl AgentRuntime {
    /// Drives the interval path from a recorded trace instead of the
    /// live counters, using the recorded timestamps. Malformed records
    /// are skipped with a warning; I/O failures abort the replay.
    pub async fn replay_trace(&mut self, path: &str) -> Result<ReplaySummary> {
        let reader =
            TraceReader::open(path).with_context(|| format!("failed opening trace {path}"))?;

        let mut summary = ReplaySummary::default();
        for record in reader {
            let record = match record {
                Ok(record) => record,
                Err(TraceError::Parse { line, message }) => {
                    warn!(line, error = %message, "skipping malformed trace record");
                    continue;
                }
                Err(err) => {
                    return Err(err).with_context(|| format!("failed reading trace {path}"));
                }
            };

            let counts = IntervalCounters {
                syn: record.syn,
                synack: record.synack,
                udp: record.udp,
            };
            let report = self.process_interval(record.unix, counts).await;

            summary.intervals += 1;
            tally(
                &report.syn.events,
                &mut summary.syn_attacks_started,
                &mut summary.syn_attacks_ended,
            );
            tally(
                &report.udp.events,
                &mut summary.udp_attacks_started,
                &mut summary.udp_attacks_ended,
            );
        }

        Ok(summary)
    }
}

fn tally(events: &[DetectorEvent], started: &mut u64, ended: &mut u64) {
    for event in events {
        match event {
            DetectorEvent::AttackStarted { .. } => *started += 1,
            DetectorEvent::AttackEnded => *ended += 1,
            _ => {}
        }
    }
}
