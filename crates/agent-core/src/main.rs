mod config;
mod lifecycle;

use std::time::Duration;

use anyhow::Result;
use tokio::signal;
use tracing::info;

use config::AgentConfig;
use lifecycle::AgentRuntime;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let config = AgentConfig::load()?;
    let mut runtime = AgentRuntime::new(config.clone());

    info!(
        interval_secs = config.interval_secs,
        parametric = config.parametric_mode,
        telemetry = config.telemetry_enabled,
        "floodwatch agent started"
    );

    if let Some(trace) = config.trace_path.as_deref() {
        let summary = runtime.replay_trace(trace).await?;
        info!(
            intervals = summary.intervals,
            syn_started = summary.syn_attacks_started,
            syn_ended = summary.syn_attacks_ended,
            udp_started = summary.udp_attacks_started,
            udp_ended = summary.udp_attacks_ended,
            "trace replay finished"
        );
        return Ok(());
    }

    let mut ticker = tokio::time::interval(Duration::from_secs(config.interval_secs));
    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
            _ = ticker.tick() => {
                let now = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_secs() as i64)
                    .unwrap_or_default();
                runtime.tick(now).await;
            }
        }
    }

    info!("floodwatch agent stopped");
    Ok(())
}
