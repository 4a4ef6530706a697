//! Telemetry module
//!
//! Structured logging and Prometheus metrics

mod logging;
mod metrics;

pub use self::logging::{init_logging, LogFormat};
pub use self::metrics::{
    describe_metrics, init_metrics, CASHOUT_ESTIMATES_TOTAL, QUOTES_TOTAL,
    RISK_ASSESSMENTS_TOTAL, SETTLEMENTS_TOTAL, SETTLER_PASS_SECONDS,
};

use crate::config::TelemetryConfig;

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    init_logging(&config.log_level, config.log_format)?;

    if let Some(port) = config.metrics_port {
        init_metrics(port);
    }

    Ok(())
}
