//! Prometheus metrics
//!
//! Call sites record through the `metrics` macros directly; this module only
//! names and describes the series and installs the exporter.

use std::net::SocketAddr;

/// Quotes served, labelled `result` = `valid` or a rejection code
pub const QUOTES_TOTAL: &str = "parlay_quotes_total";
/// Risk assessments, labelled by `action`
pub const RISK_ASSESSMENTS_TOTAL: &str = "parlay_risk_assessments_total";
/// Ledger status changes, labelled by `status`
pub const SETTLEMENTS_TOTAL: &str = "parlay_settlements_total";
pub const CASHOUT_ESTIMATES_TOTAL: &str = "parlay_cashout_estimates_total";
/// Wall time of one settler pass
pub const SETTLER_PASS_SECONDS: &str = "parlay_settler_pass_seconds";

/// Register help text for every series
pub fn describe_metrics() {
    ::metrics::describe_counter!(QUOTES_TOTAL, "Parlay quotes by result");
    ::metrics::describe_counter!(RISK_ASSESSMENTS_TOTAL, "Risk assessments by action");
    ::metrics::describe_counter!(SETTLEMENTS_TOTAL, "Ticket status changes by status");
    ::metrics::describe_counter!(CASHOUT_ESTIMATES_TOTAL, "Early cashout estimates computed");
    ::metrics::describe_histogram!(
        SETTLER_PASS_SECONDS,
        ::metrics::Unit::Seconds,
        "Duration of a settlement pass"
    );
}

/// Start the Prometheus scrape endpoint; failure leaves metrics unexported
pub fn init_metrics(port: u16) {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    match metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
    {
        Ok(()) => tracing::info!(%addr, "Prometheus exporter listening"),
        Err(e) => tracing::warn!(%addr, error = %e, "Prometheus exporter not started"),
    }
    describe_metrics();
}
