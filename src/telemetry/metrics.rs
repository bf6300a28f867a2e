//! Prometheus metrics

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Underlying quote request
    Quote,
    /// Expiration listing request
    Expirations,
    /// Single-expiration chain request
    Chain,
    /// Option symbol lookup request
    Lookup,
    /// Enrichment, selection and filtering of one run
    Analysis,
}

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Contracts successfully enriched
    ContractsEnriched,
    /// Records rejected for invalid shape
    ContractsRejected,
    /// Contracts carrying provider Greeks
    ProviderGreeks,
    /// Contracts with estimated Greeks
    EstimatedGreeks,
    /// Contracts left with placeholder Greeks
    UnavailableGreeks,
    /// Failed upstream requests that were degraded to empty results
    FetchFailures,
    /// Fetch fallbacks taken
    FallbackUsed,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Recommendations in the latest report
    Recommendations,
    /// Rows in the latest filtered chain
    ChainRows,
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let metric_name = match metric {
        LatencyMetric::Quote => "options_scout_quote_fetch_seconds",
        LatencyMetric::Expirations => "options_scout_expirations_fetch_seconds",
        LatencyMetric::Chain => "options_scout_chain_fetch_seconds",
        LatencyMetric::Lookup => "options_scout_symbol_lookup_seconds",
        LatencyMetric::Analysis => "options_scout_analysis_seconds",
    };

    metrics::histogram!(metric_name).record(duration.as_secs_f64());
    tracing::trace!(
        metric = metric_name,
        value_ms = duration.as_millis() as u64,
        "Recorded latency"
    );
}

/// Increment a counter
pub fn increment_counter(metric: CounterMetric, value: u64) {
    let metric_name = match metric {
        CounterMetric::ContractsEnriched => "options_scout_contracts_enriched_total",
        CounterMetric::ContractsRejected => "options_scout_contracts_rejected_total",
        CounterMetric::ProviderGreeks => "options_scout_greeks_provider_total",
        CounterMetric::EstimatedGreeks => "options_scout_greeks_estimated_total",
        CounterMetric::UnavailableGreeks => "options_scout_greeks_unavailable_total",
        CounterMetric::FetchFailures => "options_scout_fetch_failures_total",
        CounterMetric::FallbackUsed => "options_scout_fetch_fallbacks_total",
    };

    metrics::counter!(metric_name).increment(value);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    let metric_name = match metric {
        GaugeMetric::Recommendations => "options_scout_recommendations",
        GaugeMetric::ChainRows => "options_scout_chain_rows",
    };

    metrics::gauge!(metric_name).set(value);
}

/// Install the Prometheus recorder with an HTTP scrape endpoint.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .with_context(|| format!("Failed to start metrics exporter on {}", addr))?;

    tracing::info!(%addr, "Metrics exporter listening");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_latency(LatencyMetric::Chain, Duration::from_millis(12));
        increment_counter(CounterMetric::ContractsEnriched, 3);
        set_gauge(GaugeMetric::Recommendations, 4.0);
    }
}
