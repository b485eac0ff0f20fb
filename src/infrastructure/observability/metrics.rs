//! Prometheus metrics infrastructure

use std::sync::Arc;

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;

/// Prometheus metrics handle for rendering collected counters
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics in Prometheus text format
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::debug!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            tracing::info!("Prometheus metrics recorder installed");
            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Record lookups answered from completed slots
pub fn record_cache_hits(cache: &str, count: u64) {
    if count > 0 {
        counter!("batch_cache_hits_total", "cache" => cache.to_string()).increment(count);
    }
}

/// Record lookups that had to wait on a fetch
pub fn record_cache_misses(cache: &str, count: u64) {
    if count > 0 {
        counter!("batch_cache_misses_total", "cache" => cache.to_string()).increment(count);
    }
}

/// Record one batch fetch and its outcome
pub fn record_cache_fetch(cache: &str, success: bool) {
    let labels = [("cache", cache.to_string())];

    counter!("batch_cache_fetches_total", &labels).increment(1);

    if !success {
        counter!("batch_cache_fetch_errors_total", &labels).increment(1);
    }
}
