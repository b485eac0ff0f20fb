//! Observability infrastructure - Metrics

mod config;
mod metrics;

pub use config::MetricsConfig;
pub use metrics::{
    PrometheusMetrics, init_metrics, record_cache_fetch, record_cache_hits, record_cache_misses,
};
