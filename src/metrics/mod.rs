// Private module declaration
mod server;

use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry};

// Re-export for public API
pub use server::configure;

// ============================================================================
// Metrics Module - Prometheus metrics for the order API
// ============================================================================
//
// Provides:
// - Orders created
// - Status updates by target status
// - Failed requests by error kind
// - Request latency by operation
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

pub struct Metrics {
    registry: Registry,

    pub orders_created: IntCounter,
    pub status_updates: IntCounterVec,
    pub requests_failed: IntCounterVec,
    pub request_duration: HistogramVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let orders_created = IntCounter::new("orders_created_total", "Total orders created")?;
        registry.register(Box::new(orders_created.clone()))?;

        let status_updates = IntCounterVec::new(
            Opts::new("order_status_updates_total", "Total status updates applied"),
            &["status"],
        )?;
        registry.register(Box::new(status_updates.clone()))?;

        let requests_failed = IntCounterVec::new(
            Opts::new("order_requests_failed_total", "Total failed order requests"),
            &["kind"],
        )?;
        registry.register(Box::new(requests_failed.clone()))?;

        let request_duration = HistogramVec::new(
            HistogramOpts::new("order_request_duration_seconds", "Order request duration")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["operation"],
        )?;
        registry.register(Box::new(request_duration.clone()))?;

        Ok(Self {
            registry,
            orders_created,
            status_updates,
            requests_failed,
            request_duration,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
