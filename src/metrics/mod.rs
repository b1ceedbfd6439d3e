// Private module declaration
mod server;

use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry};

// Re-export for public API
pub use server::{configure_endpoints, track_requests};

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - HTTP traffic per route (count by status, latency)
// - Customer writes (created, address updates, email conflicts)
// - Database connection attempts at startup
//
// Scraped via GET /metrics
// ============================================================================

/// Central metrics registry for the service
pub struct Metrics {
    registry: Registry,

    // HTTP Metrics
    pub http_requests: IntCounterVec,
    pub http_request_duration: HistogramVec,

    // Customer Metrics
    pub customers_created: IntCounter,
    pub address_updates: IntCounter,
    pub customer_conflicts: IntCounter,

    // Storage Metrics
    pub db_connect_attempts: IntCounter,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let http_requests = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests handled"),
            &["method", "route", "status"],
        )?;
        registry.register(Box::new(http_requests.clone()))?;

        let http_request_duration = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request duration")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["method", "route"],
        )?;
        registry.register(Box::new(http_request_duration.clone()))?;

        let customers_created = IntCounter::new(
            "customers_created_total",
            "Total customers created",
        )?;
        registry.register(Box::new(customers_created.clone()))?;

        let address_updates = IntCounter::new(
            "customer_address_updates_total",
            "Total customer address updates",
        )?;
        registry.register(Box::new(address_updates.clone()))?;

        let customer_conflicts = IntCounter::new(
            "customer_conflicts_total",
            "Customer creations rejected because the email already exists",
        )?;
        registry.register(Box::new(customer_conflicts.clone()))?;

        let db_connect_attempts = IntCounter::new(
            "db_connect_attempts_total",
            "Database connection attempts made at startup",
        )?;
        registry.register(Box::new(db_connect_attempts.clone()))?;

        Ok(Self {
            registry,
            http_requests,
            http_request_duration,
            customers_created,
            address_updates,
            customer_conflicts,
            db_connect_attempts,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Helper to record one handled request
    pub fn record_request(&self, method: &str, route: &str, status: u16, duration_secs: f64) {
        self.http_requests
            .with_label_values(&[method, route, &status.to_string()])
            .inc();
        self.http_request_duration
            .with_label_values(&[method, route])
            .observe(duration_secs);
    }

    pub fn record_customer_created(&self) {
        self.customers_created.inc();
    }

    pub fn record_address_update(&self) {
        self.address_updates.inc();
    }

    pub fn record_conflict(&self) {
        self.customer_conflicts.inc();
    }

    pub fn record_db_connect_attempt(&self) {
        self.db_connect_attempts.inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        assert!(metrics.registry.gather().len() > 0);
    }

    #[test]
    fn test_record_request() {
        let metrics = Metrics::new().unwrap();
        metrics.record_request("GET", "/api/customers", 200, 0.01);
        metrics.record_request("GET", "/api/customers", 200, 0.02);
        metrics.record_request("POST", "/api/customers", 400, 0.01);

        let gathered = metrics.registry.gather();
        let requests = gathered.iter().find(|m| m.name() == "http_requests_total").unwrap();
        assert_eq!(requests.metric.len(), 2); // Two label combinations
    }

    #[test]
    fn test_record_customer_writes() {
        let metrics = Metrics::new().unwrap();
        metrics.record_customer_created();
        metrics.record_customer_created();
        metrics.record_address_update();
        metrics.record_conflict();

        assert_eq!(metrics.customers_created.get(), 2);
        assert_eq!(metrics.address_updates.get(), 1);
        assert_eq!(metrics.customer_conflicts.get(), 1);
    }

    #[test]
    fn test_record_db_connect_attempt() {
        let metrics = Metrics::new().unwrap();
        metrics.record_db_connect_attempt();
        assert_eq!(metrics.db_connect_attempts.get(), 1);
    }
}
