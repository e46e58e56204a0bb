//! Prometheus metrics for the Hazard Validation Agent
//!
//! Collected per normalization request:
//! - `normalize_requests_total` (counter) - requests by record kind and result
//! - `normalize_duration_seconds` (histogram) - pipeline duration by kind
//! - `schema_violations_total` (counter) - gate rejections by kind and field
//! - `guardrail_repairs_total` (counter) - repairs by kind and guardrail id

use prometheus::{CounterVec, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

use super::Result;

/// Normalization metrics for Prometheus
pub struct EngineMetrics {
    /// Total normalization requests (by kind, result)
    requests_total: CounterVec,

    /// Pipeline duration in seconds (by kind)
    duration_seconds: HistogramVec,

    /// Schema-gate rejections (by kind, field)
    violations_total: CounterVec,

    /// Guardrail repairs applied (by kind, guardrail)
    repairs_total: CounterVec,
}

impl EngineMetrics {
    /// Create and register the metrics with the provided registry
    pub fn new(registry: &Registry) -> Result<Self> {
        let requests_total = CounterVec::new(
            Opts::new(
                "normalize_requests_total",
                "Total number of record normalization requests",
            )
            .namespace("hazard_validation"),
            &["kind", "result"],
        )?;

        let duration_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "normalize_duration_seconds",
                "Record normalization pipeline duration in seconds",
            )
            .namespace("hazard_validation")
            .buckets(vec![0.00005, 0.0001, 0.00025, 0.0005, 0.001, 0.0025, 0.005, 0.01]),
            &["kind"],
        )?;

        let violations_total = CounterVec::new(
            Opts::new(
                "schema_violations_total",
                "Total number of schema-gate rejections by offending field",
            )
            .namespace("hazard_validation"),
            &["kind", "field"],
        )?;

        let repairs_total = CounterVec::new(
            Opts::new(
                "guardrail_repairs_total",
                "Total number of guardrail repairs applied",
            )
            .namespace("hazard_validation"),
            &["kind", "guardrail"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(duration_seconds.clone()))?;
        registry.register(Box::new(violations_total.clone()))?;
        registry.register(Box::new(repairs_total.clone()))?;

        Ok(Self {
            requests_total,
            duration_seconds,
            violations_total,
            repairs_total,
        })
    }

    /// Record a normalization request
    pub fn record_request(&self, kind: &str, valid: bool) {
        let result = if valid { "normalized" } else { "rejected" };
        self.requests_total
            .with_label_values(&[kind, result])
            .inc();
    }

    /// Observe pipeline duration
    pub fn observe_duration(&self, kind: &str, duration_secs: f64) {
        self.duration_seconds
            .with_label_values(&[kind])
            .observe(duration_secs);
    }

    /// Record a schema-gate rejection
    pub fn record_violation(&self, kind: &str, field: &str) {
        self.violations_total
            .with_label_values(&[kind, field])
            .inc();
    }

    /// Record one applied guardrail repair
    pub fn record_repair(&self, kind: &str, guardrail: &str) {
        self.repairs_total
            .with_label_values(&[kind, guardrail])
            .inc();
    }

    /// Record all repairs from a normalization pass
    pub fn record_repairs(&self, kind: &str, guardrails: &[&str]) {
        for guardrail in guardrails {
            self.record_repair(kind, guardrail);
        }
    }
}

/// Registry bundling the agent metrics with their Prometheus registry
pub struct EngineMetricsRegistry {
    registry: Arc<Registry>,
    engine: Arc<EngineMetrics>,
}

impl EngineMetricsRegistry {
    /// Create a new registry with all agent metrics registered
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        let engine = Arc::new(EngineMetrics::new(&registry)?);
        Ok(Self { registry, engine })
    }

    /// Access the normalization metrics
    pub fn engine(&self) -> Arc<EngineMetrics> {
        Arc::clone(&self.engine)
    }

    /// Gather all metric families
    pub fn gather(&self) -> Vec<prometheus::proto::MetricFamily> {
        self.registry.gather()
    }

    /// Encode all metrics in Prometheus text exposition format
    pub fn encode_text(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        encoder
            .encode_to_string(&self.gather())
            .map_err(|e| super::TelemetryError::Encoding(e.to_string()))
    }
}
