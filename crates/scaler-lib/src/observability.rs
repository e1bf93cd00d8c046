//! Observability infrastructure for the fleet scaler
//!
//! Provides:
//! - Prometheus metrics (adjustment outcomes, latency, last applied target)
//! - Structured JSON logging with tracing

use crate::error::AdjustError;
use crate::models::{AdjustmentReport, ResourceKind};
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge_vec, HistogramVec,
    IntCounterVec, IntGaugeVec,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for adjustment latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ScalerMetricsInner> = OnceLock::new();

struct ScalerMetricsInner {
    adjustments_total: IntCounterVec,
    adjustment_latency_seconds: HistogramVec,
    last_target: IntGaugeVec,
}

impl ScalerMetricsInner {
    fn new() -> Self {
        Self {
            adjustments_total: register_int_counter_vec!(
                "fleet_scaler_adjustments_total",
                "Capacity adjustments by resource kind and outcome",
                &["kind", "outcome"]
            )
            .expect("Failed to register adjustments_total"),

            adjustment_latency_seconds: register_histogram_vec!(
                "fleet_scaler_adjustment_latency_seconds",
                "Time spent on one read, compute and apply pass",
                &["kind"],
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register adjustment_latency_seconds"),

            last_target: register_int_gauge_vec!(
                "fleet_scaler_last_target",
                "Most recently applied desired capacity",
                &["kind"]
            )
            .expect("Failed to register last_target"),
        }
    }
}

/// Scaler metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share the
/// same underlying metrics.
#[derive(Clone)]
pub struct ScalerMetrics {
    _private: (),
}

impl Default for ScalerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ScalerMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ScalerMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ScalerMetricsInner {
        GLOBAL_METRICS.get_or_init(ScalerMetricsInner::new)
    }

    /// Record a successful adjustment
    pub fn record_success(&self, kind: ResourceKind, target: i64, duration_secs: f64) {
        let inner = self.inner();
        inner
            .adjustments_total
            .with_label_values(&[kind.as_str(), "success"])
            .inc();
        inner
            .adjustment_latency_seconds
            .with_label_values(&[kind.as_str()])
            .observe(duration_secs);
        inner
            .last_target
            .with_label_values(&[kind.as_str()])
            .set(target);
    }

    /// Record a failed adjustment under its error code
    pub fn record_failure(&self, kind: ResourceKind, code: &str, duration_secs: f64) {
        let inner = self.inner();
        inner
            .adjustments_total
            .with_label_values(&[kind.as_str(), code])
            .inc();
        inner
            .adjustment_latency_seconds
            .with_label_values(&[kind.as_str()])
            .observe(duration_secs);
    }

    /// Number of adjustments recorded for a kind and outcome
    pub fn adjustments(&self, kind: ResourceKind, outcome: &str) -> u64 {
        self.inner()
            .adjustments_total
            .with_label_values(&[kind.as_str(), outcome])
            .get()
    }
}

/// Structured logger for scaler events
///
/// Emits the one status line per invocation outcome, plus lifecycle events.
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    instance: String,
}

impl Default for StructuredLogger {
    fn default() -> Self {
        Self::new("local")
    }
}

impl StructuredLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// Log an applied adjustment
    pub fn log_adjustment(&self, report: &AdjustmentReport) {
        info!(
            event = "adjustment_applied",
            instance = %self.instance,
            kind = %report.kind,
            resource = %report.resource,
            mode = %report.mode,
            amount = report.amount,
            baseline = report.baseline,
            previous_desired = report.previous_desired,
            target = report.target,
            bounds = %report.bounds_label(),
            "Desired capacity set"
        );
    }

    /// Log a failed adjustment
    pub fn log_failure(&self, err: &AdjustError) {
        warn!(
            event = "adjustment_failed",
            instance = %self.instance,
            kind = %err.kind,
            resource = %err.resource,
            mode = %err.mode,
            amount = err.amount,
            stage = %err.stage,
            target = ?err.target,
            bounds = ?err.bounds_label(),
            code = err.code(),
            transient = err.is_transient(),
            error = %err.cause,
            "Capacity adjustment failed"
        );
    }

    /// Log scaler startup
    pub fn log_startup(&self, version: &str) {
        info!(
            event = "scaler_started",
            instance = %self.instance,
            version = %version,
            "Fleet scaler started"
        );
    }

    /// Log scaler shutdown
    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "scaler_shutdown",
            instance = %self.instance,
            reason = %reason,
            "Fleet scaler shutting down"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_record_outcomes() {
        let metrics = ScalerMetrics::new();
        let before = metrics.adjustments(ResourceKind::InstanceGroup, "success");

        metrics.record_success(ResourceKind::InstanceGroup, 4, 0.02);
        metrics.record_failure(ResourceKind::InstanceGroup, "resource_not_found", 0.01);

        assert!(metrics.adjustments(ResourceKind::InstanceGroup, "success") > before);
        assert!(metrics.adjustments(ResourceKind::InstanceGroup, "resource_not_found") >= 1);
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("test-instance");
        assert_eq!(logger.instance(), "test-instance");
    }
}
