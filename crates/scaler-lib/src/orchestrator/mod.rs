//! Adjustment orchestration
//!
//! Sequences one invocation through `Start → Reading → Computing →
//! Applying → Done`. Any failure ends the pass at `Failed` without running
//! later stages. Nothing is retried here; retries belong to whatever
//! re-delivers the trigger.


use crate::calculator;
use crate::error::{AdjustError, AdjustFailure, ManagerError};
use crate::manager::ResourceManager;
use crate::models::{AdjustmentReport, ResourceState, ScalingRequest, Stage};
use crate::observability::{ScalerMetrics, StructuredLogger};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Configuration for an adjuster
#[derive(Debug, Clone)]
pub struct AdjusterConfig {
    /// Deadline for each call to the resource manager (default: 10 seconds)
    pub call_timeout: Option<Duration>,
}

impl Default for AdjusterConfig {
    fn default() -> Self {
        Self {
            call_timeout: Some(Duration::from_secs(10)),
        }
    }
}

/// Runs capacity adjustments against one resource manager
pub struct Adjuster<M: ResourceManager + ?Sized> {
    manager: Arc<M>,
    config: AdjusterConfig,
    logger: StructuredLogger,
    metrics: ScalerMetrics,
}

impl<M: ResourceManager + ?Sized> Adjuster<M> {
    /// Create an adjuster around an injected manager
    pub fn new(manager: Arc<M>) -> Self {
        Self {
            manager,
            config: AdjusterConfig::default(),
            logger: StructuredLogger::default(),
            metrics: ScalerMetrics::new(),
        }
    }

    pub fn with_config(mut self, config: AdjusterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_logger(mut self, logger: StructuredLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn manager(&self) -> &M {
        &self.manager
    }

    /// Run one read, compute and apply pass for `request`.
    ///
    /// Emits exactly one status line, for success or failure.
    pub async fn adjust(
        &self,
        request: &ScalingRequest<M::Target>,
    ) -> Result<AdjustmentReport, AdjustError> {
        let started = Instant::now();
        let kind = self.manager.kind();

        let result = self.run(request).await;
        let elapsed = started.elapsed().as_secs_f64();

        match &result {
            Ok(report) => {
                self.logger.log_adjustment(report);
                self.metrics.record_success(kind, report.target, elapsed);
            }
            Err(err) => {
                self.logger.log_failure(err);
                self.metrics.record_failure(kind, err.code(), elapsed);
            }
        }

        result
    }

    async fn run(
        &self,
        request: &ScalingRequest<M::Target>,
    ) -> Result<AdjustmentReport, AdjustError> {
        let mut stages = vec![Stage::Start];

        stages.push(Stage::Reading);
        let state = self
            .bounded(self.manager.describe(&request.resource))
            .await
            .map_err(|err| {
                let cause = match err {
                    ManagerError::NotFound(what) => AdjustFailure::ResourceNotFound(what),
                    ManagerError::Unavailable(reason) => AdjustFailure::TransientReadError(reason),
                };
                self.failed(request, &mut stages, cause, None, None)
            })?;

        debug!(
            resource = %request.resource,
            desired = state.desired,
            running = ?state.running,
            bounds = %state.bounds_label(),
            "Fetched resource state"
        );

        stages.push(Stage::Computing);
        let baseline = self.manager.baseline();
        let resolved = calculator::compute(request, &state, baseline)
            .map_err(|err| self.failed(request, &mut stages, err.into(), Some(&state), None))?;

        stages.push(Stage::Applying);
        self.bounded(self.manager.set_desired(&request.resource, resolved))
            .await
            .map_err(|err| {
                let reason = match err {
                    ManagerError::NotFound(what) => format!("{} not found", what),
                    ManagerError::Unavailable(reason) => reason,
                };
                self.failed(
                    request,
                    &mut stages,
                    AdjustFailure::TransientWriteError(reason),
                    Some(&state),
                    Some(resolved.target),
                )
            })?;

        stages.push(Stage::Done);

        Ok(AdjustmentReport {
            resource: request.resource.to_string(),
            kind: self.manager.kind(),
            mode: request.mode,
            amount: request.amount,
            baseline: state.baseline(baseline),
            previous_desired: state.desired,
            target: resolved.target,
            min: state.min,
            max: state.max,
            stages,
            completed_at: chrono::Utc::now().timestamp(),
        })
    }

    /// Apply the per-call deadline; an expired deadline counts as unavailability
    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, ManagerError>>,
    ) -> Result<T, ManagerError> {
        match self.config.call_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                ManagerError::Unavailable(format!(
                    "call exceeded deadline of {}ms",
                    limit.as_millis()
                ))
            })?,
            None => call.await,
        }
    }

    fn failed(
        &self,
        request: &ScalingRequest<M::Target>,
        stages: &mut Vec<Stage>,
        cause: AdjustFailure,
        observed: Option<&ResourceState>,
        target: Option<i64>,
    ) -> AdjustError {
        let stage = stages.last().copied().unwrap_or(Stage::Start);
        stages.push(Stage::Failed);

        AdjustError {
            resource: request.resource.to_string(),
            kind: self.manager.kind(),
            mode: request.mode,
            amount: request.amount,
            stage,
            stages: stages.clone(),
            observed: observed.copied(),
            target,
            cause,
        }
    }
}
