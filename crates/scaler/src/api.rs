//! HTTP API for scaling triggers, health checks and Prometheus metrics

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use scaler_lib::{
    health::{ComponentStatus, HealthRegistry},
    AdjustError, AdjustFailure, Adjuster, AdjustmentReport, ContainerServiceTrigger, GroupRef,
    InstanceGroupTrigger, ResourceLeases, ResourceManager, ScalingRequest, ServiceRef, Stage,
    TriggerError,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

pub type GroupAdjuster = Adjuster<dyn ResourceManager<Target = GroupRef>>;
pub type ServiceAdjuster = Adjuster<dyn ResourceManager<Target = ServiceRef>>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub health_registry: HealthRegistry,
    pub groups: Arc<GroupAdjuster>,
    pub services: Arc<ServiceAdjuster>,
    /// Present when adjustments of one resource must not overlap
    pub leases: Option<ResourceLeases>,
}

impl AppState {
    pub fn new(
        health_registry: HealthRegistry,
        groups: Arc<GroupAdjuster>,
        services: Arc<ServiceAdjuster>,
    ) -> Self {
        Self {
            health_registry,
            groups,
            services,
            leases: None,
        }
    }

    pub fn with_leases(mut self, leases: ResourceLeases) -> Self {
        self.leases = Some(leases);
        self
    }
}

/// Error body returned by the trigger endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
}

/// Failures surfaced by the trigger endpoints
#[derive(Debug)]
pub enum ApiError {
    Trigger(TriggerError),
    Adjust(AdjustError),
}

impl From<TriggerError> for ApiError {
    fn from(err: TriggerError) -> Self {
        ApiError::Trigger(err)
    }
}

impl From<AdjustError> for ApiError {
    fn from(err: AdjustError) -> Self {
        ApiError::Adjust(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Trigger(err) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: err.to_string(),
                    code: "invalid_request".to_string(),
                    stage: None,
                },
            ),
            ApiError::Adjust(err) => {
                let status = match err.cause {
                    AdjustFailure::ResourceNotFound(_) => StatusCode::NOT_FOUND,
                    AdjustFailure::InvalidBounds { .. }
                    | AdjustFailure::NegativeCapacity { .. }
                    | AdjustFailure::CapacityOutOfRange { .. } => StatusCode::CONFLICT,
                    AdjustFailure::TransientReadError(_) | AdjustFailure::TransientWriteError(_) => {
                        StatusCode::SERVICE_UNAVAILABLE
                    }
                };
                (
                    status,
                    ErrorResponse {
                        error: err.to_string(),
                        code: err.code().to_string(),
                        stage: Some(err.stage),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Scale an instance group
async fn scale_instance_group(
    State(state): State<Arc<AppState>>,
    Json(trigger): Json<InstanceGroupTrigger>,
) -> Result<Json<AdjustmentReport>, ApiError> {
    let request = trigger.into_request()?;
    let report = run_adjustment(&state, &state.groups, &request).await?;
    Ok(Json(report))
}

/// Scale a container service
async fn scale_container_service(
    State(state): State<Arc<AppState>>,
    Json(trigger): Json<ContainerServiceTrigger>,
) -> Result<Json<AdjustmentReport>, ApiError> {
    let request = trigger.into_request()?;
    let report = run_adjustment(&state, &state.services, &request).await?;
    Ok(Json(report))
}

async fn run_adjustment<T>(
    state: &AppState,
    adjuster: &Adjuster<dyn ResourceManager<Target = T>>,
    request: &ScalingRequest<T>,
) -> Result<AdjustmentReport, AdjustError>
where
    T: fmt::Display + Send + Sync + 'static,
{
    let kind = adjuster.manager().kind();

    let _lease = match &state.leases {
        Some(leases) => Some(leases.acquire(format!("{}:{}", kind, request.resource)).await),
        None => None,
    };

    let result = adjuster.adjust(request).await;

    match &result {
        Ok(_) => state.health_registry.set_healthy(kind).await,
        Err(err) if err.is_transient() => {
            state
                .health_registry
                .set_degraded(kind, err.cause.to_string())
                .await
        }
        Err(_) => {}
    }

    result
}

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        warn!(error = %err, "Failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/instance-groups/scale", post(scale_instance_group))
        .route("/v1/container-services/scale", post(scale_container_service))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
