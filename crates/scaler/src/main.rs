//! Fleet Scaler - desired-capacity adjustment service
//!
//! Receives scaling triggers over HTTP and applies them to Auto Scaling
//! groups and ECS services.

use anyhow::{Context, Result};
use fleet_scaler::{
    api::{self, AppState, GroupAdjuster, ServiceAdjuster},
    clients,
    config::ScalerConfig,
};
use scaler_lib::{
    AdjusterConfig, ContainerServiceManager, GroupRef, HealthRegistry, InstanceGroupManager,
    ResourceKind, ResourceLeases, ResourceManager, ServiceRef, StructuredLogger,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SCALER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    let config = ScalerConfig::load()?;
    info!(
        instance = %config.instance_name,
        region = ?config.region,
        serialize_per_resource = config.serialize_per_resource,
        "Scaler configured"
    );

    let logger = StructuredLogger::new(&config.instance_name);
    logger.log_startup(SCALER_VERSION);

    let health_registry = HealthRegistry::new();
    health_registry.register(ResourceKind::InstanceGroup).await;
    health_registry.register(ResourceKind::ContainerService).await;

    let mut state = build_state(&config, health_registry.clone(), logger.clone()).await;
    if config.serialize_per_resource {
        state = state.with_leases(ResourceLeases::new());
    }

    health_registry.set_ready(true).await;

    let server = tokio::spawn(api::serve(config.api_port, Arc::new(state)));

    tokio::select! {
        result = server => {
            result.context("API server task panicked")??;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for shutdown signal")?;
            logger.log_shutdown("SIGINT received");
        }
    }

    Ok(())
}

/// Construct the resource manager clients once and inject them into the adjusters
async fn build_state(
    config: &ScalerConfig,
    health_registry: HealthRegistry,
    logger: StructuredLogger,
) -> AppState {
    let sdk_config = clients::load_sdk_config(config).await;
    clients::record_client_health(&sdk_config, &health_registry).await;

    let adjuster_config = AdjusterConfig {
        call_timeout: config.call_timeout(),
    };

    let groups: Arc<dyn ResourceManager<Target = GroupRef>> = Arc::new(
        InstanceGroupManager::new(aws_sdk_autoscaling::Client::new(&sdk_config)),
    );
    let services: Arc<dyn ResourceManager<Target = ServiceRef>> = Arc::new(
        ContainerServiceManager::new(aws_sdk_ecs::Client::new(&sdk_config)),
    );

    let groups: GroupAdjuster = GroupAdjuster::new(groups)
        .with_config(adjuster_config.clone())
        .with_logger(logger.clone());
    let services: ServiceAdjuster = ServiceAdjuster::new(services)
        .with_config(adjuster_config)
        .with_logger(logger);

    AppState::new(health_registry, Arc::new(groups), Arc::new(services))
}
