//! Resource manager client construction

use crate::config::ScalerConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use scaler_lib::{HealthRegistry, ResourceKind};
use tracing::warn;

/// Load the shared AWS configuration, honouring an explicit region override
pub async fn load_sdk_config(config: &ScalerConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    loader.load().await
}

/// Why clients built from `sdk_config` cannot reach either control plane
pub fn sdk_config_problem(sdk_config: &SdkConfig) -> Option<&'static str> {
    if sdk_config.region().is_none() {
        Some("no AWS region configured")
    } else if sdk_config.credentials_provider().is_none() {
        Some("no AWS credentials provider configured")
    } else {
        None
    }
}

/// Record the integration health implied by the loaded configuration
pub async fn record_client_health(sdk_config: &SdkConfig, health_registry: &HealthRegistry) {
    let problem = sdk_config_problem(sdk_config);

    for kind in [ResourceKind::InstanceGroup, ResourceKind::ContainerService] {
        match problem {
            Some(reason) => {
                warn!(kind = %kind, reason, "Resource manager client cannot be used");
                health_registry.set_unhealthy(kind, reason).await;
            }
            None => health_registry.set_healthy(kind).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ecs::config::{Credentials, SharedCredentialsProvider};
    use scaler_lib::ComponentStatus;

    fn registry() -> HealthRegistry {
        HealthRegistry::new()
    }

    #[tokio::test]
    async fn test_missing_region_marks_integrations_unhealthy() {
        let health_registry = registry();
        health_registry.set_ready(true).await;

        record_client_health(&SdkConfig::builder().build(), &health_registry).await;

        let health = health_registry.health().await;
        assert_eq!(health.status, ComponentStatus::Unhealthy);
        assert_eq!(
            health.components["container_service"].status,
            ComponentStatus::Unhealthy
        );
        assert!(!health_registry.readiness().await.ready);
    }

    #[test]
    fn test_missing_credentials_is_reported() {
        let sdk_config = SdkConfig::builder()
            .region(Region::new("eu-west-1"))
            .build();

        assert_eq!(
            sdk_config_problem(&sdk_config),
            Some("no AWS credentials provider configured")
        );
    }

    #[tokio::test]
    async fn test_complete_config_is_healthy() {
        let sdk_config = SdkConfig::builder()
            .region(Region::new("eu-west-1"))
            .credentials_provider(SharedCredentialsProvider::new(Credentials::new(
                "AKIDTEST", "secret", None, None, "test",
            )))
            .build();
        let health_registry = registry();
        health_registry.set_ready(true).await;

        record_client_health(&sdk_config, &health_registry).await;

        let health = health_registry.health().await;
        assert_eq!(health.status, ComponentStatus::Healthy);
        assert!(health_registry.readiness().await.ready);
    }
}
