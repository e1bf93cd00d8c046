//! Container-service variant backed by ECS

use super::{async_trait, wire_capacity, ResourceManager};
use crate::error::ManagerError;
use crate::models::{Ack, Baseline, ResolvedCapacity, ResourceKind, ResourceState};
use aws_sdk_ecs::error::DisplayErrorContext;
use aws_sdk_ecs::types::Failure;
use aws_sdk_ecs::Client;
use std::fmt;
use tracing::debug;

const INACTIVE_STATUS: &str = "INACTIVE";
const MISSING_REASON: &str = "MISSING";

/// Cluster and service name of an ECS service
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceRef {
    pub cluster: String,
    pub service: String,
}

impl ServiceRef {
    pub fn new(cluster: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            cluster: cluster.into(),
            service: service.into(),
        }
    }
}

impl fmt::Display for ServiceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.cluster, self.service)
    }
}

/// Resource manager for ECS services
///
/// Services have no platform min/max; `add` starts from the running count.
#[derive(Debug, Clone)]
pub struct ContainerServiceManager {
    client: Client,
}

impl ContainerServiceManager {
    /// Wrap an already constructed ECS client
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceManager for ContainerServiceManager {
    type Target = ServiceRef;

    fn kind(&self) -> ResourceKind {
        ResourceKind::ContainerService
    }

    fn baseline(&self) -> Baseline {
        Baseline::Running
    }

    async fn describe(&self, target: &ServiceRef) -> Result<ResourceState, ManagerError> {
        let result = self
            .client
            .describe_services()
            .cluster(&target.cluster)
            .services(&target.service)
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(err) => {
                let cluster_missing = err
                    .as_service_error()
                    .map(|e| e.is_cluster_not_found_exception())
                    .unwrap_or(false);
                if cluster_missing {
                    return Err(ManagerError::NotFound(format!("cluster {}", target.cluster)));
                }
                return Err(ManagerError::Unavailable(
                    DisplayErrorContext(&err).to_string(),
                ));
            }
        };

        for failure in output.failures() {
            debug!(
                service = %target,
                reason = ?failure.reason(),
                detail = ?failure.detail(),
                "Describe services reported failure"
            );
        }

        let service = match output.services().first() {
            Some(service) if service.status() == Some(INACTIVE_STATUS) => {
                return Err(ManagerError::NotFound(format!("service {}", target)));
            }
            Some(service) => service,
            None => return Err(missing_service(target, output.failures())),
        };

        debug!(service = %target, data = ?service, "Described container service");

        let desired: Option<i32> = Option::from(service.desired_count());
        let running: Option<i32> = Option::from(service.running_count());

        Ok(ResourceState {
            desired: desired.map(i64::from).unwrap_or_default(),
            min: None,
            max: None,
            running: running.map(i64::from),
        })
    }

    async fn set_desired(
        &self,
        target: &ServiceRef,
        capacity: ResolvedCapacity,
    ) -> Result<Ack, ManagerError> {
        let desired = wire_capacity(target, capacity.target)?;

        self.client
            .update_service()
            .cluster(&target.cluster)
            .service(&target.service)
            .desired_count(desired)
            .send()
            .await
            .map_err(|err| ManagerError::Unavailable(DisplayErrorContext(&err).to_string()))?;

        Ok(Ack {
            applied: capacity.target,
        })
    }
}

/// Classify an empty `DescribeServices` result from its reported failures
fn missing_service(target: &ServiceRef, failures: &[Failure]) -> ManagerError {
    match failures.first() {
        Some(failure) if failure.reason() != Some(MISSING_REASON) => {
            ManagerError::Unavailable(format!(
                "describe services for {} failed: {} ({})",
                target,
                failure.reason().unwrap_or("unknown reason"),
                failure.detail().unwrap_or("no detail")
            ))
        }
        _ => ManagerError::NotFound(format!("service {}", target)),
    }
}
