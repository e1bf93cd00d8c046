//! Resource Manager capability
//!
//! A resource manager is the external control plane that owns the desired
//! capacity of a scalable resource. Two variants are provided:
//! - Instance groups (EC2 Auto Scaling), bounded, `add` starts from desired
//! - Container services (ECS), unbounded, `add` starts from running

mod container_service;
mod instance_group;


pub use container_service::{ContainerServiceManager, ServiceRef};
pub use instance_group::{GroupRef, InstanceGroupManager};

use crate::error::ManagerError;
use crate::models::{Ack, Baseline, ResolvedCapacity, ResourceKind, ResourceState};
use std::fmt;

pub use async_trait::async_trait;

/// Trait for resource manager implementations
#[async_trait]
pub trait ResourceManager: Send + Sync {
    /// Identifier of one resource governed by this manager
    type Target: fmt::Display + Send + Sync;

    /// Kind of resource this manager governs
    fn kind(&self) -> ResourceKind;

    /// Observed count that `add` requests start from
    fn baseline(&self) -> Baseline;

    /// Fetch the current state of `target`
    async fn describe(&self, target: &Self::Target) -> Result<ResourceState, ManagerError>;

    /// Set the desired capacity of `target`
    async fn set_desired(
        &self,
        target: &Self::Target,
        capacity: ResolvedCapacity,
    ) -> Result<Ack, ManagerError>;
}

/// Convert a resolved target into the control plane's 32-bit capacity field.
///
/// The calculator already rejects targets above `calculator::MAX_CAPACITY`;
/// this guards callers that reach a manager directly.
pub(crate) fn wire_capacity(target: &dyn fmt::Display, value: i64) -> Result<i32, ManagerError> {
    i32::try_from(value).map_err(|_| {
        ManagerError::Unavailable(format!(
            "capacity {} for {} exceeds the control plane limit",
            value, target
        ))
    })
}
