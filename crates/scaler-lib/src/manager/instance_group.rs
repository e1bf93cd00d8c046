//! Instance-group variant backed by EC2 Auto Scaling

use super::{async_trait, wire_capacity, ResourceManager};
use crate::error::ManagerError;
use crate::models::{Ack, Baseline, ResolvedCapacity, ResourceKind, ResourceState};
use aws_sdk_autoscaling::error::DisplayErrorContext;
use aws_sdk_autoscaling::types::AutoScalingGroup;
use aws_sdk_autoscaling::Client;
use std::fmt;
use tracing::debug;

/// Name of an Auto Scaling group
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupRef(String);

impl GroupRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resource manager for Auto Scaling groups
///
/// Groups always carry platform min/max bounds; `add` starts from the
/// group's desired capacity.
#[derive(Debug, Clone)]
pub struct InstanceGroupManager {
    client: Client,
}

impl InstanceGroupManager {
    /// Wrap an already constructed Auto Scaling client
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceManager for InstanceGroupManager {
    type Target = GroupRef;

    fn kind(&self) -> ResourceKind {
        ResourceKind::InstanceGroup
    }

    fn baseline(&self) -> Baseline {
        Baseline::Desired
    }

    async fn describe(&self, target: &GroupRef) -> Result<ResourceState, ManagerError> {
        let output = self
            .client
            .describe_auto_scaling_groups()
            .auto_scaling_group_names(target.as_str())
            .send()
            .await
            .map_err(|err| ManagerError::Unavailable(DisplayErrorContext(&err).to_string()))?;

        let group = output
            .auto_scaling_groups()
            .first()
            .ok_or_else(|| ManagerError::NotFound(format!("auto scaling group {}", target)))?;

        debug!(group = %target, data = ?group, "Described auto scaling group");

        group_state(target, group)
    }

    async fn set_desired(
        &self,
        target: &GroupRef,
        capacity: ResolvedCapacity,
    ) -> Result<Ack, ManagerError> {
        let desired = wire_capacity(target, capacity.target)?;

        self.client
            .set_desired_capacity()
            .auto_scaling_group_name(target.as_str())
            .desired_capacity(desired)
            .send()
            .await
            .map_err(|err| ManagerError::Unavailable(DisplayErrorContext(&err).to_string()))?;

        Ok(Ack {
            applied: capacity.target,
        })
    }
}

/// Map a described group onto its capacity state; every capacity field is required
pub(super) fn group_state(
    target: &GroupRef,
    group: &AutoScalingGroup,
) -> Result<ResourceState, ManagerError> {
    let field = |name: &str, value: Option<i32>| {
        value.map(i64::from).ok_or_else(|| {
            ManagerError::Unavailable(format!("group {} reported no {}", target, name))
        })
    };

    Ok(ResourceState {
        desired: field("desired capacity", Option::from(group.desired_capacity()))?,
        min: Some(field("min size", Option::from(group.min_size()))?),
        max: Some(field("max size", Option::from(group.max_size()))?),
        running: None,
    })
}
