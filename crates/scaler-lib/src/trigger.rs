//! Trigger payload decoding
//!
//! Payloads arrive per invocation from the external trigger source. The
//! field names used by scheduled-event documents (`asg_name`, `cmd`,
//! `count`) are accepted alongside the canonical ones.

use crate::manager::{GroupRef, ServiceRef};
use crate::models::{ScaleMode, ScalingRequest};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejections for payloads that cannot address a resource
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriggerError {
    #[error("trigger field `{0}` must not be empty")]
    EmptyField(&'static str),
}

/// Trigger for an instance group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceGroupTrigger {
    #[serde(alias = "asg_name", alias = "resourceRef")]
    pub group: String,
    #[serde(alias = "cmd")]
    pub mode: ScaleMode,
    #[serde(alias = "count")]
    pub amount: i64,
}

/// Trigger for a container service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerServiceTrigger {
    pub cluster: String,
    pub service: String,
    #[serde(alias = "cmd")]
    pub mode: ScaleMode,
    #[serde(alias = "count")]
    pub amount: i64,
}

impl InstanceGroupTrigger {
    pub fn into_request(self) -> Result<ScalingRequest<GroupRef>, TriggerError> {
        let group = non_empty("group", self.group)?;
        Ok(ScalingRequest::new(GroupRef::new(group), self.mode, self.amount))
    }
}

impl ContainerServiceTrigger {
    pub fn into_request(self) -> Result<ScalingRequest<ServiceRef>, TriggerError> {
        let cluster = non_empty("cluster", self.cluster)?;
        let service = non_empty("service", self.service)?;
        Ok(ScalingRequest::new(
            ServiceRef::new(cluster, service),
            self.mode,
            self.amount,
        ))
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String, TriggerError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TriggerError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}
