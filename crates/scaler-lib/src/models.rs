//! Core data models for capacity adjustment

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of scalable resource a manager governs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A fleet of compute instances with platform min/max bounds
    InstanceGroup,
    /// A container service with no platform bounds
    ContainerService,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::InstanceGroup => "instance_group",
            ResourceKind::ContainerService => "container_service",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Command mode carried by a trigger
///
/// `add` applies a signed delta to the baseline. Any other command is an
/// absolute target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMode {
    Add,
    #[serde(other)]
    Set,
}

impl fmt::Display for ScaleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleMode::Add => write!(f, "add"),
            ScaleMode::Set => write!(f, "set"),
        }
    }
}

/// One requested capacity change for a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalingRequest<T> {
    pub resource: T,
    pub mode: ScaleMode,
    pub amount: i64,
}

impl<T> ScalingRequest<T> {
    pub fn new(resource: T, mode: ScaleMode, amount: i64) -> Self {
        Self {
            resource,
            mode,
            amount,
        }
    }

    pub fn set(resource: T, amount: i64) -> Self {
        Self::new(resource, ScaleMode::Set, amount)
    }

    pub fn add(resource: T, amount: i64) -> Self {
        Self::new(resource, ScaleMode::Add, amount)
    }
}

/// Which observed count `add` treats as its starting point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Baseline {
    Desired,
    Running,
}

/// Point-in-time snapshot of a resource as reported by its manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceState {
    pub desired: i64,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub running: Option<i64>,
}

impl ResourceState {
    /// State of a bounded resource (instance group)
    pub fn bounded(desired: i64, min: i64, max: i64) -> Self {
        Self {
            desired,
            min: Some(min),
            max: Some(max),
            running: None,
        }
    }

    /// State of an unbounded resource that reports its running count
    pub fn unbounded(desired: i64, running: i64) -> Self {
        Self {
            desired,
            min: None,
            max: None,
            running: Some(running),
        }
    }

    /// Count used as the starting point for `add`.
    ///
    /// Falls back to the desired count when the resource does not report
    /// a running count.
    pub fn baseline(&self, baseline: Baseline) -> i64 {
        match baseline {
            Baseline::Desired => self.desired,
            Baseline::Running => self.running.unwrap_or(self.desired),
        }
    }

    /// Human-readable bounds, e.g. `[1, 5]` or `unbounded`
    pub fn bounds_label(&self) -> String {
        bounds_label(self.min, self.max)
    }
}

pub(crate) fn bounds_label(min: Option<i64>, max: Option<i64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("[{}, {}]", min, max),
        (Some(min), None) => format!("[{}, ..)", min),
        (None, Some(max)) => format!("(.., {}]", max),
        (None, None) => "unbounded".to_string(),
    }
}

/// Output of the capacity calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCapacity {
    pub target: i64,
}

/// Acknowledgement from a resource manager write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub applied: i64,
}

/// Orchestration stage for one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Start,
    Reading,
    Computing,
    Applying,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::Reading => "reading",
            Stage::Computing => "computing",
            Stage::Applying => "applying",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Outcome of a successful adjustment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentReport {
    pub resource: String,
    pub kind: ResourceKind,
    pub mode: ScaleMode,
    pub amount: i64,
    pub baseline: i64,
    pub previous_desired: i64,
    pub target: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    pub stages: Vec<Stage>,
    pub completed_at: i64,
}

impl AdjustmentReport {
    pub fn bounds_label(&self) -> String {
        bounds_label(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_mode_parses_add_and_set() {
        let add: ScaleMode = serde_json::from_str("\"add\"").unwrap();
        let set: ScaleMode = serde_json::from_str("\"set\"").unwrap();

        assert_eq!(add, ScaleMode::Add);
        assert_eq!(set, ScaleMode::Set);
    }

    #[test]
    fn test_unknown_command_is_absolute() {
        let mode: ScaleMode = serde_json::from_str("\"scale\"").unwrap();
        assert_eq!(mode, ScaleMode::Set);
    }

    #[test]
    fn test_running_baseline_falls_back_to_desired() {
        let state = ResourceState::bounded(3, 1, 5);
        assert_eq!(state.baseline(Baseline::Running), 3);

        let state = ResourceState::unbounded(4, 7);
        assert_eq!(state.baseline(Baseline::Running), 7);
        assert_eq!(state.baseline(Baseline::Desired), 4);
    }

    #[test]
    fn test_bounds_label() {
        assert_eq!(ResourceState::bounded(2, 1, 5).bounds_label(), "[1, 5]");
        assert_eq!(ResourceState::unbounded(2, 2).bounds_label(), "unbounded");
    }
}
