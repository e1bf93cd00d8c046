//! Error types for capacity adjustment

use crate::models::{ResourceKind, ResourceState, ScaleMode, Stage};
use std::fmt;
use thiserror::Error;

/// Rejections raised by the capacity calculator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalculatorError {
    #[error("invalid bounds: min {min} exceeds max {max}")]
    InvalidBounds { min: i64, max: i64 },

    #[error("resolved capacity {target} is negative")]
    NegativeCapacity { target: i64 },

    #[error("resolved capacity {target} exceeds the limit of {limit}")]
    CapacityOutOfRange { target: i64, limit: i64 },
}

/// Failures reported by a resource manager
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManagerError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("resource manager unavailable: {0}")]
    Unavailable(String),
}

/// Cause of a failed adjustment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdjustFailure {
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    #[error("invalid bounds: min {min} exceeds max {max}")]
    InvalidBounds { min: i64, max: i64 },

    #[error("resolved capacity {target} is negative")]
    NegativeCapacity { target: i64 },

    #[error("resolved capacity {target} exceeds the limit of {limit}")]
    CapacityOutOfRange { target: i64, limit: i64 },

    #[error("transient read error: {0}")]
    TransientReadError(String),

    #[error("transient write error: {0}")]
    TransientWriteError(String),
}

impl AdjustFailure {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AdjustFailure::ResourceNotFound(_) => "resource_not_found",
            AdjustFailure::InvalidBounds { .. } => "invalid_bounds",
            AdjustFailure::NegativeCapacity { .. } => "negative_capacity",
            AdjustFailure::CapacityOutOfRange { .. } => "capacity_out_of_range",
            AdjustFailure::TransientReadError(_) => "transient_read_error",
            AdjustFailure::TransientWriteError(_) => "transient_write_error",
        }
    }

    /// Whether the external trigger layer may retry the invocation
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AdjustFailure::TransientReadError(_) | AdjustFailure::TransientWriteError(_)
        )
    }
}

impl From<CalculatorError> for AdjustFailure {
    fn from(err: CalculatorError) -> Self {
        match err {
            CalculatorError::InvalidBounds { min, max } => AdjustFailure::InvalidBounds { min, max },
            CalculatorError::NegativeCapacity { target } => {
                AdjustFailure::NegativeCapacity { target }
            }
            CalculatorError::CapacityOutOfRange { target, limit } => {
                AdjustFailure::CapacityOutOfRange { target, limit }
            }
        }
    }
}

/// A failed adjustment with the context needed to diagnose it
#[derive(Debug, Clone)]
pub struct AdjustError {
    pub resource: String,
    pub kind: ResourceKind,
    pub mode: ScaleMode,
    pub amount: i64,
    /// Stage that was executing when the failure occurred
    pub stage: Stage,
    /// Every stage entered, ending in `Failed`
    pub stages: Vec<Stage>,
    /// State read before the failure; `None` when reading failed
    pub observed: Option<ResourceState>,
    /// Capacity resolved before the failure; `None` when computing did not finish
    pub target: Option<i64>,
    pub cause: AdjustFailure,
}

impl AdjustError {
    pub fn code(&self) -> &'static str {
        self.cause.code()
    }

    pub fn is_transient(&self) -> bool {
        self.cause.is_transient()
    }

    /// Bounds reported by the resource, once it has been read
    pub fn bounds_label(&self) -> Option<String> {
        self.observed.as_ref().map(ResourceState::bounds_label)
    }
}

impl fmt::Display for AdjustError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} adjustment of {} ({} {}) failed while {}",
            self.kind, self.resource, self.mode, self.amount, self.stage
        )?;
        match (self.target, self.bounds_label()) {
            (Some(target), Some(bounds)) => write!(f, " (target {}, bounds {})", target, bounds)?,
            (Some(target), None) => write!(f, " (target {})", target)?,
            (None, Some(bounds)) => write!(f, " (bounds {})", bounds)?,
            (None, None) => {}
        }
        write!(f, ": {}", self.cause)
    }
}

impl std::error::Error for AdjustError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_error_message_carries_context() {
        let err = AdjustError {
            resource: "web-asg".to_string(),
            kind: ResourceKind::InstanceGroup,
            mode: ScaleMode::Add,
            amount: 2,
            stage: Stage::Reading,
            stages: vec![Stage::Start, Stage::Reading, Stage::Failed],
            observed: None,
            target: None,
            cause: AdjustFailure::TransientReadError("throttled".to_string()),
        };

        let message = err.to_string();
        assert!(message.contains("web-asg"));
        assert!(message.contains("add 2"));
        assert!(message.contains("reading"));
        assert!(message.contains("throttled"));
        assert!(err.is_transient());
        assert_eq!(err.code(), "transient_read_error");
        assert_eq!(err.bounds_label(), None);
        assert!(!message.contains("target"));
    }

    #[test]
    fn test_write_failure_message_carries_resolution() {
        let err = AdjustError {
            resource: "web-asg".to_string(),
            kind: ResourceKind::InstanceGroup,
            mode: ScaleMode::Add,
            amount: 1,
            stage: Stage::Applying,
            stages: vec![
                Stage::Start,
                Stage::Reading,
                Stage::Computing,
                Stage::Applying,
                Stage::Failed,
            ],
            observed: Some(ResourceState::bounded(2, 1, 5)),
            target: Some(3),
            cause: AdjustFailure::TransientWriteError("access denied".to_string()),
        };

        assert_eq!(
            err.to_string(),
            "instance_group adjustment of web-asg (add 1) failed while applying \
             (target 3, bounds [1, 5]): transient write error: access denied"
        );
    }

    #[test]
    fn test_capacity_out_of_range_is_terminal() {
        let failure: AdjustFailure = CalculatorError::CapacityOutOfRange {
            target: 1 << 40,
            limit: i64::from(i32::MAX),
        }
        .into();
        assert_eq!(failure.code(), "capacity_out_of_range");
        assert!(!failure.is_transient());
    }

    #[test]
    fn test_calculator_errors_convert() {
        let failure: AdjustFailure = CalculatorError::InvalidBounds { min: 5, max: 1 }.into();
        assert_eq!(failure, AdjustFailure::InvalidBounds { min: 5, max: 1 });
        assert!(!failure.is_transient());
    }
}
