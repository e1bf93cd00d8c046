//! Capacity calculation
//!
//! Pure computation of the new desired capacity from a request and the
//! observed resource state. No I/O.

use crate::error::CalculatorError;
use crate::models::{Baseline, ResolvedCapacity, ResourceState, ScaleMode, ScalingRequest};

/// Largest capacity either control plane accepts (32-bit capacity fields)
pub const MAX_CAPACITY: i64 = i32::MAX as i64;

/// Compute the new desired capacity for `request`.
///
/// `baseline` selects which observed count `add` starts from and is
/// supplied by the caller because it differs per resource kind. The
/// candidate is clamped into whatever bounds the state reports; a state
/// without bounds passes through unclamped.
pub fn compute<T>(
    request: &ScalingRequest<T>,
    state: &ResourceState,
    baseline: Baseline,
) -> Result<ResolvedCapacity, CalculatorError> {
    if let (Some(min), Some(max)) = (state.min, state.max) {
        if min > max {
            return Err(CalculatorError::InvalidBounds { min, max });
        }
    }

    let candidate = match request.mode {
        ScaleMode::Set => request.amount,
        ScaleMode::Add => state.baseline(baseline).saturating_add(request.amount),
    };

    let target = clamp(candidate, state.min, state.max);
    if target < 0 {
        return Err(CalculatorError::NegativeCapacity { target });
    }
    if target > MAX_CAPACITY {
        return Err(CalculatorError::CapacityOutOfRange {
            target,
            limit: MAX_CAPACITY,
        });
    }

    Ok(ResolvedCapacity { target })
}

fn clamp(candidate: i64, min: Option<i64>, max: Option<i64>) -> i64 {
    let mut value = candidate;
    if let Some(max) = max {
        value = value.min(max);
    }
    if let Some(min) = min {
        value = value.max(min);
    }
    value
}
