//! Core library for the fleet scaler
//!
//! This crate provides the capacity-adjustment core:
//! - Capacity calculation under a resource's operating bounds
//! - Resource Manager capability with instance-group and container-service variants
//! - Adjustment orchestration (read, compute, apply)
//! - Trigger payload decoding
//! - Health checks and observability

pub mod calculator;
pub mod error;
pub mod health;
pub mod lease;
pub mod manager;
pub mod models;
pub mod observability;
pub mod orchestrator;
pub mod trigger;

pub use calculator::compute;
pub use error::{AdjustError, AdjustFailure, CalculatorError, ManagerError};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use lease::ResourceLeases;
pub use manager::{
    ContainerServiceManager, GroupRef, InstanceGroupManager, ResourceManager, ServiceRef,
};
pub use models::*;
pub use observability::{ScalerMetrics, StructuredLogger};
pub use orchestrator::{Adjuster, AdjusterConfig};
pub use trigger::{ContainerServiceTrigger, InstanceGroupTrigger, TriggerError};
