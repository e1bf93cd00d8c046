//! Invocation harness for the fleet scaler
//!
//! Loads configuration, constructs the resource manager clients once and
//! exposes the HTTP trigger surface.

pub mod api;
pub mod clients;
pub mod config;
