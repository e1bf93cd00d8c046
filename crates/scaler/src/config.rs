//! Scaler configuration

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

/// Scaler configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScalerConfig {
    /// Name of this scaler instance, used in log lines
    #[serde(default = "default_instance_name")]
    pub instance_name: String,

    /// API server port for triggers, health and metrics
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// AWS region override; the default provider chain is used when unset
    #[serde(default)]
    pub region: Option<String>,

    /// Deadline for each resource manager call in seconds (0 disables)
    #[serde(default = "default_call_timeout")]
    pub call_timeout_secs: u64,

    /// Serialise adjustments that target the same resource
    #[serde(default)]
    pub serialize_per_resource: bool,
}

fn default_instance_name() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string())
}

fn default_api_port() -> u16 {
    8080
}

fn default_call_timeout() -> u64 {
    10
}

impl Default for ScalerConfig {
    fn default() -> Self {
        Self {
            instance_name: default_instance_name(),
            api_port: default_api_port(),
            region: None,
            call_timeout_secs: default_call_timeout(),
            serialize_per_resource: false,
        }
    }
}

impl ScalerConfig {
    /// Load configuration from `SCALER_*` environment variables
    pub fn load() -> Result<Self> {
        Self::from_environment(config::Environment::with_prefix("SCALER"))
    }

    pub fn from_environment(environment: config::Environment) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(environment.try_parsing(true))
            .build()
            .context("Failed to read scaler configuration")?;

        config
            .try_deserialize()
            .context("Invalid scaler configuration")
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        (self.call_timeout_secs > 0).then(|| Duration::from_secs(self.call_timeout_secs))
    }
}
