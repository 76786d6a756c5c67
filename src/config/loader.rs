//! Configuration loading utilities
//!
//! This module provides utilities for loading configuration from the
//! environment and from YAML files.

use super::models::ClientConfig;
use crate::utils::error::{ODataError, Result};
use std::env;
use std::path::Path;
use tracing::{debug, info};

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// Reads `ODATA_TENANT`, `ODATA_SERVICE_ROOT`, `ODATA_USERNAME`,
    /// `ODATA_PASSWORD`, `ODATA_EXECUTION_MODE`, `ODATA_TRAFFIC_LOGGING` and
    /// `ODATA_TIMEOUT`.
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup, using the `ODATA_*` names
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.service.tenant = lookup("ODATA_TENANT");
        config.service.service_root = lookup("ODATA_SERVICE_ROOT");

        if let Some(username) = lookup("ODATA_USERNAME") {
            config.credentials.username = username;
        }
        if let Some(password) = lookup("ODATA_PASSWORD") {
            config.credentials.password = password;
        }

        if let Some(mode) = lookup("ODATA_EXECUTION_MODE") {
            config.settings.mode = mode.parse()?;
        }
        if let Some(logging) = lookup("ODATA_TRAFFIC_LOGGING") {
            config.settings.traffic_logging = parse_flag(&logging).ok_or_else(|| {
                ODataError::Config(format!("Invalid ODATA_TRAFFIC_LOGGING: {}", logging))
            })?;
        }
        if let Some(timeout) = lookup("ODATA_TIMEOUT") {
            config.settings.timeout = timeout
                .trim()
                .parse()
                .map_err(|e| ODataError::Config(format!("Invalid ODATA_TIMEOUT: {}", e)))?;
        }

        debug!("Configuration loaded from environment variables");
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|e| {
            ODataError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            ODataError::Config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
