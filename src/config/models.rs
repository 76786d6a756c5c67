//! Configuration data structures

use super::endpoint::ServiceEndpoint;
use crate::utils::error::{ODataError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Top-level client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Which service to talk to
    #[serde(default)]
    pub service: ServiceConfig,
    /// Basic-auth credentials for the service user
    #[serde(default)]
    pub credentials: Credentials,
    /// Settings
    #[serde(default)]
    pub settings: ClientSettings,
}

/// Service location
///
/// An explicit `service_root` wins over `tenant`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// C4C tenant id, the `<id>` in `my<id>.crm.ondemand.com`
    pub tenant: Option<String>,
    /// Full OData service root URL
    pub service_root: Option<String>,
}

impl ServiceConfig {
    /// Resolve the service endpoint
    pub fn endpoint(&self) -> Result<ServiceEndpoint> {
        match (&self.service_root, &self.tenant) {
            (Some(root), _) => ServiceEndpoint::new(root),
            (None, Some(tenant)) => ServiceEndpoint::for_tenant(tenant),
            (None, None) => Err(ODataError::Config(
                "Either service.tenant or service.service_root must be set".to_string(),
            )),
        }
    }
}

/// Basic-auth credentials
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// How calls are executed, fixed for the lifetime of a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionMode {
    /// The caller's thread performs the call and gets the decoded result
    #[default]
    #[serde(alias = "sync")]
    Blocking,
    /// Calls are dispatched in the background and return a pending handle
    #[serde(alias = "async")]
    NonBlocking,
}

impl FromStr for ExecutionMode {
    type Err = ODataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "blocking" | "sync" => Ok(ExecutionMode::Blocking),
            "non-blocking" | "nonblocking" | "async" => Ok(ExecutionMode::NonBlocking),
            other => Err(ODataError::Config(format!(
                "Invalid execution mode '{}', expected blocking or non-blocking",
                other
            ))),
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Blocking => f.write_str("blocking"),
            ExecutionMode::NonBlocking => f.write_str("non-blocking"),
        }
    }
}

/// Settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Blocking or non-blocking execution
    pub mode: ExecutionMode,
    /// Log raw request and response bodies
    pub traffic_logging: bool,
    /// Request timeout in seconds
    pub timeout: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Blocking,
            traffic_logging: true,
            timeout: 30,
        }
    }
}

impl ClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}
