//! Fluent builder for client configuration

use super::models::{ClientConfig, Credentials, ExecutionMode};

/// Builder for [`ClientConfig`]
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: ClientConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// C4C tenant id
    pub fn tenant(mut self, tenant: impl Into<String>) -> Self {
        self.config.service.tenant = Some(tenant.into());
        self
    }

    /// Explicit OData service root, overrides the tenant
    pub fn service_root(mut self, root: impl Into<String>) -> Self {
        self.config.service.service_root = Some(root.into());
        self
    }

    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.credentials = Credentials::new(username, password);
        self
    }

    pub fn mode(mut self, mode: ExecutionMode) -> Self {
        self.config.settings.mode = mode;
        self
    }

    pub fn traffic_logging(mut self, enabled: bool) -> Self {
        self.config.settings.traffic_logging = enabled;
        self
    }

    /// Request timeout in seconds
    pub fn timeout(mut self, timeout: u64) -> Self {
        self.config.settings.timeout = timeout;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
