//! Configuration validation

use super::models::{ClientConfig, ClientSettings, Credentials, ServiceConfig};
use crate::utils::error::{ODataError, Result};
use tracing::debug;

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        debug!("Validating client configuration");
        self.service.validate()?;
        self.credentials.validate()?;
        self.settings.validate()?;
        Ok(())
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        self.endpoint().map(|_| ())
    }
}

impl Validate for Credentials {
    fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(ODataError::Config("Username must not be empty".to_string()));
        }
        if self.username.contains(':') {
            return Err(ODataError::Config(
                "Username must not contain ':' for basic authentication".to_string(),
            ));
        }
        if self.password.is_empty() {
            return Err(ODataError::Config("Password must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Validate for ClientSettings {
    fn validate(&self) -> Result<()> {
        if self.timeout == 0 {
            return Err(ODataError::Config(
                "Timeout must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
