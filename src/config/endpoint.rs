//! Service endpoint URLs

use crate::utils::error::{ODataError, Result};
use url::Url;

/// Root URL of an OData service, always ending in `/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    root: String,
}

impl ServiceEndpoint {
    pub fn new(root: &str) -> Result<Self> {
        let url = Url::parse(root)
            .map_err(|e| ODataError::Config(format!("Invalid service root '{}': {}", root, e)))?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ODataError::Config(format!(
                    "Service root must use http:// or https://, got: {}",
                    scheme
                )));
            }
        }

        let mut root = url.to_string();
        if !root.ends_with('/') {
            root.push('/');
        }
        Ok(Self { root })
    }

    /// Standard C4C OData API root for a tenant
    pub fn for_tenant(tenant: &str) -> Result<Self> {
        if tenant.trim().is_empty() {
            return Err(ODataError::Config("Tenant id must not be empty".to_string()));
        }
        Self::new(&format!(
            "https://my{}.crm.ondemand.com/sap/c4c/odata/v1/c4codataapi/",
            tenant.trim()
        ))
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Target of the priming token call
    pub fn metadata_url(&self) -> String {
        self.resource_url("$metadata")
    }

    pub fn batch_url(&self) -> String {
        self.resource_url("$batch")
    }

    /// Absolute URL for a target relative to the root, e.g. `Items?$top=5`
    pub fn resource_url(&self, relative: &str) -> String {
        format!("{}{}", self.root, relative.trim_start_matches('/'))
    }
}
