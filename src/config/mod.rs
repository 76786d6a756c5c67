//! Configuration management for the OData client
//!
//! This module handles loading, validation, and management of client configuration.

pub mod builder;
pub mod endpoint;
pub mod loader;
pub mod models;
pub mod validation;

pub use builder::ConfigBuilder;
pub use endpoint::ServiceEndpoint;
pub use models::*;
pub use validation::Validate;
