//! # odata-batch-rs
//!
//! Client for SAP Cloud for Customer OData v2 services with `$batch` support.
//!
//! ## Features
//!
//! - **CSRF session**: token and cookies negotiated once per client
//! - **Batch encoding**: `multipart/mixed` envelopes with nested changesets
//!   and automatic `Content-ID` numbering
//! - **Response decoding**: batch responses decoded into a tree that mirrors
//!   the request layout
//! - **Two execution modes**: blocking calls return results, non-blocking
//!   calls return [`PendingResponse`] handles
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use odata_batch::{BatchItem, Changeset, ConfigBuilder, Execute, BlockingClient, ODataRequest};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigBuilder::new()
//!         .tenant("351234")
//!         .credentials("svc_user", "secret")
//!         .build();
//!     let client = BlockingClient::connect(&config)?;
//!
//!     let accounts = client.send(&ODataRequest::get("AccountCollection").query("top", "5"))?;
//!     println!("{}", accounts);
//!
//!     let mut items = vec![
//!         BatchItem::from(ODataRequest::get("ContactCollection").query("top", "1")),
//!         BatchItem::from(Changeset::new(vec![
//!             ODataRequest::post("ContactCollection").body(r#"{"FirstName":"Ada"}"#),
//!         ])),
//!     ];
//!     let parts = client.send_batch(&mut items)?;
//!     println!("{} parts", parts.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Non-blocking
//!
//! ```rust,no_run
//! use odata_batch::{AsyncClient, ClientConfig, Execute, ODataRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::from_env()?;
//!     let client = AsyncClient::connect(&config).await?;
//!
//!     let pending = client.send(&ODataRequest::get("AccountCollection"));
//!     let accounts = pending.await?;
//!     println!("{}", accounts);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod auth;
pub mod client;
pub mod config;
pub mod core;
pub mod utils;

pub use auth::AuthSession;
pub use client::{
    AsyncClient, BlockingClient, Deferred, Execute, LazyField, ODataClient, PendingResponse,
    TrafficLogger,
};
pub use config::{ClientConfig, ConfigBuilder, Credentials, ExecutionMode, Validate};
pub use core::{
    BatchEncoder, BatchItem, Changeset, Method, ODataRequest, ParsedResponse, ResponseDecoder,
    ResponseLeaf,
};
pub use utils::error::{ODataError, Result};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information captured by the build script
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    /// Seconds since the Unix epoch
    pub build_time: &'static str,
    pub git_hash: &'static str,
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
            rust_version: env!("RUST_VERSION"),
        }
    }
}

pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
