//! Blocking execution
//!
//! The caller's thread drives a private current-thread runtime for the
//! duration of each call. Build and drop this client outside async code.

use super::Execute;
use super::traffic::TrafficLogger;
use super::transport::{ODataTransport, default_logger};
use crate::auth::AuthSession;
use crate::config::ClientConfig;
use crate::core::{BatchItem, ODataRequest, ParsedResponse, ResponseDecoder, decode_json_body};
use crate::utils::error::Result;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};
use tracing::info;

/// Client whose calls return decoded results directly
pub struct BlockingClient {
    runtime: Runtime,
    transport: ODataTransport,
}

impl BlockingClient {
    /// Connect using the logger selected by `settings.traffic_logging`
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        Self::connect_with_logger(config, default_logger(&config.settings))
    }

    /// Connect with an injected traffic logger
    pub fn connect_with_logger(
        config: &ClientConfig,
        logger: Arc<dyn TrafficLogger>,
    ) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let transport = runtime.block_on(ODataTransport::connect(config, logger))?;

        info!("Blocking OData client connected to {}", transport.endpoint().root());
        Ok(Self { runtime, transport })
    }

    /// Wrap an already connected transport
    pub fn from_transport(transport: ODataTransport) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { runtime, transport })
    }

    pub fn session(&self) -> &AuthSession {
        self.transport.session()
    }

    pub fn transport(&self) -> &ODataTransport {
        &self.transport
    }
}

impl Execute for BlockingClient {
    type Reply<T: Send + 'static> = Result<T>;

    fn send(&self, request: &ODataRequest) -> Result<Value> {
        let call = self.transport.prepare_single(request);
        let raw = self.runtime.block_on(self.transport.execute(call))?;
        decode_json_body(&raw)
    }

    fn send_batch(&self, items: &mut [BatchItem]) -> Result<Vec<ParsedResponse>> {
        let call = self.transport.prepare_batch(items);
        let raw = self.runtime.block_on(self.transport.execute(call))?;
        ResponseDecoder::decode(&raw)
    }
}

impl fmt::Debug for BlockingClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingClient")
            .field("transport", &self.transport)
            .finish()
    }
}
