//! Non-blocking execution
//!
//! Calls are spawned onto a tokio runtime and return a [`PendingResponse`]
//! immediately. Request framing, including the content-id backfill, happens
//! before the call returns.

use super::Execute;
use super::pending::{DecodeFn, PendingResponse};
use super::traffic::TrafficLogger;
use super::transport::{ODataTransport, PreparedCall, default_logger};
use crate::auth::AuthSession;
use crate::config::ClientConfig;
use crate::core::{BatchItem, ODataRequest, ParsedResponse, ResponseDecoder, decode_json_body};
use crate::utils::error::Result;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio::runtime::{Handle, Runtime};
use tracing::info;

/// Runtime owned by a client; shut down without blocking when dropped
struct OwnedRuntime(Option<Runtime>);

impl Drop for OwnedRuntime {
    fn drop(&mut self) {
        if let Some(runtime) = self.0.take() {
            runtime.shutdown_background();
        }
    }
}

/// Client whose calls return pending handles
#[derive(Clone)]
pub struct AsyncClient {
    transport: Arc<ODataTransport>,
    handle: Handle,
    _runtime: Option<Arc<OwnedRuntime>>,
}

impl AsyncClient {
    /// Connect on the current tokio runtime
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        Self::connect_with_logger(config, default_logger(&config.settings)).await
    }

    /// Connect on the current tokio runtime with an injected traffic logger
    pub async fn connect_with_logger(
        config: &ClientConfig,
        logger: Arc<dyn TrafficLogger>,
    ) -> Result<Self> {
        let transport = ODataTransport::connect(config, logger).await?;
        info!(
            "Non-blocking OData client connected to {}",
            transport.endpoint().root()
        );
        Ok(Self::from_transport(transport, Handle::current()))
    }

    /// Connect from synchronous code on a runtime owned by the client
    pub fn connect_owned(config: &ClientConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("odata-client")
            .enable_all()
            .build()?;
        let logger = default_logger(&config.settings);
        let transport = runtime.block_on(ODataTransport::connect(config, logger))?;
        info!(
            "Non-blocking OData client connected to {}",
            transport.endpoint().root()
        );

        Ok(Self {
            transport: Arc::new(transport),
            handle: runtime.handle().clone(),
            _runtime: Some(Arc::new(OwnedRuntime(Some(runtime)))),
        })
    }

    /// Wrap an already connected transport, spawning calls on `handle`
    pub fn from_transport(transport: ODataTransport, handle: Handle) -> Self {
        Self {
            transport: Arc::new(transport),
            handle,
            _runtime: None,
        }
    }

    pub fn session(&self) -> &AuthSession {
        self.transport.session()
    }

    fn dispatch<T>(&self, call: PreparedCall, decode: DecodeFn<T>) -> PendingResponse<T> {
        let transport = Arc::clone(&self.transport);
        let task = self
            .handle
            .spawn(async move { transport.execute(call).await });
        PendingResponse::new(task, decode, self.handle.clone())
    }
}

impl Execute for AsyncClient {
    type Reply<T: Send + 'static> = PendingResponse<T>;

    fn send(&self, request: &ODataRequest) -> PendingResponse<Value> {
        let call = self.transport.prepare_single(request);
        self.dispatch(call, decode_json_body)
    }

    fn send_batch(&self, items: &mut [BatchItem]) -> PendingResponse<Vec<ParsedResponse>> {
        let call = self.transport.prepare_batch(items);
        self.dispatch(call, ResponseDecoder::decode)
    }
}

impl fmt::Debug for AsyncClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncClient")
            .field("transport", &self.transport)
            .field("owns_runtime", &self._runtime.is_some())
            .finish()
    }
}
