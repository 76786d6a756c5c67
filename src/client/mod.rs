//! OData clients
//!
//! Both execution modes share one transport and one request pipeline; they
//! differ only in what a call hands back. [`BlockingClient`] returns the
//! decoded result, [`AsyncClient`] returns a [`PendingResponse`].

pub mod blocking;
pub mod non_blocking;
pub mod pending;
pub mod traffic;
pub mod transport;


pub use blocking::BlockingClient;
pub use non_blocking::AsyncClient;
pub use pending::{DecodeFn, Deferred, LazyField, PendingResponse};
pub use traffic::{NoopTrafficLogger, TracingTrafficLogger, TrafficLogger};
pub use transport::{ODataTransport, PreparedCall, default_logger};

use crate::auth::AuthSession;
use crate::config::{ClientConfig, ExecutionMode};
use crate::core::{BatchItem, ODataRequest, ParsedResponse};
use crate::utils::error::Result;
use serde_json::Value;

/// The two operations every client exposes
pub trait Execute {
    /// What a call returns: the result itself, or a handle to it
    type Reply<T: Send + 'static>;

    /// Send one request directly and decode its JSON body
    fn send(&self, request: &ODataRequest) -> Self::Reply<Value>;

    /// Send `items` as one `$batch` call
    ///
    /// Missing content ids inside changesets are filled in on `items` before
    /// anything is sent.
    fn send_batch(&self, items: &mut [BatchItem]) -> Self::Reply<Vec<ParsedResponse>>;
}

/// A client in the mode chosen by configuration
#[derive(Debug)]
pub enum ODataClient {
    Blocking(BlockingClient),
    NonBlocking(AsyncClient),
}

impl ODataClient {
    /// Connect in the mode named by `config.settings.mode`
    ///
    /// Must be called from synchronous code. A non-blocking client gets a
    /// runtime of its own.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        match config.settings.mode {
            ExecutionMode::Blocking => BlockingClient::connect(config).map(Self::Blocking),
            ExecutionMode::NonBlocking => AsyncClient::connect_owned(config).map(Self::NonBlocking),
        }
    }

    pub fn mode(&self) -> ExecutionMode {
        match self {
            Self::Blocking(_) => ExecutionMode::Blocking,
            Self::NonBlocking(_) => ExecutionMode::NonBlocking,
        }
    }

    pub fn session(&self) -> &AuthSession {
        match self {
            Self::Blocking(client) => client.session(),
            Self::NonBlocking(client) => client.session(),
        }
    }

    pub fn as_blocking(&self) -> Option<&BlockingClient> {
        match self {
            Self::Blocking(client) => Some(client),
            Self::NonBlocking(_) => None,
        }
    }

    pub fn as_non_blocking(&self) -> Option<&AsyncClient> {
        match self {
            Self::Blocking(_) => None,
            Self::NonBlocking(client) => Some(client),
        }
    }

    /// Send one request and wait for its decoded body in either mode
    pub fn send_and_wait(&self, request: &ODataRequest) -> Result<Value> {
        match self {
            Self::Blocking(client) => client.send(request),
            Self::NonBlocking(client) => client.send(request).wait(),
        }
    }

    /// Send a batch and wait for its decoded parts in either mode
    pub fn send_batch_and_wait(&self, items: &mut [BatchItem]) -> Result<Vec<ParsedResponse>> {
        match self {
            Self::Blocking(client) => client.send_batch(items),
            Self::NonBlocking(client) => client.send_batch(items).wait(),
        }
    }
}
