//! HTTP transport shared by the blocking and non-blocking clients

use super::traffic::{NoopTrafficLogger, TracingTrafficLogger, TrafficLogger};
use crate::auth::AuthSession;
use crate::config::{ClientConfig, ClientSettings, ServiceEndpoint, Validate};
use crate::core::{BatchEncoder, BatchItem, Method, ODataRequest};
use crate::utils::error::{ODataError, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Logger matching the `traffic_logging` setting
pub fn default_logger(settings: &ClientSettings) -> Arc<dyn TrafficLogger> {
    if settings.traffic_logging {
        Arc::new(TracingTrafficLogger)
    } else {
        Arc::new(NoopTrafficLogger)
    }
}

/// A fully framed call, ready to send
#[derive(Debug, Clone)]
pub struct PreparedCall {
    pub method: Method,
    pub url: String,
    pub content_type: String,
    pub accept: Option<String>,
    pub body: Option<String>,
}

/// Authenticated HTTP transport for one service
pub struct ODataTransport {
    http: reqwest::Client,
    endpoint: ServiceEndpoint,
    session: AuthSession,
    logger: Arc<dyn TrafficLogger>,
}

impl ODataTransport {
    /// Validate `config`, build the HTTP client and acquire a CSRF session
    pub async fn connect(config: &ClientConfig, logger: Arc<dyn TrafficLogger>) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(config.settings.timeout())
            .build()
            .map_err(|e| ODataError::Config(format!("Failed to create HTTP client: {}", e)))?;
        let endpoint = config.service.endpoint()?;
        let session = AuthSession::acquire(&http, &endpoint, &config.credentials).await?;

        Ok(Self::from_parts(http, endpoint, session, logger))
    }

    pub fn from_parts(
        http: reqwest::Client,
        endpoint: ServiceEndpoint,
        session: AuthSession,
        logger: Arc<dyn TrafficLogger>,
    ) -> Self {
        Self {
            http,
            endpoint,
            session,
            logger,
        }
    }

    pub fn endpoint(&self) -> &ServiceEndpoint {
        &self.endpoint
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    /// Frame a single request as a direct call
    pub fn prepare_single(&self, request: &ODataRequest) -> PreparedCall {
        PreparedCall {
            method: request.method,
            url: self.endpoint.resource_url(&request.url()),
            content_type: request.content_type.clone(),
            accept: Some(request.accept.clone()),
            body: request.body.clone(),
        }
    }

    /// Backfill content ids, encode `items` and frame them as a `$batch` POST
    pub fn prepare_batch(&self, items: &mut [BatchItem]) -> PreparedCall {
        let encoded = BatchEncoder::encode_batch(items);
        debug!(
            "Encoded batch of {} items with boundary {}",
            items.len(),
            encoded.boundary
        );

        PreparedCall {
            method: Method::POST,
            url: self.endpoint.batch_url(),
            content_type: encoded.content_type(),
            accept: None,
            body: Some(encoded.body),
        }
    }

    /// Send a prepared call and return the raw response body
    ///
    /// Non-success statuses are returned as transport errors. Nothing is retried.
    pub async fn execute(&self, call: PreparedCall) -> Result<String> {
        let PreparedCall {
            method,
            url,
            content_type,
            accept,
            body,
        } = call;
        let body = body.unwrap_or_default();

        let mut builder = self
            .http
            .request(method.into(), &url)
            .header(CONTENT_TYPE, content_type);
        if let Some(accept) = accept {
            builder = builder.header(ACCEPT, accept);
        }
        builder = self.session.apply(builder);

        self.logger.log_request(method.as_str(), &url, &body);
        if method != Method::GET {
            builder = builder.body(body);
        }

        let started = Instant::now();
        let response = builder.send().await?.error_for_status()?;
        let text = response.text().await?;

        self.logger.log_response(&url, &text, started.elapsed());
        Ok(text)
    }
}

impl fmt::Debug for ODataTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ODataTransport")
            .field("endpoint", &self.endpoint)
            .field("session", &self.session)
            .finish()
    }
}
