//! Raw traffic logging
//!
//! Clients receive a [`TrafficLogger`] at construction instead of reaching
//! for a global logger, so callers can route or silence the raw bodies.

use std::time::Duration;
use tracing::info;

/// Sink for raw outgoing and incoming bodies
#[cfg_attr(test, mockall::automock)]
pub trait TrafficLogger: Send + Sync {
    /// Called before a request is sent
    fn log_request(&self, method: &str, url: &str, body: &str);

    /// Called after a successful response body has been read
    fn log_response(&self, url: &str, body: &str, elapsed: Duration);
}

/// Logs traffic through `tracing` on target `odata::traffic`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTrafficLogger;

impl TrafficLogger for TracingTrafficLogger {
    fn log_request(&self, method: &str, url: &str, body: &str) {
        info!(target: "odata::traffic", "--ODATA REQUEST--\n\n{} {}\n\n{}", method, url, body);
    }

    fn log_response(&self, url: &str, body: &str, elapsed: Duration) {
        info!(
            target: "odata::traffic",
            "--ODATA RESPONSE [{:.3}s]-- {}\n\n{}",
            elapsed.as_secs_f64(),
            url,
            body
        );
    }
}

/// Discards all traffic
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTrafficLogger;

impl TrafficLogger for NoopTrafficLogger {
    fn log_request(&self, _method: &str, _url: &str, _body: &str) {}

    fn log_response(&self, _url: &str, _body: &str, _elapsed: Duration) {}
}
