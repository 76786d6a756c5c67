//! CSRF token session
//!
//! The service rejects calls that do not carry a valid `x-csrf-token` and the
//! session cookies it was issued with. A session is obtained once by a
//! priming `GET $metadata` with `x-csrf-token: fetch` and is read-only after
//! that.

use crate::config::{Credentials, ServiceEndpoint};
use crate::utils::error::{ODataError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::RequestBuilder;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use std::fmt;
use tracing::{debug, info};

/// Header carrying the anti-forgery token in both directions
pub const CSRF_TOKEN_HEADER: &str = "x-csrf-token";

/// `Authorization` value for basic auth
pub fn basic_authorization(credentials: &Credentials) -> String {
    let encoded = STANDARD.encode(format!(
        "{}:{}",
        credentials.username, credentials.password
    ));
    format!("Basic {}", encoded)
}

/// Token and cookies attached to every call of one client
#[derive(Clone)]
pub struct AuthSession {
    authorization: String,
    token: String,
    cookies: Vec<String>,
}

impl AuthSession {
    /// Perform the priming call and capture token and cookies
    ///
    /// A rejected call, or a response without `x-csrf-token` or `set-cookie`,
    /// is an authentication error. Network failures surface as transport
    /// errors. Either way no session is created.
    pub async fn acquire(
        http: &reqwest::Client,
        endpoint: &ServiceEndpoint,
        credentials: &Credentials,
    ) -> Result<Self> {
        let url = endpoint.metadata_url();
        let authorization = basic_authorization(credentials);

        info!("Fetching CSRF token from {}", url);

        let response = http
            .get(&url)
            .header(AUTHORIZATION, &authorization)
            .header(CSRF_TOKEN_HEADER, "fetch")
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ODataError::Authentication(format!(
                "CSRF token request rejected with HTTP {}",
                status
            )));
        }

        let headers = response.headers();

        let token = headers
            .get(CSRF_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                ODataError::Authentication(format!(
                    "Response from {} carried no {} header",
                    url, CSRF_TOKEN_HEADER
                ))
            })?
            .to_string();

        let cookies = split_cookies(
            headers
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|value| value.to_str().ok()),
        );
        if cookies.is_empty() {
            return Err(ODataError::Authentication(format!(
                "Response from {} carried no set-cookie header",
                url
            )));
        }

        debug!("CSRF token acquired with {} cookies", cookies.len());

        Ok(Self {
            authorization,
            token,
            cookies,
        })
    }

    /// Build a session from a token negotiated elsewhere
    pub fn from_parts(
        credentials: &Credentials,
        token: impl Into<String>,
        cookies: Vec<String>,
    ) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ODataError::Authentication(
                "CSRF token must not be empty".to_string(),
            ));
        }
        Ok(Self {
            authorization: basic_authorization(credentials),
            token,
            cookies,
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn cookies(&self) -> &[String] {
        &self.cookies
    }

    /// Cookies joined back into one `Cookie` header value
    pub fn cookie_header(&self) -> String {
        self.cookies.join(";")
    }

    pub fn authorization(&self) -> &str {
        &self.authorization
    }

    /// Attach `Authorization`, `x-csrf-token` and `Cookie` to a request
    pub fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(AUTHORIZATION, &self.authorization)
            .header(CSRF_TOKEN_HEADER, &self.token)
            .header(COOKIE, self.cookie_header())
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("token", &"[REDACTED]")
            .field("cookies", &self.cookies.len())
            .finish()
    }
}

/// Split `set-cookie` values on `,` into an ordered cookie list
fn split_cookies<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|cookie| !cookie.is_empty())
        .map(String::from)
        .collect()
}
