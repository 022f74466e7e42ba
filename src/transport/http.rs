//! Blocking HTTP transport backed by reqwest.

use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::{Client, RequestBuilder};
use url::Url;

use crate::error::{Result, WpsError};

use super::{Credentials, Transport};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const USER_AGENT: &str = concat!("wpsclient/", env!("CARGO_PKG_VERSION"));

/// Real transport using a blocking reqwest client.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a transport with a custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| WpsError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    fn send(&self, request: RequestBuilder, credentials: Option<&Credentials>, url: &str) -> Result<Vec<u8>> {
        let request = match credentials {
            Some(c) => request.basic_auth(&c.username, Some(&c.password)),
            None => request,
        };

        let response = request.send().map_err(|e| {
            warn!("HTTP request to {} failed: {}", url, e);
            WpsError::Transport(format!("Request failed: {}", e))
        })?;

        // Check HTTP status
        if !response.status().is_success() {
            return Err(WpsError::Transport(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let body = response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| WpsError::Transport(format!("Failed to read response: {}", e)))?;

        debug!("Received {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

/// Appends query parameters to a URL, keeping any existing query string.
pub fn build_url(url: &str, params: &[(&str, &str)]) -> Result<Url> {
    let mut url = Url::parse(url)?;
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params.iter());
    }
    Ok(url)
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str, params: &[(&str, &str)], credentials: Option<&Credentials>) -> Result<Vec<u8>> {
        let url = build_url(url, params)?;
        debug!("GET {}", url);
        self.send(self.client.get(url.clone()), credentials, url.as_str())
    }

    fn post(&self, url: &str, body: &str, credentials: Option<&Credentials>) -> Result<Vec<u8>> {
        let url = Url::parse(url)?;
        debug!("POST {} ({} bytes)", url, body.len());
        let request = self
            .client
            .post(url.clone())
            .header("Content-Type", "text/xml")
            .body(body.to_string());
        self.send(request, credentials, url.as_str())
    }
}
