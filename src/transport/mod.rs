//! Transport Module
//!
//! HTTP abstraction used by the service facade and by executions. Every
//! network call in the crate goes through [`Transport`], so tests can swap
//! in a recording mock.

pub mod http;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use http::ReqwestTransport;

/// HTTP basic-auth credentials.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Blocking HTTP operations used by the client.
///
/// Implementations return the raw response body. Network failures and
/// non-success HTTP statuses are reported as
/// [`WpsError::Transport`](crate::WpsError::Transport) and are never retried.
pub trait Transport: Send + Sync {
    /// Performs a GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - Base URL; an existing query string is kept
    /// * `params` - Query parameters appended in order
    /// * `credentials` - Optional basic-auth credentials
    fn get(&self, url: &str, params: &[(&str, &str)], credentials: Option<&Credentials>)
        -> Result<Vec<u8>>;

    /// Performs a POST request with an XML body.
    fn post(&self, url: &str, body: &str, credentials: Option<&Credentials>) -> Result<Vec<u8>>;
}
