use std::time::Duration;
use log::{debug, error};
use thiserror::Error;

/// Error types that can occur when interacting with HTTP clients
#[derive(Debug, Error)]
pub enum HttpClientError {
    #[error("HTTP request error: {0}")]
    RequestError(String),

    #[error("HTTP status {status}")]
    Status { status: u16 },

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl HttpClientError {
    /// Check whether this error is a response with the given status code
    pub fn is_status(&self, code: u16) -> bool {
        matches!(self, HttpClientError::Status { status } if *status == code)
    }
}

/// A trait for HTTP client implementations
/// This version avoids generic methods to enable dynamic dispatch
pub trait HttpClient: Send + Sync + std::fmt::Debug {
    /// Send a GET request
    fn get(&self, url: &str) -> Result<String, HttpClientError>;

    /// Send a GET request with additional request headers
    fn get_with_headers(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<String, HttpClientError>;

    /// Clone the client as a boxed trait object
    fn clone_box(&self) -> Box<dyn HttpClient>;
}

impl Clone for Box<dyn HttpClient> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// An HTTP client implementation using ureq
#[derive(Clone, Debug)]
pub struct UreqHttpClient {
    /// Timeout for requests; None leaves the transport default in place
    timeout: Option<Duration>,
}

impl UreqHttpClient {
    /// Create a new HTTP client with the specified timeout
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            timeout: Some(Duration::from_secs(timeout_secs)),
        }
    }

    /// Create a new HTTP client that relies on the transport default timeout
    pub fn transport_default() -> Self {
        Self { timeout: None }
    }

    fn execute(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<String, HttpClientError> {
        let mut request = ureq::get(url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        for (name, value) in headers {
            request = request.set(name, value);
        }

        let response = match request.call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(status, _)) => {
                debug!("GET {} returned status {}", url, status);
                return Err(HttpClientError::Status { status });
            }
            Err(e) => {
                error!("GET request failed: {}", e);
                return Err(HttpClientError::RequestError(e.to_string()));
            }
        };

        match response.into_string() {
            Ok(text) => Ok(text),
            Err(e) => {
                error!("Failed to read response body: {}", e);
                Err(HttpClientError::ParseError(format!(
                    "Failed to read response body: {}",
                    e
                )))
            }
        }
    }
}

impl HttpClient for UreqHttpClient {
    fn get(&self, url: &str) -> Result<String, HttpClientError> {
        debug!("GET request to {}", url);
        self.execute(url, &[])
    }

    fn get_with_headers(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<String, HttpClientError> {
        debug!("GET request to {} ({} extra headers)", url, headers.len());
        self.execute(url, headers)
    }

    fn clone_box(&self) -> Box<dyn HttpClient> {
        Box::new(self.clone())
    }
}

/// Create a new HTTP client with the given timeout in seconds
pub fn new_http_client(timeout_secs: u64) -> Box<dyn HttpClient> {
    Box::new(UreqHttpClient::new(timeout_secs))
}

/// Create a new HTTP client without an explicit timeout
pub fn new_http_client_default_timeout() -> Box<dyn HttpClient> {
    Box::new(UreqHttpClient::transport_default())
}
