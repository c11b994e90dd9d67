//! Outbound HTTP transport infrastructure.
//!
//! Provides a trait-based abstraction over "GET a URL with a timeout", so
//! the forwarder can be driven by a fake transport in tests.

use crate::proxy::types::UpstreamResponse;
use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

/// Failure reported by an outbound transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("{0}")]
    Request(String),
}

/// Boxed future returned by [`Transport::get`].
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<UpstreamResponse, TransportError>> + Send + 'a>>;

/// Capability to perform an HTTP GET against an arbitrary URL.
pub trait Transport: Send + Sync {
    /// Fetches `url`, giving up once `timeout` has elapsed.
    ///
    /// Implementations must abort the underlying connection when the bound
    /// expires and report [`TransportError::Timeout`].
    fn get<'a>(&'a self, url: &'a str, timeout: Duration) -> TransportFuture<'a>;
}

/// Transport backed by a shared `reqwest::Client`.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a new `ReqwestTransport` with a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport around an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch(
        &self,
        url: &str,
        request_timeout: Duration,
    ) -> Result<UpstreamResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .timeout(request_timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(map_reqwest_error)?.to_vec();

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}

impl Transport for ReqwestTransport {
    fn get<'a>(&'a self, url: &'a str, request_timeout: Duration) -> TransportFuture<'a> {
        Box::pin(async move {
            // reqwest enforces the same bound; this also covers a stalled body read
            match timeout(request_timeout, self.fetch(url, request_timeout)).await {
                Ok(result) => result,
                Err(_) => Err(TransportError::Timeout),
            }
        })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Request(error_chain(&e))
    }
}

/// Joins an error with every `source()` below it, skipping levels whose text
/// is already present.
fn error_chain(e: &(dyn StdError + 'static)) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
