//! Request forwarding.
//!
//! Executes one outbound GET per call and turns the outcome into either a
//! `ResultEnvelope` or a classified `ForwardError`.

use super::envelope::build_envelope;
use super::types::{ResultEnvelope, UNKNOWN_CONTENT_TYPE};
use crate::error::ForwardError;
use crate::infra::{Transport, TransportError};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Wait bound applied to every outbound fetch.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Forwards GET requests to caller-supplied URLs.
///
/// Holds no per-request state; concurrent calls are fully independent.
#[derive(Clone)]
pub struct Forwarder {
    transport: Arc<dyn Transport>,
    request_timeout: Duration,
}

impl Forwarder {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_timeout(transport, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(transport: Arc<dyn Transport>, request_timeout: Duration) -> Self {
        Self {
            transport,
            request_timeout,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Fetches `url` and wraps the upstream response.
    ///
    /// Upstream error statuses are not failures here; only transport-level
    /// problems produce a `ForwardError`.
    pub async fn forward(&self, url: &str) -> Result<ResultEnvelope, ForwardError> {
        tracing::info!(url = %url, "Forwarding request");

        let transport = Arc::clone(&self.transport);
        let target = url.to_string();
        let request_timeout = self.request_timeout;
        let mut fetch =
            tokio::spawn(async move { transport.get(&target, request_timeout).await });

        let response = match timeout(request_timeout, &mut fetch).await {
            Ok(Ok(Ok(response))) => response,
            Ok(Ok(Err(TransportError::Timeout))) | Err(_) => {
                // Drops the pending connection if the transport ignored the bound
                fetch.abort();
                tracing::warn!(url = %url, timeout = ?request_timeout, "Upstream request timed out");
                return Err(ForwardError::Timeout);
            }
            Ok(Ok(Err(TransportError::Request(e)))) => {
                tracing::warn!(url = %url, error = %e, "Upstream request failed");
                return Err(ForwardError::TransportFailure(e));
            }
            Ok(Err(e)) => {
                tracing::error!(url = %url, error = %e, "Upstream fetch task failed");
                return Err(ForwardError::UnexpectedFailure(e.to_string()));
            }
        };

        let content_type = response
            .header(reqwest::header::CONTENT_TYPE)
            .unwrap_or(UNKNOWN_CONTENT_TYPE);
        tracing::info!(status = response.status, content_type = %content_type, "Upstream responded");

        Ok(build_envelope(url, response))
    }
}
