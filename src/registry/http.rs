//! HTTP transport for registry lookups
//!
//! Blocking on purpose: lookups run one container at a time.

use crate::error::{ImgfreshError, ImgfreshResult};
use std::time::Duration;
use tracing::debug;

/// Status and body of a registry response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Minimal GET transport used by the registry resolvers
pub trait HttpClient: Send + Sync {
    /// Issue a GET request. Non-2xx statuses are returned, not raised.
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> ImgfreshResult<HttpResponse>;
}

/// `ureq`-backed transport
pub struct UreqClient {
    agent: ureq::Agent,
}

impl UreqClient {
    /// Create a client with a global per-request timeout
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();

        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl HttpClient for UreqClient {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> ImgfreshResult<HttpResponse> {
        debug!("GET {}", url);

        let mut request = self.agent.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let network = |e: ureq::Error| ImgfreshError::Network {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let mut response = request.call().map_err(network)?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string().map_err(network)?;

        debug!("{} -> HTTP {} ({} bytes)", url, status, body.len());
        Ok(HttpResponse { status, body })
    }
}
