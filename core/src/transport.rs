//! Blocking HTTP transport backed by `ureq`.
//!
//! Status codes are read as data (`http_status_as_error(false)`) so that a
//! non-2xx answer keeps its body in `TransportError::Status`.

use std::fmt;
use std::time::Duration;

use serde_json::Value;

use crate::error::TransportError;
use crate::http::Transport;

#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::with_timeout(None)
    }

    /// `timeout` bounds each whole request. `None` waits indefinitely.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }

    fn finish(
        &self,
        result: Result<ureq::http::Response<ureq::Body>, ureq::Error>,
    ) -> Result<Value, TransportError> {
        let mut response = result.map_err(|e| TransportError::Connection(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(TransportError::Status { status, body });
        }
        serde_json::from_str(&body).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn post(&self, url: &str, body: &Value) -> Result<Value, TransportError> {
        let payload = serde_json::to_string(body).map_err(|e| TransportError::Decode(e.to_string()))?;
        let result = self
            .agent
            .post(url)
            .content_type("application/json")
            .send(payload.as_bytes());
        self.finish(result)
    }

    fn get(&self, url: &str) -> Result<Value, TransportError> {
        let result = self.agent.get(url).call();
        self.finish(result)
    }
}
