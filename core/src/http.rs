//! HTTP request data and the transport seam.
//!
//! # Design
//! `HttpRequest` describes one gateway call as plain data. `BchRequests`
//! produces these values without touching the network; a `Transport`
//! executes them and hands back the already-decoded JSON body. Anything the
//! transport does beyond that (timeouts, TLS, proxies) is its own policy.

use std::sync::Arc;

use serde_json::Value;

use crate::error::TransportError;

/// HTTP method for a request. The gateway only uses these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A gateway request described as plain data.
///
/// `url` is the full `{base}{path}`. POST requests always carry a JSON body;
/// GET requests never do.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<Value>,
}

/// Executes HTTP calls on behalf of the client.
///
/// Both methods must fail on network errors and on non-2xx statuses, and
/// must return the response body already decoded from JSON.
pub trait Transport {
    fn post(&self, url: &str, body: &Value) -> Result<Value, TransportError>;

    fn get(&self, url: &str) -> Result<Value, TransportError>;

    /// Dispatch a built request to `post` or `get`.
    fn execute(&self, request: &HttpRequest) -> Result<Value, TransportError> {
        match (request.method, &request.body) {
            (HttpMethod::Get, _) => self.get(&request.url),
            (HttpMethod::Post, Some(body)) => self.post(&request.url, body),
            (HttpMethod::Post, None) => self.post(&request.url, &Value::Null),
        }
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post(&self, url: &str, body: &Value) -> Result<Value, TransportError> {
        (**self).post(url, body)
    }

    fn get(&self, url: &str) -> Result<Value, TransportError> {
        (**self).get(url)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn post(&self, url: &str, body: &Value) -> Result<Value, TransportError> {
        (**self).post(url, body)
    }

    fn get(&self, url: &str) -> Result<Value, TransportError> {
        (**self).get(url)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn post(&self, url: &str, body: &Value) -> Result<Value, TransportError> {
        (**self).post(url, body)
    }

    fn get(&self, url: &str) -> Result<Value, TransportError> {
        (**self).get(url)
    }
}
