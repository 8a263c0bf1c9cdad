//! Error types for the BCH consumer client.
//!
//! # Design
//! Only two kinds of failure reach a caller at call time: a `ValidationError`
//! raised locally before any request is made, and a `TransportError` raised
//! by the transport. `ConfigError` exists solely for construction. A gateway
//! response that reports `success: false` is ordinary data and never becomes
//! an error here.

use std::convert::Infallible;

use thiserror::Error;

/// An input failed the shape check of the operation it was passed to.
///
/// The message names the expected type. No request is made when this is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{expected}")]
pub struct ValidationError {
    pub expected: &'static str,
}

impl ValidationError {
    pub const fn new(expected: &'static str) -> Self {
        Self { expected }
    }
}

/// Failures surfaced by a [`Transport`](crate::Transport).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// DNS, connect, TLS or I/O failure before a status was received.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The gateway answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the JSON the operation expects.
    #[error("malformed response body: {0}")]
    Decode(String),
}

/// Construction-time configuration failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("restURL required when instantiating BCH library")]
    MissingBaseUrl,

    #[error("invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Error type of every `BchClient` operation.
///
/// Each variant is transparent: the inner error's message is surfaced as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<Infallible> for BchError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

pub type BchResult<T> = Result<T, BchError>;
