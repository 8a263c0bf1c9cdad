//! Client for the BCH endpoints of an ipfs-bch-wallet-consumer style REST
//! gateway.
//!
//! # Overview
//! `BchConsumer` fixes the gateway URL once and exposes a `BchClient` whose
//! operations (balance, UTXOs, broadcast, transaction data and history, USD
//! price, UTXO validity, token metadata) each make exactly one HTTP call.
//!
//! # Design
//! - `BchRequests` is the sans-IO half: `build_*` produces an `HttpRequest`,
//!   `parse_*` shapes the decoded body. It can be used on its own by hosts
//!   that do their own I/O.
//! - `BchClient` pairs it with a `Transport`. The default `UreqTransport`
//!   (feature `ureq`) is blocking; anything implementing `Transport` can be
//!   swapped in.
//! - Inputs are validated once, when converted into `Address`, `TxHex`,
//!   `TxidList`, `Utxo` or `TokenId`. Failures return before any I/O.
//! - Gateway bodies are returned as `serde_json::Value`, unchanged except for
//!   the `txData` and `usd` unwraps. `success: false` bodies are data, not
//!   errors.

pub mod client;
pub mod config;
pub mod consumer;
pub mod error;
pub mod http;
pub mod msg;
pub mod requests;
#[cfg(feature = "ureq")]
pub mod transport;
pub mod types;

pub use client::BchClient;
pub use config::{ConsumerConfig, DEFAULT_REST_URL};
pub use consumer::BchConsumer;
pub use error::{BchError, BchResult, ConfigError, TransportError, ValidationError};
pub use http::{HttpMethod, HttpRequest, Transport};
pub use msg::MsgClient;
pub use requests::BchRequests;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{Address, FullnodeUtxo, IndexerUtxo, TokenDataOptions, TokenId, TxHex, TxidList, Utxo};
