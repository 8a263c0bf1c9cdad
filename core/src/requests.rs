//! Stateless request builder and response parser for the gateway endpoints.
//!
//! # Design
//! `BchRequests` holds only a `base_url`. Every operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that turns the decoded response body into the operation's result. Most
//! operations return the body untouched; `txData` and `usd` are the only
//! nested fields that get unwrapped.

use serde_json::{json, Value};

use crate::error::{ConfigError, TransportError};
use crate::http::{HttpMethod, HttpRequest};
use crate::types::{Address, TokenDataOptions, TokenId, TxHex, TxidList, Utxo};

pub const BALANCE_PATH: &str = "/bch/balance";
pub const UTXOS_PATH: &str = "/bch/utxos";
pub const BROADCAST_PATH: &str = "/bch/broadcast";
pub const TX_DATA_PATH: &str = "/bch/txData";
pub const TX_HISTORY_PATH: &str = "/bch/txHistory";
pub const USD_PRICE_PATH: &str = "/price/usd";
pub const UTXO_IS_VALID_PATH: &str = "/bch/utxoIsValid";
pub const TOKEN_DATA_PATH: &str = "/bch/getTokenData";
pub const TOKEN_DATA2_PATH: &str = "/bch/getTokenData2";

/// Builds gateway requests and parses gateway responses without any I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BchRequests {
    base_url: String,
}

impl BchRequests {
    /// Fails if `base_url` is empty or only whitespace. A trailing `/` is
    /// dropped so paths can be appended directly.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        Ok(Self {
            base_url: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post(&self, path: &str, body: Value) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}{path}", self.base_url),
            body: Some(body),
        }
    }

    pub fn build_get_balance(&self, addr: &Address) -> HttpRequest {
        self.post(BALANCE_PATH, json!({ "addresses": [addr] }))
    }

    pub fn build_get_utxos(&self, addr: &Address) -> HttpRequest {
        self.post(UTXOS_PATH, json!({ "address": addr }))
    }

    pub fn build_send_tx(&self, hex: &TxHex) -> HttpRequest {
        self.post(BROADCAST_PATH, json!({ "hex": hex }))
    }

    pub fn build_get_tx_data(&self, txids: &TxidList) -> HttpRequest {
        self.post(TX_DATA_PATH, json!({ "txids": txids }))
    }

    pub fn build_get_tx_history(&self, addr: &Address) -> HttpRequest {
        self.post(TX_HISTORY_PATH, json!({ "address": addr }))
    }

    pub fn build_get_usd(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}{USD_PRICE_PATH}", self.base_url),
            body: None,
        }
    }

    pub fn build_utxo_is_valid(&self, utxo: &Utxo) -> HttpRequest {
        self.post(UTXO_IS_VALID_PATH, json!({ "utxo": utxo }))
    }

    pub fn build_get_token_data(&self, token_id: &TokenId, options: TokenDataOptions) -> HttpRequest {
        self.post(
            TOKEN_DATA_PATH,
            json!({ "tokenId": token_id, "withTxHistory": options.with_tx_history }),
        )
    }

    pub fn build_get_token_data2(&self, token_id: &TokenId) -> HttpRequest {
        self.post(TOKEN_DATA2_PATH, json!({ "tokenId": token_id }))
    }

    /// Bodies of balance, utxos, broadcast, history, utxo-validity and token
    /// lookups are returned exactly as decoded.
    pub fn parse_passthrough(&self, body: Value) -> Value {
        body
    }

    pub fn parse_get_tx_data(&self, body: Value) -> Result<Value, TransportError> {
        take_field(body, "txData")
    }

    pub fn parse_get_usd(&self, body: Value) -> Result<f64, TransportError> {
        let usd = take_field(body, "usd")?;
        usd.as_f64()
            .ok_or_else(|| TransportError::Decode(format!("`usd` is not a number: {usd}")))
    }
}

/// Unwrap one top-level field of an object body.
fn take_field(body: Value, field: &str) -> Result<Value, TransportError> {
    match body {
        Value::Object(mut map) => map
            .remove(field)
            .ok_or_else(|| TransportError::Decode(format!("response body has no `{field}` field"))),
        other => Err(TransportError::Decode(format!(
            "expected an object with `{field}`, got {other}"
        ))),
    }
}
