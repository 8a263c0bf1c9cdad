//! Input types for the gateway operations.
//!
//! # Design
//! Each operation performs exactly one shape check, and it happens here, at
//! the conversion into the input type. Conversions from the natural Rust
//! types always succeed; conversions from `serde_json::Value` are the ones
//! that can fail, which is where dynamically-shaped callers hit a
//! `ValidationError`. Content is never checked: address checksums, hex
//! length and txid format are left to the gateway.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;

pub(crate) const EXPECT_ADDRESS: &str = "Input must be a string containing bitcoincash address";
pub(crate) const EXPECT_TX_HEX: &str =
    "Input must be a string containing hex representation of a transaction";
pub(crate) const EXPECT_TXIDS: &str = "Input must be an array of strings representing TXIDs";
pub(crate) const EXPECT_TOKEN_ID: &str = "Input must be a string containing a token ID";
pub(crate) const EXPECT_UTXO: &str =
    "Input must be a UTXO object in fullnode (txid, vout) or indexer (tx_hash, tx_pos) shape";

macro_rules! string_input {
    ($(#[$meta:meta])* $name:ident, $expected:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ValidationError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Ok(Self(value.to_string()))
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Ok(Self(value))
            }
        }

        impl TryFrom<&String> for $name {
            type Error = ValidationError;

            fn try_from(value: &String) -> Result<Self, Self::Error> {
                Ok(Self(value.clone()))
            }
        }

        impl TryFrom<&Value> for $name {
            type Error = ValidationError;

            fn try_from(value: &Value) -> Result<Self, Self::Error> {
                value
                    .as_str()
                    .map(|s| Self(s.to_string()))
                    .ok_or(ValidationError::new($expected))
            }
        }

        impl TryFrom<Value> for $name {
            type Error = ValidationError;

            fn try_from(value: Value) -> Result<Self, Self::Error> {
                match value {
                    Value::String(s) => Ok(Self(s)),
                    _ => Err(ValidationError::new($expected)),
                }
            }
        }
    };
}

string_input!(
    /// A ledger address, e.g. `bitcoincash:qp3sn6...`.
    Address,
    EXPECT_ADDRESS
);

string_input!(
    /// Hex-encoded signed transaction bytes.
    TxHex,
    EXPECT_TX_HEX
);

string_input!(
    /// A token identifier.
    TokenId,
    EXPECT_TOKEN_ID
);

/// An ordered list of transaction ids, forwarded to the gateway verbatim.
///
/// Only the container is checked; elements are whatever the caller passed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxidList(Vec<Value>);

impl TxidList {
    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> TryFrom<Vec<S>> for TxidList {
    type Error = ValidationError;

    fn try_from(value: Vec<S>) -> Result<Self, Self::Error> {
        Ok(Self(value.into_iter().map(|s| Value::String(s.into())).collect()))
    }
}

impl<S: AsRef<str>> TryFrom<&[S]> for TxidList {
    type Error = ValidationError;

    fn try_from(value: &[S]) -> Result<Self, Self::Error> {
        Ok(Self(value.iter().map(|s| Value::String(s.as_ref().to_string())).collect()))
    }
}

impl<S: AsRef<str>, const N: usize> TryFrom<[S; N]> for TxidList {
    type Error = ValidationError;

    fn try_from(value: [S; N]) -> Result<Self, Self::Error> {
        Ok(Self(value.iter().map(|s| Value::String(s.as_ref().to_string())).collect()))
    }
}

impl TryFrom<&Value> for TxidList {
    type Error = ValidationError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value
            .as_array()
            .map(|items| Self(items.clone()))
            .ok_or(ValidationError::new(EXPECT_TXIDS))
    }
}

impl TryFrom<Value> for TxidList {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(items) => Ok(Self(items)),
            _ => Err(ValidationError::new(EXPECT_TXIDS)),
        }
    }
}

/// A UTXO as reported by a full node (`txid` / `vout`).
///
/// Only the presence of both keys is checked; their values go to the gateway
/// as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullnodeUtxo {
    pub txid: Value,
    pub vout: Value,
    /// Any other fields the caller supplied (`value`, `satoshis`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A UTXO as reported by an Electrum-style indexer (`tx_hash` / `tx_pos`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexerUtxo {
    pub tx_hash: Value,
    pub tx_pos: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One unspent output in either accepted shape.
///
/// Serialized untagged, so the gateway receives exactly the shape the caller
/// built; the client never converts between the two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Utxo {
    Fullnode(FullnodeUtxo),
    Indexer(IndexerUtxo),
}

impl Utxo {
    pub fn fullnode(txid: impl Into<String>, vout: u32) -> Self {
        Utxo::Fullnode(FullnodeUtxo {
            txid: Value::String(txid.into()),
            vout: Value::from(vout),
            extra: Map::new(),
        })
    }

    pub fn indexer(tx_hash: impl Into<String>, tx_pos: u32) -> Self {
        Utxo::Indexer(IndexerUtxo {
            tx_hash: Value::String(tx_hash.into()),
            tx_pos: Value::from(tx_pos),
            extra: Map::new(),
        })
    }
}

impl TryFrom<&Utxo> for Utxo {
    type Error = ValidationError;

    fn try_from(value: &Utxo) -> Result<Self, Self::Error> {
        Ok(value.clone())
    }
}

impl TryFrom<FullnodeUtxo> for Utxo {
    type Error = ValidationError;

    fn try_from(value: FullnodeUtxo) -> Result<Self, Self::Error> {
        Ok(Utxo::Fullnode(value))
    }
}

impl TryFrom<IndexerUtxo> for Utxo {
    type Error = ValidationError;

    fn try_from(value: IndexerUtxo) -> Result<Self, Self::Error> {
        Ok(Utxo::Indexer(value))
    }
}

impl TryFrom<&Value> for Utxo {
    type Error = ValidationError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Utxo::try_from(value.clone())
    }
}

impl TryFrom<Value> for Utxo {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        if !value.is_object() {
            return Err(ValidationError::new(EXPECT_UTXO));
        }
        serde_json::from_value(value).map_err(|_| ValidationError::new(EXPECT_UTXO))
    }
}

/// Options for `get_token_data`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenDataOptions {
    /// Ask the gateway to include the token's transaction history.
    /// Defaults to `false`.
    pub with_tx_history: bool,
}

impl TokenDataOptions {
    pub fn with_tx_history() -> Self {
        Self {
            with_tx_history: true,
        }
    }
}
