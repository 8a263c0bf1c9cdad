//! Composition root: one gateway URL, one ledger client, one messaging client.

use tracing::debug;

use crate::client::BchClient;
use crate::config::ConsumerConfig;
use crate::error::BchResult;
use crate::http::Transport;
use crate::msg::MsgClient;

#[cfg(feature = "ureq")]
use crate::transport::UreqTransport;

/// Entry point for applications.
///
/// Unlike `BchClient::new`, a missing URL is not an error here: the public
/// gateway at [`DEFAULT_REST_URL`](crate::DEFAULT_REST_URL) is used instead.
/// The URL is not checked for reachability; a bad one surfaces on the first
/// call as a `TransportError`.
#[derive(Debug, Clone)]
pub struct BchConsumer<T> {
    bch: BchClient<T>,
    msg: MsgClient,
}

#[cfg(feature = "ureq")]
impl BchConsumer<UreqTransport> {
    /// Build a consumer that talks HTTP through `ureq`, honouring the
    /// configured timeout.
    pub fn new(config: &ConsumerConfig) -> BchResult<Self> {
        Self::with_transport(config, UreqTransport::with_timeout(config.timeout()))
    }
}

impl<T: Transport> BchConsumer<T> {
    pub fn with_transport(config: &ConsumerConfig, transport: T) -> BchResult<Self> {
        let rest_url = config.rest_url();
        debug!(rest_url, "creating BCH consumer");
        Ok(Self {
            bch: BchClient::new(rest_url, transport)?,
            msg: MsgClient::new(config),
        })
    }

    pub fn rest_url(&self) -> &str {
        self.bch.base_url()
    }

    pub fn bch(&self) -> &BchClient<T> {
        &self.bch
    }

    pub fn msg(&self) -> &MsgClient {
        &self.msg
    }
}
