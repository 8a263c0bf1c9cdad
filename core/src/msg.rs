//! Messaging sub-client.
//!
//! Built from the same configuration as the ledger client and exposed next
//! to it by `BchConsumer`. Its endpoints live outside this crate; only the
//! resolved gateway URL is carried here.

use crate::config::ConsumerConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgClient {
    rest_url: String,
}

impl MsgClient {
    pub fn new(config: &ConsumerConfig) -> Self {
        Self {
            rest_url: config.rest_url().to_string(),
        }
    }

    pub fn rest_url(&self) -> &str {
        &self.rest_url
    }
}
