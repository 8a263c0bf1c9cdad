//! Ledger client: one gateway round trip per operation.
//!
//! # Design
//! `BchClient` owns a transport and a `BchRequests`. Each operation runs the
//! same three steps: convert the input (the only validation), build the
//! request, execute it and parse the body. Nothing is cached or retried and
//! no state survives a call, so concurrent calls on a shared client are
//! independent.

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{BchError, BchResult};
use crate::http::{HttpRequest, Transport};
use crate::requests::BchRequests;
use crate::types::{Address, TokenDataOptions, TokenId, TxHex, TxidList, Utxo};

/// Typed access to the BCH endpoints of the gateway.
#[derive(Debug, Clone)]
pub struct BchClient<T> {
    requests: BchRequests,
    transport: T,
}

/// Run the single input check, logging rejected inputs.
fn validate<I, V>(input: I) -> BchResult<V>
where
    I: TryInto<V>,
    I::Error: Into<BchError>,
{
    input.try_into().map_err(|e| {
        let err: BchError = e.into();
        debug!(error = %err, "rejected input");
        err
    })
}

impl<T: Transport> BchClient<T> {
    /// Requires a non-empty base URL; unlike `BchConsumer` there is no
    /// fallback to the public gateway.
    pub fn new(base_url: &str, transport: T) -> BchResult<Self> {
        Ok(Self {
            requests: BchRequests::new(base_url)?,
            transport,
        })
    }

    pub fn base_url(&self) -> &str {
        self.requests.base_url()
    }

    pub fn requests(&self) -> &BchRequests {
        &self.requests
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn send(&self, request: HttpRequest) -> BchResult<Value> {
        debug!(method = ?request.method, url = %request.url, "gateway request");
        trace!(body = ?request.body, "request body");
        self.transport.execute(&request).map_err(|e| {
            debug!(url = %request.url, error = %e, "gateway request failed");
            BchError::from(e)
        })
    }

    /// `POST /bch/balance` for a single address.
    pub fn get_balance<A>(&self, addr: A) -> BchResult<Value>
    where
        A: TryInto<Address>,
        A::Error: Into<BchError>,
    {
        let addr: Address = validate(addr)?;
        let body = self.send(self.requests.build_get_balance(&addr))?;
        Ok(self.requests.parse_passthrough(body))
    }

    /// `POST /bch/utxos`. The body holds the `bchUtxos` / `slpUtxos` split
    /// computed by the gateway.
    pub fn get_utxos<A>(&self, addr: A) -> BchResult<Value>
    where
        A: TryInto<Address>,
        A::Error: Into<BchError>,
    {
        let addr: Address = validate(addr)?;
        let body = self.send(self.requests.build_get_utxos(&addr))?;
        Ok(self.requests.parse_passthrough(body))
    }

    /// Broadcast a signed transaction.
    ///
    /// A rejection reported by the gateway (`success: false`) comes back as
    /// `Ok`; inspect the body. Not idempotent: calling again after a timeout
    /// may broadcast twice.
    pub fn send_tx<H>(&self, hex: H) -> BchResult<Value>
    where
        H: TryInto<TxHex>,
        H::Error: Into<BchError>,
    {
        let hex: TxHex = validate(hex)?;
        let body = self.send(self.requests.build_send_tx(&hex))?;
        Ok(self.requests.parse_passthrough(body))
    }

    /// Detailed transaction data. Returns the `txData` field of the body.
    pub fn get_tx_data<L>(&self, txids: L) -> BchResult<Value>
    where
        L: TryInto<TxidList>,
        L::Error: Into<BchError>,
    {
        let txids: TxidList = validate(txids)?;
        let body = self.send(self.requests.build_get_tx_data(&txids))?;
        Ok(self.requests.parse_get_tx_data(body)?)
    }

    pub fn get_tx_history<A>(&self, addr: A) -> BchResult<Value>
    where
        A: TryInto<Address>,
        A::Error: Into<BchError>,
    {
        let addr: Address = validate(addr)?;
        let body = self.send(self.requests.build_get_tx_history(&addr))?;
        Ok(self.requests.parse_passthrough(body))
    }

    /// Spot price of BCH in USD.
    pub fn get_usd(&self) -> BchResult<f64> {
        let body = self.send(self.requests.build_get_usd())?;
        Ok(self.requests.parse_get_usd(body)?)
    }

    /// Ask the gateway whether `utxo` is still unspent. Either UTXO shape is
    /// forwarded as given.
    pub fn utxo_is_valid<U>(&self, utxo: U) -> BchResult<Value>
    where
        U: TryInto<Utxo>,
        U::Error: Into<BchError>,
    {
        let utxo: Utxo = validate(utxo)?;
        let body = self.send(self.requests.build_utxo_is_valid(&utxo))?;
        Ok(self.requests.parse_passthrough(body))
    }

    pub fn get_token_data<I>(&self, token_id: I, options: TokenDataOptions) -> BchResult<Value>
    where
        I: TryInto<TokenId>,
        I::Error: Into<BchError>,
    {
        let token_id: TokenId = validate(token_id)?;
        let body = self.send(self.requests.build_get_token_data(&token_id, options))?;
        Ok(self.requests.parse_passthrough(body))
    }

    pub fn get_token_data2<I>(&self, token_id: I) -> BchResult<Value>
    where
        I: TryInto<TokenId>,
        I::Error: Into<BchError>,
    {
        let token_id: TokenId = validate(token_id)?;
        let body = self.send(self.requests.build_get_token_data2(&token_id))?;
        Ok(self.requests.parse_passthrough(body))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::error::{ConfigError, TransportError, ValidationError};
    use crate::http::HttpMethod;
    use crate::types::{EXPECT_ADDRESS, EXPECT_TOKEN_ID, EXPECT_TXIDS, EXPECT_TX_HEX, EXPECT_UTXO};

    /// Records every request and answers from a queue of canned results.
    #[derive(Debug, Default)]
    pub(crate) struct MockTransport {
        pub calls: Mutex<Vec<HttpRequest>>,
        pub replies: Mutex<VecDeque<Result<Value, TransportError>>>,
    }

    impl MockTransport {
        pub fn replying(reply: Value) -> Self {
            let mock = Self::default();
            mock.push(Ok(reply));
            mock
        }

        pub fn push(&self, reply: Result<Value, TransportError>) {
            self.replies.lock().unwrap().push_back(reply);
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn answer(&self, request: HttpRequest) -> Result<Value, TransportError> {
            self.calls.lock().unwrap().push(request);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(json!({})))
        }
    }

    impl Transport for MockTransport {
        fn post(&self, url: &str, body: &Value) -> Result<Value, TransportError> {
            self.answer(HttpRequest {
                method: HttpMethod::Post,
                url: url.to_string(),
                body: Some(body.clone()),
            })
        }

        fn get(&self, url: &str) -> Result<Value, TransportError> {
            self.answer(HttpRequest {
                method: HttpMethod::Get,
                url: url.to_string(),
                body: None,
            })
        }
    }

    fn client(mock: &MockTransport) -> BchClient<&MockTransport> {
        BchClient::new("fakeurl", mock).unwrap()
    }

    fn assert_validation(err: BchError, expected: &'static str) {
        assert_eq!(err, BchError::Validation(ValidationError::new(expected)));
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn new_requires_base_url() {
        let mock = MockTransport::default();
        let err = BchClient::new("", &mock).unwrap_err();
        assert_eq!(err, BchError::Config(ConfigError::MissingBaseUrl));
        assert_eq!(err.to_string(), "restURL required when instantiating BCH library");
    }

    #[test]
    fn get_balance_returns_body() {
        let mock = MockTransport::replying(json!({ "key": "value" }));
        let result = client(&mock).get_balance("testaddr").unwrap();
        assert_eq!(result["key"], "value");

        let calls = mock.calls.lock().unwrap();
        assert_eq!(calls[0].url, "fakeurl/bch/balance");
        assert_eq!(calls[0].body, Some(json!({ "addresses": ["testaddr"] })));
    }

    #[test]
    fn get_balance_rejects_non_string() {
        let mock = MockTransport::default();
        let err = client(&mock).get_balance(json!(123)).unwrap_err();
        assert_validation(err, EXPECT_ADDRESS);
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn get_utxos_returns_body() {
        let mock = MockTransport::replying(json!([{ "bchUtxos": [], "slpUtxos": {} }]));
        let result = client(&mock).get_utxos("testaddr").unwrap();
        assert!(result[0].get("bchUtxos").is_some());
        assert_eq!(mock.calls.lock().unwrap()[0].body, Some(json!({ "address": "testaddr" })));
    }

    #[test]
    fn get_utxos_rejects_non_string() {
        let mock = MockTransport::default();
        let err = client(&mock).get_utxos(json!(123)).unwrap_err();
        assert_validation(err, EXPECT_ADDRESS);
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn send_tx_returns_body() {
        let mock = MockTransport::replying(json!({ "key": "value" }));
        let result = client(&mock).send_tx("fakehex").unwrap();
        assert_eq!(result["key"], "value");
    }

    #[test]
    fn send_tx_logical_failure_is_not_an_error() {
        let reply = json!({ "success": false, "endpoint": "broadcast" });
        let mock = MockTransport::replying(reply.clone());
        let result = client(&mock).send_tx("fakehex").unwrap();
        assert_eq!(result, reply);
    }

    #[test]
    fn send_tx_rejects_non_string() {
        let mock = MockTransport::default();
        let err = client(&mock).send_tx(json!(123)).unwrap_err();
        assert_validation(err, EXPECT_TX_HEX);
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn get_tx_data_unwraps_tx_data() {
        let mock = MockTransport::replying(json!({ "txData": { "txid": "id1", "vin": [], "vout": [] } }));
        let result = client(&mock).get_tx_data(vec!["id1"]).unwrap();
        assert_eq!(result, json!({ "txid": "id1", "vin": [], "vout": [] }));
        assert_eq!(mock.calls.lock().unwrap()[0].body, Some(json!({ "txids": ["id1"] })));
    }

    #[test]
    fn get_tx_data_rejects_non_sequence() {
        let mock = MockTransport::default();
        let err = client(&mock).get_tx_data(json!(123)).unwrap_err();
        assert_validation(err, EXPECT_TXIDS);
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn get_tx_history_returns_body() {
        let mock = MockTransport::replying(json!({ "success": true, "transactions": [] }));
        let result = client(&mock).get_tx_history("testaddr").unwrap();
        assert_eq!(result["success"], true);
        assert_eq!(mock.calls.lock().unwrap()[0].url, "fakeurl/bch/txHistory");
    }

    #[test]
    fn get_tx_history_rejects_non_string() {
        let mock = MockTransport::default();
        let err = client(&mock).get_tx_history(json!(123)).unwrap_err();
        assert_validation(err, EXPECT_ADDRESS);
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn get_usd_unwraps_price() {
        let mock = MockTransport::replying(json!({ "usd": 300.00 }));
        assert_eq!(client(&mock).get_usd().unwrap(), 300.00);
        let calls = mock.calls.lock().unwrap();
        assert_eq!(calls[0].method, HttpMethod::Get);
        assert_eq!(calls[0].url, "fakeurl/price/usd");
    }

    #[test]
    fn utxo_is_valid_forwards_both_shapes() {
        let mock = MockTransport::default();
        mock.push(Ok(json!({ "isValid": true })));
        mock.push(Ok(json!({ "isValid": false })));
        let c = client(&mock);

        let full = json!({ "txid": "fake", "vout": 0, "value": "546" });
        let indexed = json!({ "tx_hash": "fake", "tx_pos": 1, "height": 1 });
        assert_eq!(c.utxo_is_valid(&full).unwrap()["isValid"], true);
        assert_eq!(c.utxo_is_valid(Utxo::try_from(&indexed).unwrap()).unwrap()["isValid"], false);

        let calls = mock.calls.lock().unwrap();
        assert_eq!(calls[0].body, Some(json!({ "utxo": full })));
        assert_eq!(calls[1].body, Some(json!({ "utxo": indexed })));
    }

    #[test]
    fn utxo_is_valid_rejects_non_record() {
        let mock = MockTransport::default();
        let err = client(&mock).utxo_is_valid(json!("fake")).unwrap_err();
        assert_validation(err, EXPECT_UTXO);
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn utxo_is_valid_propagates_transport_errors() {
        let mock = MockTransport::default();
        mock.push(Err(TransportError::Connection("test error".to_string())));
        let err = client(&mock).utxo_is_valid(Utxo::fullnode("fake", 0)).unwrap_err();
        assert_eq!(err, BchError::Transport(TransportError::Connection("test error".to_string())));
    }

    #[test]
    fn get_token_data_defaults_to_no_history() {
        let mock = MockTransport::replying(json!({ "a": "b" }));
        let token = "c85042ab08a2099f27de880a30f9a42874202751d834c42717a20801a00aab0d";
        let result = client(&mock).get_token_data(token, TokenDataOptions::default()).unwrap();
        assert_eq!(result["a"], "b");
        assert_eq!(
            mock.calls.lock().unwrap()[0].body,
            Some(json!({ "tokenId": token, "withTxHistory": false }))
        );
    }

    #[test]
    fn get_token_data_propagates_transport_errors() {
        let mock = MockTransport::default();
        mock.push(Err(TransportError::Status {
            status: 500,
            body: "test error".to_string(),
        }));
        let err = client(&mock)
            .get_token_data("c85042ab", TokenDataOptions::with_tx_history())
            .unwrap_err();
        assert!(matches!(err, BchError::Transport(TransportError::Status { status: 500, .. })));
    }

    #[test]
    fn get_token_data2_rejects_non_string() {
        let mock = MockTransport::default();
        let err = client(&mock).get_token_data2(json!(["c85042ab"])).unwrap_err();
        assert_validation(err, EXPECT_TOKEN_ID);
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn get_token_data2_returns_body() {
        let mock = MockTransport::replying(json!({ "tokenData": { "ticker": "TST" } }));
        let result = client(&mock).get_token_data2("c85042ab").unwrap();
        assert_eq!(result["tokenData"]["ticker"], "TST");
        assert_eq!(mock.calls.lock().unwrap()[0].url, "fakeurl/bch/getTokenData2");
    }

    #[test]
    fn read_operations_are_repeatable() {
        let mock = MockTransport::default();
        mock.push(Ok(json!({ "balances": [] })));
        mock.push(Ok(json!({ "balances": [] })));
        let c = client(&mock);
        assert_eq!(c.get_balance("a").unwrap(), c.get_balance("a").unwrap());
        let calls = mock.calls.lock().unwrap();
        assert_eq!(calls[0], calls[1]);
    }

    #[test]
    fn typed_inputs_are_accepted_by_value() {
        let mock = MockTransport::default();
        let c = client(&mock);
        mock.push(Ok(json!({})));
        mock.push(Ok(json!({})));
        mock.push(Ok(json!({ "txData": [] })));
        c.get_balance(Address::try_from("a").unwrap()).unwrap();
        c.send_tx(String::from("00")).unwrap();
        assert_eq!(c.get_tx_data(TxidList::try_from(["id1"]).unwrap()).unwrap(), json!([]));
        assert_eq!(mock.call_count(), 3);
    }
}
