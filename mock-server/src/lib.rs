use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Address with one confirmed UTXO in the fixture data.
pub const FUNDED_ADDRESS: &str = "bitcoincash:qp3sn6vlwz28ntmf3wmyra7jqttfx7z6zgtkygjhc7";
pub const FUNDED_TXID: &str = "01517ff1587fa5ffe6f5eb91c99cf3f2d22330cd7ee847e928ce90ca95bf781b";
pub const FUNDED_VOUT: u32 = 0;
pub const FUNDED_SATS: u64 = 1000;
pub const TOKEN_ID: &str = "c85042ab08a2099f27de880a30f9a42874202751d834c42717a20801a00aab0d";
pub const USD_PRICE: f64 = 250.35;

#[derive(Default)]
pub struct Gateway {
    broadcasts: AtomicU64,
}

impl Gateway {
    pub fn broadcast_count(&self) -> u64 {
        self.broadcasts.load(Ordering::SeqCst)
    }
}

pub type Shared = Arc<Gateway>;

#[derive(Deserialize)]
pub struct BalanceRequest {
    pub addresses: Vec<String>,
}

#[derive(Deserialize)]
pub struct AddressRequest {
    pub address: String,
}

#[derive(Deserialize)]
pub struct BroadcastRequest {
    pub hex: String,
}

#[derive(Deserialize)]
pub struct TxDataRequest {
    pub txids: Vec<String>,
}

#[derive(Deserialize)]
pub struct UtxoRequest {
    pub utxo: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    pub token_id: String,
    #[serde(default)]
    pub with_tx_history: bool,
}

type Rejection = (StatusCode, Json<Value>);

fn reject(message: &str) -> Rejection {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "success": false, "error": message })),
    )
}

pub fn app() -> Router {
    app_with(Shared::default())
}

pub fn app_with(gateway: Shared) -> Router {
    Router::new()
        .route("/bch/balance", post(balance))
        .route("/bch/utxos", post(utxos))
        .route("/bch/broadcast", post(broadcast))
        .route("/bch/txData", post(tx_data))
        .route("/bch/txHistory", post(tx_history))
        .route("/bch/utxoIsValid", post(utxo_is_valid))
        .route("/bch/getTokenData", post(token_data))
        .route("/bch/getTokenData2", post(token_data2))
        .route("/price/usd", get(usd))
        .with_state(gateway)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, Shared::default()).await
}

/// Like `run`, but the caller keeps a handle on the gateway state.
pub async fn serve(listener: TcpListener, gateway: Shared) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(gateway)).await
}

fn confirmed_sats(address: &str) -> u64 {
    if address == FUNDED_ADDRESS {
        FUNDED_SATS
    } else {
        0
    }
}

async fn balance(Json(input): Json<BalanceRequest>) -> Json<Value> {
    let balances: Vec<Value> = input
        .addresses
        .iter()
        .map(|address| {
            json!({
                "address": address,
                "balance": { "confirmed": confirmed_sats(address), "unconfirmed": 0 }
            })
        })
        .collect();
    Json(json!({ "success": true, "balances": balances }))
}

async fn utxos(Json(input): Json<AddressRequest>) -> Json<Value> {
    let bch_utxos = if input.address == FUNDED_ADDRESS {
        json!([{ "height": 700000, "tx_hash": FUNDED_TXID, "tx_pos": FUNDED_VOUT, "value": FUNDED_SATS }])
    } else {
        json!([])
    };
    Json(json!([{
        "address": input.address,
        "bchUtxos": bch_utxos,
        "slpUtxos": { "type1": { "tokens": [], "mintBatons": [] }, "nft": {} },
        "nullUtxos": []
    }]))
}

async fn broadcast(
    State(gateway): State<Shared>,
    Json(input): Json<BroadcastRequest>,
) -> Json<Value> {
    let n = gateway.broadcasts.fetch_add(1, Ordering::SeqCst) + 1;
    let decodable = !input.hex.is_empty()
        && input.hex.len() % 2 == 0
        && input.hex.chars().all(|c| c.is_ascii_hexdigit());
    if !decodable {
        return Json(json!({
            "success": false,
            "status": 422,
            "endpoint": "broadcast",
            "error": "TX decode failed"
        }));
    }
    Json(json!({ "success": true, "txid": format!("{n:064x}") }))
}

async fn tx_data(Json(input): Json<TxDataRequest>) -> Result<Json<Value>, Rejection> {
    if input.txids.is_empty() {
        return Err(reject("txids must not be empty"));
    }
    let txs: Vec<Value> = input
        .txids
        .iter()
        .map(|txid| json!({ "txid": txid, "vin": [], "vout": [] }))
        .collect();
    Ok(Json(json!({ "txData": txs })))
}

async fn tx_history(Json(input): Json<AddressRequest>) -> Json<Value> {
    let transactions = if input.address == FUNDED_ADDRESS {
        json!([{ "height": 700000, "tx_hash": FUNDED_TXID }])
    } else {
        json!([])
    };
    Json(json!({
        "success": true,
        "transactions": [{ "address": input.address, "transactions": transactions }]
    }))
}

async fn usd() -> Json<Value> {
    Json(json!({ "usd": USD_PRICE }))
}

/// Accepts both UTXO spellings, like the real gateway.
fn outpoint(utxo: &Value) -> Option<(&str, u64)> {
    let fullnode = utxo["txid"].as_str().zip(utxo["vout"].as_u64());
    fullnode.or_else(|| utxo["tx_hash"].as_str().zip(utxo["tx_pos"].as_u64()))
}

async fn utxo_is_valid(Json(input): Json<UtxoRequest>) -> Result<Json<Value>, Rejection> {
    let (txid, vout) = outpoint(&input.utxo)
        .ok_or_else(|| reject("utxo must carry txid/vout or tx_hash/tx_pos"))?;
    let is_valid = txid == FUNDED_TXID && vout == u64::from(FUNDED_VOUT);
    Ok(Json(json!({ "isValid": is_valid })))
}

fn genesis_data() -> Value {
    json!({
        "type": 1,
        "ticker": "TST",
        "name": "Test Token",
        "tokenId": TOKEN_ID,
        "decimals": 2,
        "totalMinted": "1000000"
    })
}

async fn token_data(Json(input): Json<TokenRequest>) -> Result<Json<Value>, Rejection> {
    if input.token_id != TOKEN_ID {
        return Err(reject("token not found"));
    }
    let mut body = json!({
        "tokenData": { "genesisData": genesis_data(), "immutableData": "", "mutableData": "" }
    });
    if input.with_tx_history {
        body["tokenData"]["txHistory"] = json!([{ "txid": TOKEN_ID, "height": 650000 }]);
    }
    Ok(Json(body))
}

async fn token_data2(Json(input): Json<TokenRequest>) -> Result<Json<Value>, Rejection> {
    if input.token_id != TOKEN_ID {
        return Err(reject("token not found"));
    }
    Ok(Json(json!({
        "tokenStats": genesis_data(),
        "mutableData": {},
        "immutableData": {},
        "tokenIcon": null
    })))
}
