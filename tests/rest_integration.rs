use std::sync::Arc;

use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bitunix_api_client::auth::{NonceProvider, StaticCredentials, TimestampProvider};
use bitunix_api_client::error::{BitunixError, ErrorKind, error_codes};
use bitunix_api_client::rest::{BitunixClient, PlaceOrderRequest, TpSlOrderRequest};
use bitunix_api_client::types::{MarginMode, PositionMode, Side};
use rust_decimal::Decimal;

const NONCE: &str = "0123456789abcdef0123456789abcdef";
const TIMESTAMP: u64 = 1_700_000_000_000;

struct FixedNonce(&'static str);

impl NonceProvider for FixedNonce {
    fn next_nonce(&self) -> String {
        self.0.to_string()
    }
}

struct FixedClock(u64);

impl TimestampProvider for FixedClock {
    fn timestamp_millis(&self) -> u64 {
        self.0
    }
}

fn build_signed_client(server: &MockServer) -> BitunixClient {
    BitunixClient::builder()
        .base_url(server.uri())
        .credentials(Arc::new(StaticCredentials::new("test_key", "test_secret")))
        .nonce_provider(Arc::new(FixedNonce(NONCE)))
        .timestamp_provider(Arc::new(FixedClock(TIMESTAMP)))
        .build()
        .unwrap()
}

fn build_public_client(server: &MockServer) -> BitunixClient {
    BitunixClient::builder().base_url(server.uri()).build().unwrap()
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "code": 0,
        "data": data,
        "msg": "Success"
    }))
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[tokio::test]
async fn test_get_account_signs_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/futures/account"))
        .and(query_param("marginCoin", "USDT"))
        .and(header("api-key", "test_key"))
        .and(header("nonce", NONCE))
        .and(header("timestamp", "1700000000000"))
        .and(header(
            "sign",
            "c7680f755b76d380915d713ea4c915de016d0a602e451f8a464b71498029b301",
        ))
        .and(header("language", "en-US"))
        .and(header("content-type", "application/json"))
        .respond_with(ok(serde_json::json!({
            "marginCoin": "USDT",
            "available": "1000.5",
            "frozen": "0",
            "positionMode": "ONE_WAY"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_signed_client(&server);
    let account = assert_ok!(client.get_account().await);
    assert_eq!(account.margin_coin, "USDT");
    assert_eq!(account.available, Some(dec("1000.5")));
    assert_eq!(account.position_mode, Some(PositionMode::OneWay));
}

#[tokio::test]
async fn test_set_leverage_signs_compact_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/futures/account/change_leverage"))
        .and(body_string(
            r#"{"symbol":"BTCUSDT","leverage":10,"marginCoin":"USDT"}"#,
        ))
        .and(header(
            "sign",
            "816399dec0d57e4718b956807e939469dd532da97069938caef098895ae633e2",
        ))
        .respond_with(ok(serde_json::json!({
            "symbol": "BTCUSDT",
            "leverage": 10,
            "marginCoin": "USDT"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_signed_client(&server);
    let setting = assert_ok!(client.set_leverage("BTC", 10).await);
    assert_eq!(setting.symbol, "BTCUSDT");
    assert_eq!(setting.leverage, Some(10));
}

#[tokio::test]
async fn test_set_margin_mode_sends_wire_name() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/futures/account/change_margin_mode"))
        .and(body_string(
            r#"{"symbol":"ETHUSDT","marginMode":"ISOLATION","marginCoin":"USDT"}"#,
        ))
        .respond_with(ok(serde_json::json!({
            "symbol": "ETHUSDT",
            "marginMode": "ISOLATION",
            "marginCoin": "USDT"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_signed_client(&server);
    let setting = assert_ok!(client.set_margin_mode("ETH", MarginMode::Isolated).await);
    assert_eq!(setting.margin_mode, Some(MarginMode::Isolated));
}

#[tokio::test]
async fn test_set_position_mode() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/futures/account/change_position_mode"))
        .and(body_string(r#"{"positionMode":"HEDGE"}"#))
        .respond_with(ok(serde_json::json!({ "positionMode": "HEDGE" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_signed_client(&server);
    let setting = assert_ok!(client.set_position_mode(PositionMode::Hedge).await);
    assert_eq!(setting.position_mode, Some(PositionMode::Hedge));
}

#[tokio::test]
async fn test_get_positions_filters_by_symbol() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/futures/position/get_pending_positions"))
        .and(query_param("symbol", "BTCUSDT"))
        .respond_with(ok(serde_json::json!([
            { "positionId": "pos-1", "symbol": "BTCUSDT", "qty": "0.002", "side": "BUY" },
            { "positionId": "pos-2", "symbol": "ETHUSDT", "qty": "1", "side": "SELL" }
        ])))
        .expect(2)
        .mount(&server)
        .await;

    let client = build_signed_client(&server);
    let positions = client.get_positions(Some("BTC")).await.unwrap();
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0].position_id, "pos-1");
    assert_eq!(positions[0].qty, Some(dec("0.002")));

    let id = client.find_position_id("BTC").await.unwrap();
    assert_eq!(id.as_deref(), Some("pos-1"));
}

#[tokio::test]
async fn test_get_position_history() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/futures/position/get_history_positions"))
        .respond_with(ok(serde_json::json!({
            "positionList": [
                { "positionId": "old-1", "symbol": "BTCUSDT", "side": "SELL",
                  "entryPrice": "51000", "closePrice": "50000", "realizedPNL": "12.5" }
            ],
            "total": "1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_signed_client(&server);
    let history = client.get_position_history(None).await.unwrap();
    assert_eq!(history.position_list.len(), 1);
    assert_eq!(history.position_list[0].close_price, Some(dec("50000")));
}

#[tokio::test]
async fn test_market_price_falls_back_to_mark_price() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/futures/market/tickers"))
        .and(query_param("symbols", "BTCUSDT"))
        .respond_with(ok(serde_json::json!([
            { "symbol": "BTCUSDT", "lastPrice": "0", "markPrice": "50010.5" }
        ])))
        .mount(&server)
        .await;

    let client = build_public_client(&server);
    let price = client.get_market_price("BTC").await.unwrap();
    assert_eq!(price, Some(dec("50010.5")));
}

#[tokio::test]
async fn test_market_price_missing_ticker() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/futures/market/tickers"))
        .respond_with(ok(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = build_public_client(&server);
    assert_eq!(client.get_market_price("BTC").await.unwrap(), None);
}

#[tokio::test]
async fn test_place_order_and_tpsl_bodies() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/futures/trade/place_order"))
        .and(body_string(
            r#"{"symbol":"BTCUSDT","side":"BUY","qty":"0.002","orderType":"MARKET","effect":"GTC"}"#,
        ))
        .respond_with(ok(serde_json::json!({ "orderId": "11111" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/futures/tpsl/place_order"))
        .and(body_string(
            r#"{"symbol":"BTCUSDT","positionId":"123","tpPrice":"55000","tpQty":"0.001000"}"#,
        ))
        .respond_with(ok(serde_json::json!({ "orderId": "22222" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_signed_client(&server);
    let order = PlaceOrderRequest::market("BTCUSDT", Side::Buy, dec("0.002"));
    let placed = client.place_order(&order).await.unwrap();
    assert_eq!(placed.order_id.as_deref(), Some("11111"));

    let tp = TpSlOrderRequest::take_profit("BTCUSDT", "123", dec("55000"), dec("0.001000"));
    let attached = client.place_tpsl(&tp).await.unwrap();
    assert_eq!(attached.order_id.as_deref(), Some("22222"));
}

#[tokio::test]
async fn test_nonzero_code_maps_to_api_error() {
    let server = MockServer::start().await;
    let body = r#"{"code":10007,"data":null,"msg":"Signature Error"}"#;

    Mock::given(method("GET"))
        .and(path("/api/v1/futures/account"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let client = build_signed_client(&server);
    let err = assert_err!(client.get_account().await);

    assert_eq!(err.kind(), ErrorKind::Application);
    let api = err.api_error().unwrap();
    assert_eq!(api.code, error_codes::SIGNATURE_ERROR);
    assert!(api.is_signature_error());
    assert_eq!(api.message, "Signature Error");
    assert_eq!(api.body, body);
}

#[tokio::test]
async fn test_http_status_maps_to_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/futures/account"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let client = build_signed_client(&server);
    let err = client.get_account().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    match err {
        BitunixError::HttpStatus { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream down");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_undecodable_body_is_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/futures/market/tickers"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = build_public_client(&server);
    let err = client.get_market_price("BTC").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn test_private_call_without_credentials() {
    let server = MockServer::start().await;
    let client = build_public_client(&server);

    let err = client.get_account().await.unwrap_err();
    assert!(matches!(err, BitunixError::MissingCredentials));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_symbol_sends_nothing() {
    let server = MockServer::start().await;
    let client = build_signed_client(&server);

    let err = client.set_leverage("btc", 10).await.unwrap_err();
    assert!(err.is_validation());

    let err = client.set_leverage("BTC", 0).await.unwrap_err();
    assert!(err.is_validation());

    assert!(server.received_requests().await.unwrap().is_empty());
}
