use std::collections::HashSet;
use std::sync::Arc;

use rust_decimal::Decimal;
use tokio_test::assert_ok;
use wiremock::matchers::{any, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bitunix_api_client::auth::StaticCredentials;
use bitunix_api_client::error::{AbortReason, ErrorKind};
use bitunix_api_client::trade::{LegKind, OrderStage};
use bitunix_api_client::{
    BitunixClient, MarginMode, OrderPayload, OrderType, SettlementPolicy, Side, TakeProfitLeg,
};

const LEVERAGE: &str = "/api/v1/futures/account/change_leverage";
const MARGIN_MODE: &str = "/api/v1/futures/account/change_margin_mode";
const TICKERS: &str = "/api/v1/futures/market/tickers";
const PLACE_ORDER: &str = "/api/v1/futures/trade/place_order";
const POSITIONS: &str = "/api/v1/futures/position/get_pending_positions";
const TPSL: &str = "/api/v1/futures/tpsl/place_order";

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "code": 0,
        "data": data,
        "msg": "Success"
    }))
}

fn build_client(server: &MockServer, settlement: SettlementPolicy) -> BitunixClient {
    BitunixClient::builder()
        .base_url(server.uri())
        .credentials(Arc::new(StaticCredentials::new("test_key", "test_secret")))
        .settlement(settlement)
        .build()
        .unwrap()
}

fn payload() -> OrderPayload {
    OrderPayload::new("BTC", Side::Buy, OrderType::Market, dec("100"))
        .leverage(10)
        .margin_type(MarginMode::Cross)
        .take_profit(TakeProfitLeg::new(dec("55000"), dec("50")))
        .take_profit(TakeProfitLeg::new(dec("60000"), dec("50")))
        .stop_loss(dec("45000"))
}

async fn mount_setup(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(LEVERAGE))
        .and(body_string_contains(r#""leverage":10"#))
        .respond_with(ok(serde_json::json!({ "symbol": "BTCUSDT", "leverage": 10 })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(MARGIN_MODE))
        .and(body_string_contains(r#""marginMode":"CROSS""#))
        .respond_with(ok(serde_json::json!({ "symbol": "BTCUSDT", "marginMode": "CROSS" })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_price(server: &MockServer, tickers: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(TICKERS))
        .and(query_param("symbols", "BTCUSDT"))
        .respond_with(ok(tickers))
        .mount(server)
        .await;
}

async fn mount_order(server: &MockServer, expected: u64) {
    Mock::given(method("POST"))
        .and(path(PLACE_ORDER))
        .and(body_string_contains(r#""qty":"0.002""#))
        .and(body_string_contains(r#""effect":"GTC""#))
        .and(body_string_contains(r#""clientId":""#))
        .respond_with(ok(serde_json::json!({ "orderId": "order-1", "clientId": "c-1" })))
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_position(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(POSITIONS))
        .and(query_param("symbol", "BTCUSDT"))
        .respond_with(ok(serde_json::json!([
            { "positionId": "pos-1", "symbol": "BTCUSDT", "qty": "0.002", "side": "BUY" }
        ])))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_open_order_happy_path() {
    let server = MockServer::start().await;
    mount_setup(&server).await;
    mount_price(&server, serde_json::json!([{ "symbol": "BTCUSDT", "lastPrice": "50000" }])).await;
    mount_order(&server, 1).await;
    mount_position(&server).await;

    Mock::given(method("POST"))
        .and(path(TPSL))
        .and(body_string_contains(r#""positionId":"pos-1""#))
        .and(body_string_contains(r#""tpQty":"0.001000""#))
        .respond_with(ok(serde_json::json!({ "orderId": "tp" })))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(TPSL))
        .and(body_string_contains(r#""slPrice":"45000""#))
        .and(body_string_contains(r#""slQty":"0.002""#))
        .respond_with(ok(serde_json::json!({ "orderId": "sl" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server, SettlementPolicy::immediate(3));
    let report = assert_ok!(client.open_order(&payload()).await);

    assert_eq!(report.symbol, "BTCUSDT");
    assert_eq!(report.market_price, dec("50000"));
    assert_eq!(report.quantity, dec("0.002"));
    assert_eq!(report.position_id, "pos-1");
    assert_eq!(report.take_profit_percent_total, dec("100"));
    assert!(report.all_legs_attached());
    assert_eq!(report.legs.len(), 3);
    assert_eq!(report.legs[0].quantity.to_string(), "0.001000");
    assert_eq!(report.stop_loss().and_then(|l| l.order_id.as_deref()), Some("sl"));

    // Every signed call carries its own nonce.
    let requests = server.received_requests().await.unwrap();
    let nonces: Vec<_> = requests
        .iter()
        .filter_map(|r| r.headers.get("nonce"))
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(nonces.len(), 7);
    assert_eq!(nonces.iter().collect::<HashSet<_>>().len(), nonces.len());
}

#[tokio::test]
async fn test_invalid_payload_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = build_client(&server, SettlementPolicy::immediate(1));

    let cases = [
        OrderPayload { symbol: "btc".into(), ..payload() },
        payload().leverage(150),
        OrderPayload { margin: Decimal::ZERO, ..payload() },
        OrderPayload { take_profit: Vec::new(), ..payload() },
        payload().take_profit(TakeProfitLeg::new(dec("70000"), dec("0"))),
        payload().stop_loss(dec("-1")),
        OrderPayload { order_type: OrderType::Limit, ..payload() },
    ];

    for case in &cases {
        let err = client.open_order(case).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "{case:?}");
    }
}

#[tokio::test]
async fn test_missing_price_aborts_without_rollback() {
    let server = MockServer::start().await;
    mount_setup(&server).await;
    mount_price(&server, serde_json::json!([])).await;
    mount_order(&server, 0).await;

    let client = build_client(&server, SettlementPolicy::immediate(1));
    let err = client.open_order(&payload()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::WorkflowAbort);
    let abort = err.workflow_abort().unwrap();
    assert_eq!(abort.stage, OrderStage::FetchingPrice);
    assert!(matches!(
        &abort.reason,
        AbortReason::NoMarketPrice { symbol } if symbol == "BTCUSDT"
    ));
}

#[tokio::test]
async fn test_position_not_found_sends_no_legs() {
    let server = MockServer::start().await;
    mount_setup(&server).await;
    mount_price(&server, serde_json::json!([{ "symbol": "BTCUSDT", "lastPrice": "50000" }])).await;
    mount_order(&server, 1).await;

    Mock::given(method("GET"))
        .and(path(POSITIONS))
        .respond_with(ok(serde_json::json!([])))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(path(TPSL))
        .respond_with(ok(serde_json::json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let client = build_client(&server, SettlementPolicy::immediate(2));
    let err = client.open_order(&payload()).await.unwrap_err();

    let abort = err.workflow_abort().unwrap();
    assert_eq!(abort.stage, OrderStage::AwaitingPositionId);
    assert!(matches!(
        abort.reason,
        AbortReason::PositionNotFound { attempts: 2, .. }
    ));
}

#[tokio::test]
async fn test_order_rejection_surfaces_exchange_body() {
    let server = MockServer::start().await;
    mount_setup(&server).await;
    mount_price(&server, serde_json::json!([{ "symbol": "BTCUSDT", "lastPrice": "50000" }])).await;

    let body = r#"{"code":20005,"data":null,"msg":"Insufficient balance"}"#;
    Mock::given(method("POST"))
        .and(path(PLACE_ORDER))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server, SettlementPolicy::immediate(1));
    let err = client.open_order(&payload()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::WorkflowAbort);
    assert_eq!(err.root_kind(), ErrorKind::Application);
    assert_eq!(err.workflow_abort().unwrap().stage, OrderStage::PlacingOrder);
    assert_eq!(err.api_error().unwrap().body, body);
}

#[tokio::test]
async fn test_failed_leg_is_reported() {
    let server = MockServer::start().await;
    mount_setup(&server).await;
    mount_price(&server, serde_json::json!([{ "symbol": "BTCUSDT", "lastPrice": "50000" }])).await;
    mount_order(&server, 1).await;
    mount_position(&server).await;

    Mock::given(method("POST"))
        .and(path(TPSL))
        .and(body_string_contains(r#""tpPrice":"55000""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": 10002,
            "msg": "Parameter error"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(TPSL))
        .and(body_string_contains(r#""tpPrice":"60000""#))
        .respond_with(ok(serde_json::json!({ "orderId": "tp-2" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(TPSL))
        .and(body_string_contains(r#""slPrice""#))
        .respond_with(ok(serde_json::json!({ "orderId": "sl" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server, SettlementPolicy::immediate(1));
    let report = client.open_order(&payload()).await.unwrap();

    assert!(!report.all_legs_attached());
    let failed: Vec<_> = report.failed_legs().collect();
    assert_eq!(failed.len(), 1);
    assert!(matches!(failed[0].leg, LegKind::TakeProfit { index: 0, .. }));
    assert_eq!(
        failed[0].error.as_ref().and_then(|e| e.api_error()).map(|e| e.code),
        Some(10002)
    );
    assert!(report.legs[1].succeeded);
    assert!(report.stop_loss().unwrap().succeeded);
}
