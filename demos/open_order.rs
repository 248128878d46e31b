//! Example: Open a position with take-profit and stop-loss legs.
//!
//! Reads the order from a JSON file and only sends it when
//! `BITUNIX_SEND_ORDER` is set. This places a real order.
//!
//! Run with: cargo run --example open_order -- order.json

use std::sync::Arc;

use bitunix_api_client::auth::EnvCredentials;
use bitunix_api_client::trade::LegKind;
use bitunix_api_client::validate::validate_payload;
use bitunix_api_client::{BitunixClient, OrderPayload};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => {
            println!("Usage: open_order <payload.json>");
            return Ok(());
        }
    };
    let payload = OrderPayload::from_json(&std::fs::read_to_string(path)?)?;
    validate_payload(&payload)?;
    println!("Payload OK: {} {} margin {}", payload.side, payload.symbol, payload.margin);
    println!("Take profit total: {}%", payload.take_profit_percent_total());

    if std::env::var("BITUNIX_SEND_ORDER").is_err() {
        println!("Set BITUNIX_SEND_ORDER=1 to place the order.");
        return Ok(());
    }

    let credentials = match EnvCredentials::try_from_env() {
        Some(creds) => Arc::new(creds),
        None => {
            println!("Set BITUNIX_API_KEY and BITUNIX_API_SECRET to run this example.");
            return Ok(());
        }
    };
    let client = BitunixClient::builder().credentials(credentials).build()?;

    let report = client.open_order(&payload).await?;
    println!(
        "Opened {} qty {} at {} (position {})",
        report.symbol, report.quantity, report.market_price, report.position_id
    );
    for outcome in &report.legs {
        let name = match outcome.leg {
            LegKind::TakeProfit { index, price, .. } => format!("take profit #{index} @ {price}"),
            LegKind::StopLoss { price } => format!("stop loss @ {price}"),
        };
        match &outcome.error {
            None => println!("  {name}: qty {} attached", outcome.quantity),
            Some(err) => println!("  {name}: qty {} failed: {err}", outcome.quantity),
        }
    }

    Ok(())
}
