//! Example: Account, positions and market data.
//!
//! Run with: cargo run --example account

use std::sync::Arc;

use bitunix_api_client::auth::EnvCredentials;
use bitunix_api_client::{BitunixClient, ClientConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let credentials = match EnvCredentials::try_from_env() {
        Some(creds) => Arc::new(creds),
        None => {
            println!("Set BITUNIX_API_KEY and BITUNIX_API_SECRET to run this example.");
            return Ok(());
        }
    };

    // Optional JSON config, e.g. {"quoteAsset": "USDT", "language": "en-US"}
    let config = match std::env::var("BITUNIX_CONFIG") {
        Ok(path) => ClientConfig::from_json_file(path)?,
        Err(_) => ClientConfig::default(),
    };

    let client = BitunixClient::builder()
        .config(config)
        .credentials(credentials)
        .build()?;

    println!("=== Market Price ===");
    match client.get_market_price("BTC").await? {
        Some(price) => println!("BTC: {price}"),
        None => println!("BTC: no price"),
    }

    println!("\n=== Account ===");
    let account = client.get_account().await?;
    println!(
        "{} available: {:?}, frozen: {:?}",
        account.margin_coin, account.available, account.frozen
    );

    println!("\n=== Open Positions ===");
    let positions = client.get_positions(None).await?;
    for position in &positions {
        println!(
            "{} {} qty={:?} id={}",
            position.symbol,
            position.side.as_deref().unwrap_or("?"),
            position.qty,
            position.position_id
        );
    }

    println!("\n=== Position History ===");
    let history = client.get_position_history(None).await?;
    println!("Closed positions: {}", history.position_list.len());

    Ok(())
}
