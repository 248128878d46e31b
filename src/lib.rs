//! # Bitunix Client
//!
//! An async Rust client library for the Bitunix futures REST API.
//!
//! ## Features
//!
//! - Signed requests with a fresh nonce and timestamp on every call
//! - Input validation before anything is sent
//! - An order workflow that opens a position and attaches take-profit and
//!   stop-loss orders, reporting the outcome of every leg
//! - Financial precision with `rust_decimal`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use bitunix_api_client::auth::EnvCredentials;
//! use bitunix_api_client::{BitunixClient, OrderPayload, OrderType, Side, TakeProfitLeg};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = EnvCredentials::try_from_env().ok_or("BITUNIX_API_KEY not set")?;
//!     let client = BitunixClient::builder()
//!         .credentials(Arc::new(credentials))
//!         .build()?;
//!
//!     let payload = OrderPayload::new("BTC", Side::Buy, OrderType::Market, "100".parse()?)
//!         .leverage(10)
//!         .take_profit(TakeProfitLeg::new("55000".parse()?, "100".parse()?))
//!         .stop_loss("45000".parse()?);
//!
//!     let report = client.open_order(&payload).await?;
//!     println!("Position {} opened, all legs attached: {}", report.position_id, report.all_legs_attached());
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod rest;
pub mod trade;
pub mod types;
pub mod validate;

// Re-export commonly used types at crate root
pub use config::{ClientConfig, SettlementPolicy};
pub use error::{BitunixError, ErrorKind};
pub use rest::{BitunixClient, BitunixClientBuilder, FuturesApi};
pub use trade::{OpenOrderReport, OrderPayload, TakeProfitLeg};
pub use types::common::{MarginMode, OrderType, PositionMode, Side};

/// Result type alias using BitunixError
pub type Result<T> = std::result::Result<T, BitunixError>;
