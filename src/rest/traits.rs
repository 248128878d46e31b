//! Trait definition for the Bitunix futures REST API.
//!
//! [`FuturesApi`] abstracts the operations the order workflow depends on.
//! This enables:
//! - Mock implementations for testing the workflow without a server
//! - Decorators around the real client
//!
//! # Example
//!
//! ```rust,ignore
//! use bitunix_api_client::rest::FuturesApi;
//!
//! async fn btc_price<C: FuturesApi>(client: &C) -> Result<(), bitunix_api_client::BitunixError> {
//!     let price = client.get_market_price("BTC").await?;
//!     println!("BTC: {price:?}");
//!     Ok(())
//! }
//! ```

use std::future::Future;

use rust_decimal::Decimal;

use crate::error::BitunixError;
use crate::rest::types::{
    AccountInfo, LeverageSetting, MarginModeSetting, PlaceOrderRequest, PlaceOrderResponse,
    Position, PositionHistory, PositionModeSetting, TpSlOrderRequest, TpSlOrderResponse,
};
use crate::types::{MarginMode, PositionMode};

/// Trait defining the Bitunix futures REST operations.
///
/// Symbols are base assets (`BTC`); implementations append the quote asset.
pub trait FuturesApi: Send + Sync {
    /// Quote asset appended to base symbols.
    fn quote_asset(&self) -> &str;

    /// Exchange symbol for a base asset, e.g. `BTC` to `BTCUSDT`.
    fn exchange_symbol(&self, symbol: &str) -> String {
        format!("{symbol}{}", self.quote_asset())
    }

    /// Get account balances in the quote asset.
    fn get_account(&self) -> impl Future<Output = Result<AccountInfo, BitunixError>> + Send;

    /// Get open positions, optionally only those of one symbol.
    fn get_positions(
        &self,
        symbol: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Position>, BitunixError>> + Send;

    /// Get closed positions, optionally only those of one symbol.
    fn get_position_history(
        &self,
        symbol: Option<&str>,
    ) -> impl Future<Output = Result<PositionHistory, BitunixError>> + Send;

    /// Set leverage of a symbol.
    fn set_leverage(
        &self,
        symbol: &str,
        leverage: u32,
    ) -> impl Future<Output = Result<LeverageSetting, BitunixError>> + Send;

    /// Set margin mode of a symbol.
    fn set_margin_mode(
        &self,
        symbol: &str,
        mode: MarginMode,
    ) -> impl Future<Output = Result<MarginModeSetting, BitunixError>> + Send;

    /// Set the account position mode.
    fn set_position_mode(
        &self,
        mode: PositionMode,
    ) -> impl Future<Output = Result<PositionModeSetting, BitunixError>> + Send;

    /// Current price of a symbol; `None` when the exchange reports none.
    fn get_market_price(
        &self,
        symbol: &str,
    ) -> impl Future<Output = Result<Option<Decimal>, BitunixError>> + Send;

    /// Place an order.
    fn place_order(
        &self,
        request: &PlaceOrderRequest,
    ) -> impl Future<Output = Result<PlaceOrderResponse, BitunixError>> + Send;

    /// Attach a take-profit and/or stop-loss order to a position.
    fn place_tpsl(
        &self,
        request: &TpSlOrderRequest,
    ) -> impl Future<Output = Result<TpSlOrderResponse, BitunixError>> + Send;
}
