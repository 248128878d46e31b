//! Request and response types for the futures REST API.
//!
//! Numeric request fields are sent as strings, the way Bitunix expects them,
//! so the signed body is exactly what a caller sees in `Debug` output.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::types::serde_helpers::{millis_timestamp, number_or_string};
use crate::types::{MarginMode, OrderType, PositionMode, Side, StopType, TimeInForce, TradeSide};


// Account


/// Futures account balances for one margin coin.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccountInfo {
    /// Margin coin (e.g. "USDT")
    pub margin_coin: String,
    /// Available balance
    pub available: Option<Decimal>,
    /// Balance locked by open orders
    pub frozen: Option<Decimal>,
    /// Balance committed as position margin
    pub margin: Option<Decimal>,
    /// Balance that can be transferred out
    pub transfer: Option<Decimal>,
    /// Account position mode
    pub position_mode: Option<PositionMode>,
    /// Unrealized PnL of cross positions
    #[serde(rename = "crossUnrealizedPNL")]
    pub cross_unrealized_pnl: Option<Decimal>,
    /// Unrealized PnL of isolated positions
    #[serde(rename = "isolationUnrealizedPNL")]
    pub isolation_unrealized_pnl: Option<Decimal>,
    /// Trading bonus
    pub bonus: Option<Decimal>,
}

/// Request to change leverage of a symbol.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeLeverageRequest {
    /// Exchange symbol (e.g. "BTCUSDT")
    pub symbol: String,
    /// New leverage
    pub leverage: u32,
    /// Margin coin
    pub margin_coin: String,
}

/// Leverage of a symbol as confirmed by the exchange.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LeverageSetting {
    /// Exchange symbol
    pub symbol: String,
    /// Leverage, reported as a number or a string
    #[serde(deserialize_with = "number_or_string::deserialize")]
    pub leverage: Option<u32>,
    /// Margin coin
    pub margin_coin: String,
}

/// Request to change margin mode of a symbol.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeMarginModeRequest {
    /// Exchange symbol
    pub symbol: String,
    /// New margin mode
    pub margin_mode: MarginMode,
    /// Margin coin
    pub margin_coin: String,
}

/// Margin mode of a symbol as confirmed by the exchange.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarginModeSetting {
    /// Exchange symbol
    pub symbol: String,
    /// Margin mode
    pub margin_mode: Option<MarginMode>,
    /// Margin coin
    pub margin_coin: String,
}

/// Request to change the account position mode.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePositionModeRequest {
    /// New position mode
    pub position_mode: PositionMode,
}

/// Position mode as confirmed by the exchange.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PositionModeSetting {
    /// Position mode
    pub position_mode: Option<PositionMode>,
}


// Positions


/// An open position.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Position {
    /// Server-assigned position ID
    pub position_id: String,
    /// Exchange symbol (e.g. "BTCUSDT")
    pub symbol: String,
    /// Position size in base asset
    pub qty: Option<Decimal>,
    /// Position value at entry
    pub entry_value: Option<Decimal>,
    /// Side reported by the exchange (`BUY`/`SELL` or `LONG`/`SHORT`)
    pub side: Option<String>,
    /// Margin mode
    pub margin_mode: Option<MarginMode>,
    /// Position mode
    pub position_mode: Option<PositionMode>,
    /// Leverage, reported as a number or a string
    #[serde(deserialize_with = "number_or_string::deserialize")]
    pub leverage: Option<u32>,
    /// Fees paid
    pub fee: Option<Decimal>,
    /// Funding paid
    pub funding: Option<Decimal>,
    /// Realized PnL
    #[serde(rename = "realizedPNL")]
    pub realized_pnl: Option<Decimal>,
    /// Position margin
    pub margin: Option<Decimal>,
    /// Unrealized PnL
    #[serde(rename = "unrealizedPNL")]
    pub unrealized_pnl: Option<Decimal>,
    /// Estimated liquidation price
    pub liq_price: Option<Decimal>,
    /// Average open price
    pub avg_open_price: Option<Decimal>,
    /// Creation time
    #[serde(deserialize_with = "millis_timestamp::deserialize")]
    pub ctime: Option<OffsetDateTime>,
    /// Last modification time
    #[serde(deserialize_with = "millis_timestamp::deserialize")]
    pub mtime: Option<OffsetDateTime>,
}

/// A closed position.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HistoryPosition {
    /// Server-assigned position ID
    pub position_id: String,
    /// Exchange symbol
    pub symbol: String,
    /// Side reported by the exchange
    pub side: Option<String>,
    /// Largest size held
    pub max_qty: Option<Decimal>,
    /// Average entry price
    pub entry_price: Option<Decimal>,
    /// Average close price
    pub close_price: Option<Decimal>,
    /// Quantity liquidated
    pub liq_qty: Option<Decimal>,
    /// Realized PnL
    #[serde(rename = "realizedPNL")]
    pub realized_pnl: Option<Decimal>,
    /// Margin mode
    pub margin_mode: Option<MarginMode>,
    /// Leverage
    #[serde(deserialize_with = "number_or_string::deserialize")]
    pub leverage: Option<u32>,
    /// Creation time
    #[serde(deserialize_with = "millis_timestamp::deserialize")]
    pub ctime: Option<OffsetDateTime>,
    /// Close time
    #[serde(deserialize_with = "millis_timestamp::deserialize")]
    pub mtime: Option<OffsetDateTime>,
}

/// Page of closed positions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PositionHistory {
    /// Closed positions, most recent first
    pub position_list: Vec<HistoryPosition>,
    /// Total number of closed positions matching the query
    #[serde(deserialize_with = "number_or_string::deserialize")]
    pub total: Option<u64>,
}


// Market data


/// Ticker of a futures symbol.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Ticker {
    /// Exchange symbol
    pub symbol: String,
    /// Mark price
    pub mark_price: Option<Decimal>,
    /// Last traded price
    pub last_price: Option<Decimal>,
    /// 24h open
    pub open: Option<Decimal>,
    /// 24h high
    pub high: Option<Decimal>,
    /// 24h low
    pub low: Option<Decimal>,
    /// 24h volume in quote asset
    pub quote_vol: Option<Decimal>,
    /// 24h volume in base asset
    pub base_vol: Option<Decimal>,
}

impl Ticker {
    /// Last traded price, or the mark price when no trade is reported.
    ///
    /// Zero prices are treated as missing.
    pub fn price(&self) -> Option<Decimal> {
        self.last_price
            .filter(|p| *p > Decimal::ZERO)
            .or(self.mark_price.filter(|p| *p > Decimal::ZERO))
    }
}


// Trading


/// Request to place an order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    /// Exchange symbol
    pub symbol: String,
    /// Order side
    pub side: Side,
    /// Quantity in base asset
    pub qty: String,
    /// Limit price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    /// Order type
    pub order_type: OrderType,
    /// Time in force
    pub effect: TimeInForce,
    /// Open or close, hedge mode only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_side: Option<TradeSide>,
    /// Reduce-only order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduce_only: Option<bool>,
    /// Client order ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

impl PlaceOrderRequest {
    /// Create a new market order request.
    pub fn market(symbol: impl Into<String>, side: Side, qty: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            qty: qty.to_string(),
            price: None,
            order_type: OrderType::Market,
            effect: TimeInForce::Gtc,
            trade_side: None,
            reduce_only: None,
            client_id: None,
        }
    }

    /// Create a new limit order request.
    pub fn limit(symbol: impl Into<String>, side: Side, qty: Decimal, price: Decimal) -> Self {
        Self {
            price: Some(price.to_string()),
            order_type: OrderType::Limit,
            ..Self::market(symbol, side, qty)
        }
    }

    /// Set the time in force.
    pub fn effect(mut self, effect: TimeInForce) -> Self {
        self.effect = effect;
        self
    }

    /// Set open/close, for hedge mode accounts.
    pub fn trade_side(mut self, trade_side: TradeSide) -> Self {
        self.trade_side = Some(trade_side);
        self
    }

    /// Set the reduce-only flag.
    pub fn reduce_only(mut self, reduce_only: bool) -> Self {
        self.reduce_only = Some(reduce_only);
        self
    }

    /// Set the client order ID.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }
}

/// Acknowledgement of a placed order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    /// Exchange order ID
    pub order_id: Option<String>,
    /// Client order ID echoed back
    pub client_id: Option<String>,
}

/// Request to attach a take-profit and/or stop-loss order to a position.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TpSlOrderRequest {
    /// Exchange symbol
    pub symbol: String,
    /// Position the order protects
    pub position_id: String,
    /// Take-profit trigger price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp_price: Option<String>,
    /// Take-profit trigger source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp_stop_type: Option<StopType>,
    /// Take-profit order type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp_order_type: Option<OrderType>,
    /// Take-profit quantity in base asset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp_qty: Option<String>,
    /// Stop-loss trigger price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sl_price: Option<String>,
    /// Stop-loss trigger source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sl_stop_type: Option<StopType>,
    /// Stop-loss order type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sl_order_type: Option<OrderType>,
    /// Stop-loss quantity in base asset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sl_qty: Option<String>,
}

impl TpSlOrderRequest {
    fn empty(symbol: String, position_id: String) -> Self {
        Self {
            symbol,
            position_id,
            tp_price: None,
            tp_stop_type: None,
            tp_order_type: None,
            tp_qty: None,
            sl_price: None,
            sl_stop_type: None,
            sl_order_type: None,
            sl_qty: None,
        }
    }

    /// Create a take-profit order for `qty` triggered at `price`.
    pub fn take_profit(
        symbol: impl Into<String>,
        position_id: impl Into<String>,
        price: Decimal,
        qty: Decimal,
    ) -> Self {
        Self {
            tp_price: Some(price.to_string()),
            tp_qty: Some(qty.to_string()),
            ..Self::empty(symbol.into(), position_id.into())
        }
    }

    /// Create a stop-loss order for `qty` triggered at `price`.
    pub fn stop_loss(
        symbol: impl Into<String>,
        position_id: impl Into<String>,
        price: Decimal,
        qty: Decimal,
    ) -> Self {
        Self {
            sl_price: Some(price.to_string()),
            sl_qty: Some(qty.to_string()),
            ..Self::empty(symbol.into(), position_id.into())
        }
    }

    /// Set the trigger source of whichever legs are present.
    pub fn stop_type(mut self, stop_type: StopType) -> Self {
        if self.tp_price.is_some() {
            self.tp_stop_type = Some(stop_type);
        }
        if self.sl_price.is_some() {
            self.sl_stop_type = Some(stop_type);
        }
        self
    }
}

/// Acknowledgement of a take-profit/stop-loss order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TpSlOrderResponse {
    /// Exchange order ID
    pub order_id: Option<String>,
}
