//! Caller input for opening a position.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::error::ValidationError;
use crate::types::{MarginMode, OrderType, PositionMode, Side};

/// One take-profit exit: close `percent` of the position at `price`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TakeProfitLeg {
    /// Trigger price
    pub price: Decimal,
    /// Share of the position to close, in (0, 100]
    pub percent: Decimal,
}

impl TakeProfitLeg {
    pub fn new(price: Decimal, percent: Decimal) -> Self {
        Self { price, percent }
    }
}

/// Everything needed to open a position with its exits.
///
/// Symbols are base assets (`BTC`); the client appends the quote asset.
/// A payload is only read during a run, never changed.
///
/// Enumerated fields accept the wire spellings when deserialized, e.g.
///
/// ```json
/// {
///   "symbol": "BTC", "leverage": 10, "marginType": "CROSS",
///   "positionMode": "ONE_WAY", "margin": "100", "side": "BUY",
///   "type": "MARKET", "takeProfit": [{"price": "55000", "percent": "100"}],
///   "stopLoss": "45000"
/// }
/// ```
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub symbol: String,
    pub leverage: u32,
    #[serde_as(as = "DisplayFromStr")]
    pub margin_type: MarginMode,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    pub position_mode: PositionMode,
    /// Margin committed to the position, in quote asset units
    pub margin: Decimal,
    #[serde_as(as = "DisplayFromStr")]
    pub side: Side,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Limit price, required for `LIMIT` orders
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(alias = "takeProfits")]
    pub take_profit: Vec<TakeProfitLeg>,
    /// Stop-loss trigger price
    pub stop_loss: Decimal,
}

impl OrderPayload {
    /// Start a payload with leverage 1, cross margin, one-way mode and no exits.
    pub fn new(symbol: impl Into<String>, side: Side, order_type: OrderType, margin: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            leverage: 1,
            margin_type: MarginMode::Cross,
            position_mode: PositionMode::OneWay,
            margin,
            side,
            order_type,
            price: None,
            take_profit: Vec::new(),
            stop_loss: Decimal::ZERO,
        }
    }

    /// Parse a payload from JSON.
    ///
    /// Malformed JSON and unknown enum spellings both fail with a
    /// [`ValidationError`]; field ranges are checked later by
    /// [`validate_payload`](crate::validate::validate_payload).
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json).map_err(|e| {
            ValidationError::new(
                "payload",
                format!("line {} column {}", e.line(), e.column()),
                e.to_string(),
            )
        })
    }

    pub fn leverage(mut self, leverage: u32) -> Self {
        self.leverage = leverage;
        self
    }

    pub fn margin_type(mut self, margin_type: MarginMode) -> Self {
        self.margin_type = margin_type;
        self
    }

    pub fn position_mode(mut self, position_mode: PositionMode) -> Self {
        self.position_mode = position_mode;
        self
    }

    /// Set the limit price.
    pub fn price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    /// Append a take-profit leg.
    pub fn take_profit(mut self, leg: TakeProfitLeg) -> Self {
        self.take_profit.push(leg);
        self
    }

    pub fn stop_loss(mut self, price: Decimal) -> Self {
        self.stop_loss = price;
        self
    }

    /// Sum of all take-profit percents.
    ///
    /// Not required to be 100; legs above 100 in total may be rejected by
    /// the exchange.
    pub fn take_profit_percent_total(&self) -> Decimal {
        self.take_profit.iter().map(|leg| leg.percent).sum()
    }
}
