//! Common domain types for the Bitunix futures API.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Buy or sell side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl Side {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }

    /// Whether a position reported with `position_side` was opened by this side.
    ///
    /// Positions are reported either as `BUY`/`SELL` or `LONG`/`SHORT`.
    pub fn opens(&self, position_side: &str) -> bool {
        let side = position_side.to_ascii_uppercase();
        match self {
            Side::Buy => side == "BUY" || side == "LONG",
            Side::Sell => side == "SELL" || side == "SHORT",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            other => Err(ValidationError::new(
                "side",
                other,
                "valid sides are: BUY, SELL",
            )),
        }
    }
}

/// Order type for trading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    /// Limit order - execute at specified price or better
    Limit,
    /// Market order - execute immediately at best available price
    Market,
}

impl OrderType {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Limit => "LIMIT",
            OrderType::Market => "MARKET",
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LIMIT" => Ok(OrderType::Limit),
            "MARKET" => Ok(OrderType::Market),
            other => Err(ValidationError::new(
                "type",
                other,
                "valid order types are: LIMIT, MARKET",
            )),
        }
    }
}

/// Margin mode of a symbol.
///
/// Bitunix spells isolated margin `ISOLATION` on the wire; `ISOLATED` is
/// accepted as input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarginMode {
    /// Collateral shared across positions
    #[serde(rename = "CROSS")]
    Cross,
    /// Collateral ring-fenced per position
    #[serde(rename = "ISOLATION", alias = "ISOLATED")]
    Isolated,
}

impl MarginMode {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MarginMode::Cross => "CROSS",
            MarginMode::Isolated => "ISOLATION",
        }
    }
}

impl std::fmt::Display for MarginMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarginMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CROSS" => Ok(MarginMode::Cross),
            "ISOLATED" | "ISOLATION" => Ok(MarginMode::Isolated),
            other => Err(ValidationError::new(
                "marginType",
                other,
                "valid modes are: CROSS, ISOLATED",
            )),
        }
    }
}

/// Whether an account nets exposure per symbol or tracks long and short apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionMode {
    /// One net position per symbol
    #[default]
    OneWay,
    /// Independent long and short positions
    Hedge,
}

impl PositionMode {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionMode::OneWay => "ONE_WAY",
            PositionMode::Hedge => "HEDGE",
        }
    }
}

impl std::fmt::Display for PositionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PositionMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ONE_WAY" => Ok(PositionMode::OneWay),
            "HEDGE" => Ok(PositionMode::Hedge),
            other => Err(ValidationError::new(
                "positionMode",
                other,
                "valid modes are: ONE_WAY, HEDGE",
            )),
        }
    }
}

/// Time in force for orders (`effect` on the wire).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeInForce {
    /// Good till canceled (default)
    #[default]
    #[serde(rename = "GTC")]
    Gtc,
    /// Immediate or cancel
    #[serde(rename = "IOC")]
    Ioc,
    /// Fill or kill
    #[serde(rename = "FOK")]
    Fok,
    /// Maker only
    PostOnly,
}

/// Whether an order opens or closes exposure; only meaningful in hedge mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    /// Open or increase a position
    Open,
    /// Reduce or close a position
    Close,
}

/// Price source that triggers a take-profit or stop-loss order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopType {
    /// Mark price
    MarkPrice,
    /// Last traded price
    LastPrice,
}
