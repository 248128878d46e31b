//! Parameter checks run before any request is sent.
//!
//! Each function checks one logical field. Enumerated fields (side, order
//! type, margin mode, position mode) are checked when parsed from text through
//! their `FromStr` implementations, which fail with the same [`ValidationError`].

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::trade::{OrderPayload, TakeProfitLeg};
use crate::types::OrderType;

const MAX_LEVERAGE: u32 = 100;

/// Both the API key and secret must be non-empty.
pub fn validate_credentials(api_key: &str, api_secret: &str) -> Result<(), ValidationError> {
    if api_key.is_empty() {
        return Err(ValidationError::new("apiKey", "", "API key is required"));
    }
    if api_secret.is_empty() {
        return Err(ValidationError::new(
            "apiSecret",
            "[REDACTED]",
            "API secret is required",
        ));
    }
    Ok(())
}

fn is_ticker(value: &str) -> bool {
    (2..=10).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_uppercase())
}

/// Base asset ticker: 2 to 10 uppercase ASCII letters, e.g. `BTC`.
pub fn validate_symbol(symbol: &str) -> Result<(), ValidationError> {
    if is_ticker(symbol) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "symbol",
            symbol,
            "symbol must be 2-10 uppercase letters (e.g. BTC, ETH)",
        ))
    }
}

/// Quote asset ticker, same shape as a symbol.
pub fn validate_quote_asset(quote: &str) -> Result<(), ValidationError> {
    if is_ticker(quote) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "quoteAsset",
            quote,
            "quote asset must be 2-10 uppercase letters (e.g. USDT)",
        ))
    }
}

/// Leverage must be in (0, 100].
pub fn validate_leverage(leverage: u32) -> Result<(), ValidationError> {
    if leverage == 0 || leverage > MAX_LEVERAGE {
        return Err(ValidationError::new(
            "leverage",
            leverage,
            "leverage must be between 1 and 100",
        ));
    }
    Ok(())
}

/// Margin must be strictly positive.
pub fn validate_margin(margin: Decimal) -> Result<(), ValidationError> {
    if margin <= Decimal::ZERO {
        return Err(ValidationError::new(
            "margin",
            margin,
            "margin must be a positive number",
        ));
    }
    Ok(())
}

/// Take-profit legs: at least one, each with a positive price and a percent
/// in (0, 100].
///
/// Legs are checked independently; their percents are not required to sum to
/// 100.
pub fn validate_take_profits(legs: &[TakeProfitLeg]) -> Result<(), ValidationError> {
    if legs.is_empty() {
        return Err(ValidationError::new(
            "takeProfit",
            "[]",
            "take profits must be a non-empty list",
        ));
    }

    for (index, leg) in legs.iter().enumerate() {
        if leg.price <= Decimal::ZERO {
            return Err(ValidationError::new(
                "takeProfit.price",
                leg.price,
                format!("invalid price in take profit at index {index}"),
            ));
        }
        if leg.percent <= Decimal::ZERO || leg.percent > Decimal::ONE_HUNDRED {
            return Err(ValidationError::new(
                "takeProfit.percent",
                leg.percent,
                format!("invalid percentage in take profit at index {index}"),
            ));
        }
    }
    Ok(())
}

/// Stop-loss trigger price must be strictly positive.
pub fn validate_stop_loss(price: Decimal) -> Result<(), ValidationError> {
    if price <= Decimal::ZERO {
        return Err(ValidationError::new(
            "stopLoss",
            price,
            "stop loss must be a positive price",
        ));
    }
    Ok(())
}

/// Limit price: required for `LIMIT` orders, positive when given.
pub fn validate_limit_price(
    order_type: OrderType,
    price: Option<Decimal>,
) -> Result<(), ValidationError> {
    match (order_type, price) {
        (_, Some(price)) if price <= Decimal::ZERO => Err(ValidationError::new(
            "price",
            price,
            "limit price must be positive",
        )),
        (OrderType::Limit, None) => Err(ValidationError::new(
            "price",
            "null",
            "LIMIT orders require a price",
        )),
        _ => Ok(()),
    }
}

/// Run every field check on a payload, stopping at the first failure.
pub fn validate_payload(payload: &OrderPayload) -> Result<(), ValidationError> {
    validate_symbol(&payload.symbol)?;
    validate_leverage(payload.leverage)?;
    validate_margin(payload.margin)?;
    validate_take_profits(&payload.take_profit)?;
    validate_stop_loss(payload.stop_loss)?;
    validate_limit_price(payload.order_type, payload.price)?;
    Ok(())
}
