//! Outcome of an order workflow run.

use rust_decimal::Decimal;

use crate::error::BitunixError;

/// Which exit order a [`LegOutcome`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegKind {
    TakeProfit {
        /// Position of the leg in the payload
        index: usize,
        price: Decimal,
        percent: Decimal,
    },
    StopLoss { price: Decimal },
}

/// Result of attaching one exit order.
#[derive(Debug)]
pub struct LegOutcome {
    pub leg: LegKind,
    /// Quantity sent with the leg
    pub quantity: Decimal,
    pub succeeded: bool,
    /// Exchange order ID of an attached leg
    pub order_id: Option<String>,
    /// Why the leg failed
    pub error: Option<BitunixError>,
}

impl LegOutcome {
    pub(crate) fn from_result(
        leg: LegKind,
        quantity: Decimal,
        result: Result<Option<String>, BitunixError>,
    ) -> Self {
        match result {
            Ok(order_id) => Self {
                leg,
                quantity,
                succeeded: true,
                order_id,
                error: None,
            },
            Err(error) => Self {
                leg,
                quantity,
                succeeded: false,
                order_id: None,
                error: Some(error),
            },
        }
    }
}

/// Summary of a completed run.
///
/// A run completes once the order is placed and its position found, even if
/// some exit legs failed; check [`all_legs_attached`](Self::all_legs_attached).
#[derive(Debug)]
pub struct OpenOrderReport {
    /// Exchange symbol, e.g. `BTCUSDT`
    pub symbol: String,
    /// Price used to size the order
    pub market_price: Decimal,
    /// Order quantity, margin divided by market price
    pub quantity: Decimal,
    pub order_id: Option<String>,
    /// Client order ID sent with the order
    pub client_id: String,
    pub position_id: String,
    /// Sum of take-profit percents
    pub take_profit_percent_total: Decimal,
    /// Take-profit legs in payload order, then the stop loss
    pub legs: Vec<LegOutcome>,
}

impl OpenOrderReport {
    pub fn all_legs_attached(&self) -> bool {
        self.legs.iter().all(|leg| leg.succeeded)
    }

    pub fn failed_legs(&self) -> impl Iterator<Item = &LegOutcome> {
        self.legs.iter().filter(|leg| !leg.succeeded)
    }

    /// Outcome of the stop-loss leg.
    pub fn stop_loss(&self) -> Option<&LegOutcome> {
        self.legs
            .iter()
            .find(|leg| matches!(leg.leg, LegKind::StopLoss { .. }))
    }
}
