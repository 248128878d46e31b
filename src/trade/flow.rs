//! The open-order workflow.

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::auth::{NonceProvider, RandomNonce};
use crate::config::SettlementPolicy;
use crate::error::{AbortReason, BitunixError, WorkflowAbort};
use crate::rest::{FuturesApi, PlaceOrderRequest, Position, TpSlOrderRequest};
use crate::trade::{LegKind, LegOutcome, OpenOrderReport, OrderPayload, OrderStage};
use crate::types::{OrderType, PositionMode, TimeInForce, TradeSide};
use crate::validate;

/// Decimal places of exit leg quantities.
const LEG_QTY_SCALE: u32 = 6;

/// One run of the open-order workflow against a [`FuturesApi`].
///
/// The run sets leverage and margin mode, sizes the order from the market
/// price, places it, polls for the resulting position and attaches every
/// take-profit leg followed by the stop loss. Steps before the exit legs
/// abort the run on failure; earlier steps are not undone. Exit leg
/// failures are recorded in the report instead.
///
/// Nothing here prevents two runs for the same symbol from interleaving;
/// [`BitunixClient::open_order`](crate::rest::BitunixClient::open_order)
/// takes care of that.
pub struct OpenOrderFlow<'a, C> {
    client: &'a C,
    settlement: SettlementPolicy,
    stage: OrderStage,
}

impl<'a, C: FuturesApi> OpenOrderFlow<'a, C> {
    pub fn new(client: &'a C, settlement: SettlementPolicy) -> Self {
        Self {
            client,
            settlement,
            stage: OrderStage::Validating,
        }
    }

    /// Current step; after `run` returns, either `Done` or `Aborted`.
    pub fn stage(&self) -> OrderStage {
        self.stage
    }

    fn enter(&mut self, stage: OrderStage) {
        debug!(%stage, "order workflow step");
        self.stage = stage;
    }

    fn fail(&mut self, source: BitunixError) -> BitunixError {
        let stage = self.stage;
        warn!(%stage, error = %source, "order workflow aborted");
        self.stage = OrderStage::Aborted;
        WorkflowAbort::step_failed(stage, source)
    }

    fn abort(&mut self, reason: AbortReason) -> BitunixError {
        let stage = self.stage;
        warn!(%stage, %reason, "order workflow aborted");
        self.stage = OrderStage::Aborted;
        WorkflowAbort::new(stage, reason)
    }

    /// Run the workflow for `payload`.
    ///
    /// Validation failures are returned as they are, before any request.
    /// Failures of later steps are wrapped in a
    /// [`WorkflowAbort`](crate::error::WorkflowAbort) naming the step.
    pub async fn run(&mut self, payload: &OrderPayload) -> Result<OpenOrderReport, BitunixError> {
        let client = self.client;

        self.enter(OrderStage::Validating);
        if let Err(e) = validate::validate_payload(payload) {
            self.stage = OrderStage::Aborted;
            return Err(e.into());
        }

        let symbol = client.exchange_symbol(&payload.symbol);
        info!(%symbol, side = %payload.side, margin = %payload.margin, "opening position");

        self.enter(OrderStage::SettingLeverage);
        client
            .set_leverage(&payload.symbol, payload.leverage)
            .await
            .map_err(|e| self.fail(e))?;

        self.enter(OrderStage::SettingMarginMode);
        client
            .set_margin_mode(&payload.symbol, payload.margin_type)
            .await
            .map_err(|e| self.fail(e))?;

        self.enter(OrderStage::FetchingPrice);
        let market_price = match client.get_market_price(&payload.symbol).await {
            Ok(Some(price)) if price > Decimal::ZERO => price,
            Ok(_) => {
                return Err(self.abort(AbortReason::NoMarketPrice {
                    symbol: symbol.clone(),
                }));
            }
            Err(e) => return Err(self.fail(e)),
        };
        let sized = payload.margin.checked_div(market_price).and_then(|quantity| {
            let quantity = quantity.normalize();
            let legs = payload
                .take_profit
                .iter()
                .map(|tp| leg_quantity(quantity, tp.percent))
                .collect::<Option<Vec<_>>>()?;
            Some((quantity, legs))
        });
        let Some((quantity, leg_quantities)) = sized else {
            return Err(self.abort(AbortReason::QuantityOutOfRange {
                margin: payload.margin,
                price: market_price,
            }));
        };
        debug!(%symbol, %market_price, %quantity, "sized order");

        self.enter(OrderStage::PlacingOrder);
        let client_id = RandomNonce::new().next_nonce();
        let request = order_request(&symbol, payload, quantity).client_id(client_id.clone());
        let placed = client.place_order(&request).await.map_err(|e| self.fail(e))?;
        info!(%symbol, order_id = ?placed.order_id, %client_id, "order placed");

        self.enter(OrderStage::AwaitingPositionId);
        let position_id = self.await_position_id(&symbol, payload).await?;
        info!(%symbol, %position_id, "position open");

        let mut legs = Vec::with_capacity(payload.take_profit.len() + 1);

        self.enter(OrderStage::AttachingTakeProfits);
        let take_profits = payload.take_profit.iter().zip(leg_quantities);
        for (index, (tp, leg_qty)) in take_profits.enumerate() {
            let request = TpSlOrderRequest::take_profit(&symbol, &position_id, tp.price, leg_qty);
            let result = client.place_tpsl(&request).await.map(|ack| ack.order_id);
            if let Err(e) = &result {
                warn!(%symbol, leg = index, error = %e, "take profit not attached");
            }
            legs.push(LegOutcome::from_result(
                LegKind::TakeProfit {
                    index,
                    price: tp.price,
                    percent: tp.percent,
                },
                leg_qty,
                result,
            ));
        }

        self.enter(OrderStage::AttachingStopLoss);
        let request = TpSlOrderRequest::stop_loss(&symbol, &position_id, payload.stop_loss, quantity);
        let result = client.place_tpsl(&request).await.map(|ack| ack.order_id);
        if let Err(e) = &result {
            warn!(%symbol, error = %e, "stop loss not attached");
        }
        legs.push(LegOutcome::from_result(
            LegKind::StopLoss {
                price: payload.stop_loss,
            },
            quantity,
            result,
        ));

        self.enter(OrderStage::Done);
        let report = OpenOrderReport {
            symbol,
            market_price,
            quantity,
            order_id: placed.order_id,
            client_id,
            position_id,
            take_profit_percent_total: payload.take_profit_percent_total(),
            legs,
        };
        info!(
            symbol = %report.symbol,
            failed_legs = report.failed_legs().count(),
            "order workflow done"
        );
        Ok(report)
    }

    async fn await_position_id(
        &mut self,
        symbol: &str,
        payload: &OrderPayload,
    ) -> Result<String, BitunixError> {
        let client = self.client;
        let attempts = self.settlement.max_attempts.max(1);

        for attempt in 1..=attempts {
            let delay = if attempt == 1 {
                self.settlement.initial_delay
            } else {
                self.settlement.poll_interval
            };
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let positions = client
                .get_positions(Some(&payload.symbol))
                .await
                .map_err(|e| self.fail(e))?;
            if let Some(position) = positions.iter().find(|p| opened_by(p, symbol, payload)) {
                return Ok(position.position_id.clone());
            }
            debug!(%symbol, attempt, "position not visible yet");
        }

        Err(self.abort(AbortReason::PositionNotFound {
            symbol: symbol.to_string(),
            attempts,
        }))
    }
}

fn order_request(symbol: &str, payload: &OrderPayload, quantity: Decimal) -> PlaceOrderRequest {
    let request = match (payload.order_type, payload.price) {
        (OrderType::Limit, Some(price)) => {
            PlaceOrderRequest::limit(symbol, payload.side, quantity, price)
        }
        _ => PlaceOrderRequest::market(symbol, payload.side, quantity),
    }
    .effect(TimeInForce::Gtc);

    match payload.position_mode {
        PositionMode::Hedge => request.trade_side(TradeSide::Open),
        PositionMode::OneWay => request,
    }
}

/// Whether `position` is the one a run for `payload` just opened.
///
/// In hedge mode a symbol can hold a long and a short position at once, so
/// the side has to match too.
fn opened_by(position: &Position, symbol: &str, payload: &OrderPayload) -> bool {
    if position.symbol != symbol || position.position_id.is_empty() {
        return false;
    }
    match payload.position_mode {
        PositionMode::OneWay => true,
        PositionMode::Hedge => position
            .side
            .as_deref()
            .is_some_and(|side| payload.side.opens(side)),
    }
}

/// `percent` of `quantity`, rounded and rendered with six decimals.
///
/// `None` when the product doesn't fit a `Decimal`.
fn leg_quantity(quantity: Decimal, percent: Decimal) -> Option<Decimal> {
    let share = percent.checked_div(Decimal::ONE_HUNDRED)?;
    let mut qty = quantity.checked_mul(share)?.round_dp(LEG_QTY_SCALE);
    qty.rescale(LEG_QTY_SCALE);
    Some(qty)
}
