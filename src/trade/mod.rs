//! Order orchestration: open a position and attach its exit legs.
//!
//! [`OpenOrderFlow`] drives one run over any [`FuturesApi`](crate::rest::FuturesApi)
//! implementation. Most callers go through
//! [`BitunixClient::open_order`](crate::rest::BitunixClient::open_order),
//! which also serializes runs per symbol.

mod flow;
mod locks;
mod payload;
mod report;
mod stage;

pub use flow::OpenOrderFlow;
pub(crate) use locks::SymbolLocks;
pub use payload::{OrderPayload, TakeProfitLeg};
pub use report::{LegKind, LegOutcome, OpenOrderReport};
pub use stage::OrderStage;
