//! Bitunix futures REST API endpoint constants.

/// Base URL for the Bitunix futures API.
pub const BITUNIX_BASE_URL: &str = "https://fapi.bitunix.com";

/// Quote asset appended to base symbols by default.
pub const DEFAULT_QUOTE_ASSET: &str = "USDT";

/// Value of the `language` header sent with every request.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Public endpoints (no authentication required).
pub mod public {
    /// Get tickers for one or more symbols.
    pub const TICKERS: &str = "/api/v1/futures/market/tickers";
}

/// Private endpoints (authentication required).
pub mod private {
    /// Get account balances for a margin coin.
    pub const ACCOUNT: &str = "/api/v1/futures/account";

    /// Change leverage of a symbol.
    pub const CHANGE_LEVERAGE: &str = "/api/v1/futures/account/change_leverage";

    /// Change margin mode of a symbol.
    pub const CHANGE_MARGIN_MODE: &str = "/api/v1/futures/account/change_margin_mode";

    /// Change the account position mode.
    pub const CHANGE_POSITION_MODE: &str = "/api/v1/futures/account/change_position_mode";

    /// Get open positions.
    pub const PENDING_POSITIONS: &str = "/api/v1/futures/position/get_pending_positions";

    /// Get closed positions.
    pub const HISTORY_POSITIONS: &str = "/api/v1/futures/position/get_history_positions";

    /// Place an order.
    pub const PLACE_ORDER: &str = "/api/v1/futures/trade/place_order";

    /// Attach a take-profit and/or stop-loss order to a position.
    pub const TPSL_PLACE_ORDER: &str = "/api/v1/futures/tpsl/place_order";
}
