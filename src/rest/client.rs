//! Bitunix futures REST API client implementation.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use rust_decimal::Decimal;
use url::Url;

use crate::auth::{
    CredentialsProvider, NonceProvider, QueryParams, RandomNonce, SystemClock, TimestampProvider,
    sign_request,
};
use crate::config::{ClientConfig, Endpoints, SettlementPolicy};
use crate::error::{ApiError, BitunixError, ValidationError};
use crate::rest::traits::FuturesApi;
use crate::rest::types::*;
use crate::trade::{OpenOrderFlow, OpenOrderReport, OrderPayload, SymbolLocks};
use crate::types::envelope::EnvelopeStatus;
use crate::types::{ApiEnvelope, MarginMode, PositionMode};
use crate::validate;

/// The Bitunix futures REST API client.
///
/// Every private call is signed with a fresh nonce and timestamp. The client
/// is cheap to clone and safe to share between tasks; clones share the
/// per-symbol locks that serialize [`open_order`](Self::open_order) runs.
///
/// # Example
///
/// ```rust,no_run
/// use bitunix_api_client::rest::BitunixClient;
/// use bitunix_api_client::auth::StaticCredentials;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let credentials = Arc::new(StaticCredentials::new("api_key", "api_secret"));
///     let client = BitunixClient::builder()
///         .credentials(credentials)
///         .build()?;
///
///     let account = client.get_account().await?;
///     println!("Available: {:?}", account.available);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct BitunixClient {
    http_client: ClientWithMiddleware,
    base_url: String,
    endpoints: Arc<Endpoints>,
    quote_asset: String,
    settlement: SettlementPolicy,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    nonce_provider: Arc<dyn NonceProvider>,
    timestamp_provider: Arc<dyn TimestampProvider>,
    symbol_locks: Arc<SymbolLocks>,
}

impl BitunixClient {
    /// Create a new client builder.
    pub fn builder() -> BitunixClientBuilder {
        BitunixClientBuilder::new()
    }

    /// The settlement policy used by [`open_order`](Self::open_order).
    pub fn settlement(&self) -> SettlementPolicy {
        self.settlement
    }

    fn build_url(&self, endpoint: &str, query: &QueryParams) -> Result<Url, BitunixError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, endpoint))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        Ok(url)
    }

    // HTTP request methods.

    /// Make a public GET request.
    pub(crate) async fn public_get<T>(
        &self,
        endpoint: &str,
        query: &QueryParams,
    ) -> Result<ApiEnvelope<T>, BitunixError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = self.build_url(endpoint, query)?;
        let response = self.http_client.get(url).send().await?;
        self.parse_response(response).await
    }

    /// Make an authenticated GET request.
    pub(crate) async fn signed_get<T>(
        &self,
        endpoint: &str,
        query: &QueryParams,
    ) -> Result<ApiEnvelope<T>, BitunixError>
    where
        T: serde::de::DeserializeOwned,
    {
        self.send_signed(Method::GET, endpoint, query, None).await
    }

    /// Make an authenticated POST request with a JSON body.
    pub(crate) async fn signed_post<T, B>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<ApiEnvelope<T>, BitunixError>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize,
    {
        // Compact JSON; these exact bytes are both signed and sent.
        let body = serde_json::to_string(body)?;
        self.send_signed(Method::POST, endpoint, &QueryParams::new(), Some(body))
            .await
    }

    async fn send_signed<T>(
        &self,
        method: Method,
        endpoint: &str,
        query: &QueryParams,
        body: Option<String>,
    ) -> Result<ApiEnvelope<T>, BitunixError>
    where
        T: serde::de::DeserializeOwned,
    {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(BitunixError::MissingCredentials)?;
        let creds = credentials.get_credentials();

        let nonce = self.nonce_provider.next_nonce();
        let timestamp = self.timestamp_provider.timestamp_millis().to_string();
        let signature = sign_request(
            creds,
            &nonce,
            &timestamp,
            query,
            body.as_deref().unwrap_or(""),
        );

        tracing::debug!(%method, endpoint, "sending signed request");

        let url = self.build_url(endpoint, query)?;
        let mut request = self
            .http_client
            .request(method, url)
            .header("sign", signature)
            .header("timestamp", timestamp)
            .header("nonce", nonce);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        self.parse_response(response).await
    }

    /// Parse a response from the Bitunix API.
    ///
    /// Non-2xx statuses and undecodable bodies are transport failures; a
    /// decodable envelope with a non-zero code is an [`ApiError`] that keeps
    /// the body verbatim.
    async fn parse_response<T>(
        &self,
        response: reqwest::Response,
    ) -> Result<ApiEnvelope<T>, BitunixError>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(BitunixError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let header: EnvelopeStatus = serde_json::from_str(&body).map_err(|e| {
            BitunixError::InvalidResponse(format!("Failed to parse response: {}. Body: {}", e, body))
        })?;

        if header.code != 0 {
            return Err(BitunixError::Api(ApiError::new(
                header.code,
                header.msg.unwrap_or_default(),
                body,
            )));
        }

        serde_json::from_str::<ApiEnvelope<T>>(&body).map_err(|e| {
            BitunixError::InvalidResponse(format!("Failed to parse response: {}. Body: {}", e, body))
        })
    }

    fn symbol_query(&self, symbol: Option<&str>) -> Result<QueryParams, BitunixError> {
        let mut query = QueryParams::new();
        if let Some(symbol) = symbol {
            validate::validate_symbol(symbol)?;
            query.insert("symbol".into(), self.exchange_symbol(symbol));
        }
        Ok(query)
    }

    // Private endpoints: account.

    /// Get account balances in the quote asset.
    pub async fn get_account(&self) -> Result<AccountInfo, BitunixError> {
        let mut query = QueryParams::new();
        query.insert("marginCoin".into(), self.quote_asset.clone());
        let envelope: ApiEnvelope<AccountInfo> =
            self.signed_get(&self.endpoints.get_account, &query).await?;
        envelope
            .data
            .ok_or_else(|| BitunixError::InvalidResponse("account response has no data".into()))
    }

    /// Set leverage of a symbol.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Base asset (e.g. "BTC")
    /// * `leverage` - New leverage, 1 to 100
    pub async fn set_leverage(
        &self,
        symbol: &str,
        leverage: u32,
    ) -> Result<LeverageSetting, BitunixError> {
        validate::validate_symbol(symbol)?;
        validate::validate_leverage(leverage)?;
        let request = ChangeLeverageRequest {
            symbol: self.exchange_symbol(symbol),
            leverage,
            margin_coin: self.quote_asset.clone(),
        };
        let envelope: ApiEnvelope<LeverageSetting> = self
            .signed_post(&self.endpoints.set_leverage, &request)
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Set margin mode of a symbol.
    pub async fn set_margin_mode(
        &self,
        symbol: &str,
        mode: MarginMode,
    ) -> Result<MarginModeSetting, BitunixError> {
        validate::validate_symbol(symbol)?;
        let request = ChangeMarginModeRequest {
            symbol: self.exchange_symbol(symbol),
            margin_mode: mode,
            margin_coin: self.quote_asset.clone(),
        };
        let envelope: ApiEnvelope<MarginModeSetting> = self
            .signed_post(&self.endpoints.set_margin_mode, &request)
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Set the account position mode.
    ///
    /// Position mode applies to the whole account, not to one symbol.
    pub async fn set_position_mode(
        &self,
        mode: PositionMode,
    ) -> Result<PositionModeSetting, BitunixError> {
        let request = ChangePositionModeRequest {
            position_mode: mode,
        };
        let envelope: ApiEnvelope<PositionModeSetting> = self
            .signed_post(&self.endpoints.set_position_mode, &request)
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }

    // Private endpoints: positions.

    /// Get open positions.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Optional base asset; only its positions are returned
    pub async fn get_positions(&self, symbol: Option<&str>) -> Result<Vec<Position>, BitunixError> {
        let query = self.symbol_query(symbol)?;
        let envelope: ApiEnvelope<Vec<Position>> =
            self.signed_get(&self.endpoints.get_positions, &query).await?;
        let mut positions = envelope.data.unwrap_or_default();
        if let Some(wanted) = query.get("symbol") {
            positions.retain(|p| &p.symbol == wanted);
        }
        Ok(positions)
    }

    /// Get the ID of the first open position of a symbol, if any.
    pub async fn find_position_id(&self, symbol: &str) -> Result<Option<String>, BitunixError> {
        let positions = self.get_positions(Some(symbol)).await?;
        Ok(positions
            .into_iter()
            .map(|p| p.position_id)
            .find(|id| !id.is_empty()))
    }

    /// Get closed positions.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Optional base asset; only its positions are returned
    pub async fn get_position_history(
        &self,
        symbol: Option<&str>,
    ) -> Result<PositionHistory, BitunixError> {
        let query = self.symbol_query(symbol)?;
        let envelope: ApiEnvelope<PositionHistory> = self
            .signed_get(&self.endpoints.get_position_history, &query)
            .await?;
        let mut history = envelope.data.unwrap_or_default();
        if let Some(wanted) = query.get("symbol") {
            history.position_list.retain(|p| &p.symbol == wanted);
        }
        Ok(history)
    }

    // Public endpoints.

    /// Get tickers for the given base assets.
    pub async fn get_tickers(&self, symbols: &[&str]) -> Result<Vec<Ticker>, BitunixError> {
        let mut query = QueryParams::new();
        if !symbols.is_empty() {
            let mut joined = Vec::with_capacity(symbols.len());
            for symbol in symbols {
                validate::validate_symbol(symbol)?;
                joined.push(self.exchange_symbol(symbol));
            }
            query.insert("symbols".into(), joined.join(","));
        }
        let envelope: ApiEnvelope<Vec<Ticker>> =
            self.public_get(&self.endpoints.tickers, &query).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Current price of a symbol.
    ///
    /// Returns `None` when the ticker is missing or reports no positive price.
    pub async fn get_market_price(&self, symbol: &str) -> Result<Option<Decimal>, BitunixError> {
        let wanted = self.exchange_symbol(symbol);
        let tickers = self.get_tickers(&[symbol]).await?;
        Ok(tickers
            .iter()
            .find(|t| t.symbol == wanted)
            .and_then(Ticker::price))
    }

    // Private endpoints: trading.

    /// Place an order.
    pub async fn place_order(
        &self,
        request: &PlaceOrderRequest,
    ) -> Result<PlaceOrderResponse, BitunixError> {
        let envelope: ApiEnvelope<PlaceOrderResponse> = self
            .signed_post(&self.endpoints.place_order, request)
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Attach a take-profit and/or stop-loss order to a position.
    ///
    /// Requests carrying a take-profit go to the take-profit endpoint, the
    /// rest to the stop-loss endpoint.
    pub async fn place_tpsl(
        &self,
        request: &TpSlOrderRequest,
    ) -> Result<TpSlOrderResponse, BitunixError> {
        let endpoint = if request.tp_price.is_some() {
            &self.endpoints.take_profit
        } else {
            &self.endpoints.stop_loss
        };
        let envelope: ApiEnvelope<TpSlOrderResponse> = self.signed_post(endpoint, request).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Open a position with attached take-profit and stop-loss orders.
    ///
    /// Validates the payload, then sets leverage and margin mode, reads the
    /// market price, places the order, waits for the position to appear and
    /// attaches every leg. Runs for the same symbol on this client (and its
    /// clones) are serialized.
    ///
    /// Leg failures don't fail the call; inspect
    /// [`OpenOrderReport::legs`] to see which legs attached.
    pub async fn open_order(&self, payload: &OrderPayload) -> Result<OpenOrderReport, BitunixError> {
        validate::validate_payload(payload)?;
        let symbol = self.exchange_symbol(&payload.symbol);
        let _guard = self.symbol_locks.acquire(&symbol).await;

        let mut flow = OpenOrderFlow::new(self, self.settlement);
        flow.run(payload).await
    }
}

impl FuturesApi for BitunixClient {
    fn quote_asset(&self) -> &str {
        &self.quote_asset
    }

    async fn get_account(&self) -> Result<AccountInfo, BitunixError> {
        BitunixClient::get_account(self).await
    }

    async fn get_positions(&self, symbol: Option<&str>) -> Result<Vec<Position>, BitunixError> {
        BitunixClient::get_positions(self, symbol).await
    }

    async fn get_position_history(
        &self,
        symbol: Option<&str>,
    ) -> Result<PositionHistory, BitunixError> {
        BitunixClient::get_position_history(self, symbol).await
    }

    async fn set_leverage(
        &self,
        symbol: &str,
        leverage: u32,
    ) -> Result<LeverageSetting, BitunixError> {
        BitunixClient::set_leverage(self, symbol, leverage).await
    }

    async fn set_margin_mode(
        &self,
        symbol: &str,
        mode: MarginMode,
    ) -> Result<MarginModeSetting, BitunixError> {
        BitunixClient::set_margin_mode(self, symbol, mode).await
    }

    async fn set_position_mode(
        &self,
        mode: PositionMode,
    ) -> Result<PositionModeSetting, BitunixError> {
        BitunixClient::set_position_mode(self, mode).await
    }

    async fn get_market_price(&self, symbol: &str) -> Result<Option<Decimal>, BitunixError> {
        BitunixClient::get_market_price(self, symbol).await
    }

    async fn place_order(
        &self,
        request: &PlaceOrderRequest,
    ) -> Result<PlaceOrderResponse, BitunixError> {
        BitunixClient::place_order(self, request).await
    }

    async fn place_tpsl(
        &self,
        request: &TpSlOrderRequest,
    ) -> Result<TpSlOrderResponse, BitunixError> {
        BitunixClient::place_tpsl(self, request).await
    }
}

impl std::fmt::Debug for BitunixClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitunixClient")
            .field("base_url", &self.base_url)
            .field("quote_asset", &self.quote_asset)
            .field("has_credentials", &self.credentials.is_some())
            .finish()
    }
}

/// Builder for [`BitunixClient`].
pub struct BitunixClientBuilder {
    config: ClientConfig,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    nonce_provider: Option<Arc<dyn NonceProvider>>,
    timestamp_provider: Option<Arc<dyn TimestampProvider>>,
}

impl BitunixClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            credentials: None,
            nonce_provider: None,
            timestamp_provider: None,
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the base URL (useful for testing with a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the endpoint path table.
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.config.endpoints = endpoints;
        self
    }

    /// Set the quote asset appended to base symbols.
    pub fn quote_asset(mut self, quote: impl Into<String>) -> Self {
        self.config.quote_asset = quote.into();
        self
    }

    /// Set the `language` header.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.config.language = language.into();
        self
    }

    /// Set how long to wait for a placed order to become a position.
    pub fn settlement(mut self, settlement: SettlementPolicy) -> Self {
        self.config.settlement = settlement;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Set the credentials provider for authenticated requests.
    pub fn credentials(mut self, credentials: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set a custom nonce provider.
    pub fn nonce_provider(mut self, provider: Arc<dyn NonceProvider>) -> Self {
        self.nonce_provider = Some(provider);
        self
    }

    /// Set a custom timestamp provider.
    pub fn timestamp_provider(mut self, provider: Arc<dyn TimestampProvider>) -> Self {
        self.timestamp_provider = Some(provider);
        self
    }

    /// Build the client.
    ///
    /// Fails when the configuration is invalid or the credentials are empty.
    pub fn build(self) -> Result<BitunixClient, BitunixError> {
        let config = self.config;
        config.validate()?;

        // Build default headers.
        let mut headers = HeaderMap::new();
        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("bitunix-api-client/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("bitunix-api-client"));
        headers.insert(USER_AGENT, header_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let language = HeaderValue::from_str(&config.language)
            .map_err(|_| ValidationError::new("language", &config.language, "not a valid header value"))?;
        headers.insert(HeaderName::from_static("language"), language);

        if let Some(credentials) = &self.credentials {
            let creds = credentials.get_credentials();
            creds.validate()?;
            let mut api_key = HeaderValue::from_str(&creds.api_key).map_err(|_| {
                ValidationError::new("apiKey", &creds.api_key, "not a valid header value")
            })?;
            api_key.set_sensitive(true);
            headers.insert(HeaderName::from_static("api-key"), api_key);
        }

        // Build the HTTP client with middleware.
        let reqwest_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        Ok(BitunixClient {
            http_client: client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            endpoints: Arc::new(config.endpoints),
            quote_asset: config.quote_asset,
            settlement: config.settlement,
            credentials: self.credentials,
            nonce_provider: self
                .nonce_provider
                .unwrap_or_else(|| Arc::new(RandomNonce::new())),
            timestamp_provider: self
                .timestamp_provider
                .unwrap_or_else(|| Arc::new(SystemClock)),
            symbol_locks: Arc::new(SymbolLocks::default()),
        })
    }
}

impl Default for BitunixClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticCredentials;

    #[test]
    fn test_build_rejects_empty_secret() {
        let err = BitunixClient::builder()
            .credentials(Arc::new(StaticCredentials::new("key", "")))
            .build()
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_build_rejects_bad_base_url() {
        let err = BitunixClient::builder().base_url("::nope").build().unwrap_err();
        assert!(err.is_validation() || matches!(err, BitunixError::Url(_)));
    }

    #[test]
    fn test_exchange_symbol_uses_quote_asset() {
        let client = BitunixClient::builder().quote_asset("USDC").build().unwrap();
        assert_eq!(client.exchange_symbol("ETH"), "ETHUSDC");
    }

    #[test]
    fn test_debug_hides_credentials() {
        let client = BitunixClient::builder()
            .credentials(Arc::new(StaticCredentials::new("key", "very_secret")))
            .build()
            .unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("has_credentials: true"));
        assert!(!debug.contains("very_secret"));
    }
}
