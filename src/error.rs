//! Error types for the Bitunix client library.

use thiserror::Error;

use crate::trade::OrderStage;

/// The main error type for all Bitunix client operations.
#[derive(Error, Debug)]
pub enum BitunixError {
    /// Caller-supplied input was rejected before any request was sent
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request with middleware failed
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// The server answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Bitunix API returned a non-zero code
    #[error("Bitunix API error: {0}")]
    Api(ApiError),

    /// Invalid response from the API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The order workflow stopped before completion
    #[error("{0}")]
    Workflow(WorkflowAbort),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Missing required credentials
    #[error("Missing credentials: API key and secret required for private endpoints")]
    MissingCredentials,
}

/// Broad classification of a [`BitunixError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad caller input; no network call was made
    Validation,
    /// Network, HTTP status or response decoding failure
    Transport,
    /// The exchange answered with a non-zero code
    Application,
    /// A step of the order workflow could not proceed
    WorkflowAbort,
}

impl BitunixError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::Config(_) | Self::MissingCredentials => {
                ErrorKind::Validation
            }
            Self::Http(_)
            | Self::HttpMiddleware(_)
            | Self::HttpStatus { .. }
            | Self::Json(_)
            | Self::Url(_)
            | Self::InvalidResponse(_) => ErrorKind::Transport,
            Self::Api(_) => ErrorKind::Application,
            Self::Workflow(_) => ErrorKind::WorkflowAbort,
        }
    }

    /// Kind of the innermost error, looking through workflow aborts.
    pub fn root_kind(&self) -> ErrorKind {
        match self {
            Self::Workflow(WorkflowAbort {
                reason: AbortReason::StepFailed(inner),
                ..
            }) => inner.root_kind(),
            other => other.kind(),
        }
    }

    /// The exchange error behind this failure, if any.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(api) => Some(api),
            Self::Workflow(WorkflowAbort {
                reason: AbortReason::StepFailed(inner),
                ..
            }) => inner.api_error(),
            _ => None,
        }
    }

    /// The workflow abort behind this failure, if any.
    pub fn workflow_abort(&self) -> Option<&WorkflowAbort> {
        match self {
            Self::Workflow(abort) => Some(abort),
            _ => None,
        }
    }

    /// Check whether the error comes from rejected caller input.
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}

/// A caller-supplied field failed a domain check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field} `{value}`: {reason}")]
pub struct ValidationError {
    /// Name of the offending field
    pub field: &'static str,
    /// The rejected value, rendered as text
    pub value: String,
    /// Human-readable reason
    pub reason: String,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(field: &'static str, value: impl ToString, reason: impl Into<String>) -> Self {
        Self {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Error returned by the Bitunix API in the response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The non-zero envelope code
    pub code: i64,
    /// Message from the envelope (`msg`)
    pub message: String,
    /// Raw response body exactly as received
    pub body: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: i64, message: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            body: body.into(),
        }
    }

    /// Check if this is a signature rejection.
    pub fn is_signature_error(&self) -> bool {
        self.code == error_codes::SIGNATURE_ERROR
    }

    /// Check if this is a rate limit error.
    pub fn is_rate_limit(&self) -> bool {
        self.code == error_codes::RATE_LIMIT
    }
}

/// Known Bitunix error codes for pattern matching.
pub mod error_codes {
    pub const NETWORK_ERROR: i64 = 10001;
    pub const PARAMETER_ERROR: i64 = 10002;
    pub const API_KEY_EMPTY: i64 = 10003;
    pub const IP_NOT_WHITELISTED: i64 = 10004;
    pub const RATE_LIMIT: i64 = 10005;
    pub const SIGNATURE_ERROR: i64 = 10007;
    pub const POSITION_NOT_EXIST: i64 = 20003;
    pub const INSUFFICIENT_BALANCE: i64 = 20005;
    pub const LEVERAGE_EXCEEDS_LIMIT: i64 = 20006;
}

/// An order workflow run that stopped at `stage`.
#[derive(Error, Debug)]
#[error("order workflow aborted while {stage}: {reason}")]
pub struct WorkflowAbort {
    /// The step that could not proceed
    pub stage: OrderStage,
    /// Why it could not proceed
    pub reason: AbortReason,
}

/// Reason for a [`WorkflowAbort`].
#[derive(Error, Debug)]
pub enum AbortReason {
    /// The underlying request failed
    #[error("{0}")]
    StepFailed(Box<BitunixError>),

    /// The ticker had no usable price
    #[error("no market price for {symbol}")]
    NoMarketPrice {
        /// Exchange symbol that was looked up
        symbol: String,
    },

    /// Margin and price give a quantity that doesn't fit a decimal
    #[error("order size out of range for margin {margin} at price {price}")]
    QuantityOutOfRange {
        margin: rust_decimal::Decimal,
        price: rust_decimal::Decimal,
    },

    /// The placed order never showed up as an open position
    #[error("no open position for {symbol} after {attempts} lookups")]
    PositionNotFound {
        /// Exchange symbol that was looked up
        symbol: String,
        /// Number of position list calls made
        attempts: u32,
    },
}

impl WorkflowAbort {
    pub(crate) fn step_failed(stage: OrderStage, source: BitunixError) -> BitunixError {
        BitunixError::Workflow(Self {
            stage,
            reason: AbortReason::StepFailed(Box::new(source)),
        })
    }

    pub(crate) fn new(stage: OrderStage, reason: AbortReason) -> BitunixError {
        BitunixError::Workflow(Self { stage, reason })
    }
}
