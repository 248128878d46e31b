//! Bitunix futures REST API client.
//!
//! This module provides the signed HTTP client and the request/response
//! types of the futures endpoints.

mod client;
pub mod endpoints;
mod traits;
mod types;

pub use client::{BitunixClient, BitunixClientBuilder};
pub use traits::FuturesApi;
pub use types::*;
