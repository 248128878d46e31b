//! Example: Working with BitunixError kinds.
//!
//! Run with: cargo run --example error_handling

use bitunix_api_client::error::{ApiError, error_codes};
use bitunix_api_client::{BitunixError, ErrorKind, OrderPayload, Side};

fn describe(err: &BitunixError) {
    match err.kind() {
        ErrorKind::Validation => println!("Rejected locally, nothing sent: {err}"),
        ErrorKind::Transport => println!("Network or HTTP problem: {err}"),
        ErrorKind::Application => println!("Exchange said no: {err}"),
        ErrorKind::WorkflowAbort => {
            let stage = err.workflow_abort().map(|a| a.stage);
            println!("Order workflow stopped at {stage:?}: {err}");
        }
    }
}

fn main() {
    let api_error = ApiError::new(
        error_codes::RATE_LIMIT,
        "Too many requests",
        r#"{"code":10005,"msg":"Too many requests"}"#,
    );
    println!("API error: {}", api_error);
    println!("Is rate limit: {}", api_error.is_rate_limit());
    describe(&BitunixError::Api(api_error));

    let bad = OrderPayload::from_json(r#"{"symbol":"BTC","side":"HOLD"}"#);
    if let Err(err) = bad {
        describe(&err.into());
    }

    if let Err(err) = "LONG".parse::<Side>() {
        describe(&err.into());
    }
}
