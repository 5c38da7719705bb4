pub mod base;
pub mod errors;
pub mod openai;

use reqwest::Client;
use std::time::Duration;

/// Connect timeout for completion endpoint HTTP clients (seconds).
pub(crate) const PROVIDER_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Build a `reqwest::Client` for a completion endpoint.
///
/// The overall request deadline is enforced by the agent loop's
/// `completion_timeout`, so only the connect phase is bounded here.
pub(crate) fn provider_http_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(PROVIDER_CONNECT_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|_| Client::new())
}
