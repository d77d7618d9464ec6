pub mod power;

pub use power::PowerClient;

use crate::error::Result;
use std::time::Duration;

/// Shared HTTP client for the weather provider and the insight backends.
pub fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
