//! Remote data sources polled by the dashboard widgets.
//!
//! Each source wraps one JSON endpoint (the weather service, the
//! dolarapi quote) behind a common trait so the retry loop in
//! `runtime::poller` can drive any of them.

mod dolar;
mod weather;

pub use dolar::DolarSource;
pub use weather::WeatherSource;

use async_trait::async_trait;

/// Errors a single fetch attempt can produce. Every variant is
/// retryable; the poller does not distinguish between them.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Connect, timeout, or body decode failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
}

/// One JSON endpoint behind a dashboard widget.
#[async_trait]
pub trait DataSource: Send + Sync + 'static {
    /// Parsed response shape published to the widget.
    type Output: Send + 'static;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Message shown by the widget when the retry budget is exhausted.
    fn failure_message(&self) -> &'static str;

    /// Issue one request and parse the body.
    async fn fetch(&self) -> Result<Self::Output, FetchError>;
}
