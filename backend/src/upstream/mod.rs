//! # Upstream Module
//!
//! HTTP clients for the third-party services the dashboard forwards to: a market data
//! provider (quotes, charts, symbol search), a news headline provider and a hosted chat
//! completion endpoint.
//!
//! Each collaborator sits behind a trait so the REST layer can be exercised with stubs.
//! Nothing here retries; a failure is reported once as an [`UpstreamError`].

pub mod chat;
pub mod error;
pub mod market_data;
pub mod news;

pub use chat::{ChatCompletion, OpenAiChatClient};
pub use error::UpstreamError;
pub use market_data::{ChartQuery, MarketDataProvider, YahooFinanceClient};
pub use news::{HeadlineFeed, NewsApiClient, NewsProvider};

use serde::de::DeserializeOwned;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub(crate) fn http_client(service: &'static str) -> Result<reqwest::Client, UpstreamError> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("expense-dashboard/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(UpstreamError::request(service))
}

/// Send a request and decode a successful JSON body. Non-2xx responses become
/// `UpstreamError::Status` carrying the response text.
pub(crate) async fn send_json<T: DeserializeOwned>(
    service: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<T, UpstreamError> {
    let response = request.send().await.map_err(UpstreamError::request(service))?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(UpstreamError::Status {
            service,
            status: status.as_u16(),
            body,
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|e| UpstreamError::decode(service, e))
}

pub(crate) fn trim_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
