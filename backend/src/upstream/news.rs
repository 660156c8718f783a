use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{http_client, send_json, trim_base_url, UpstreamError};

const SERVICE: &str = "News API";
const PAGE_SIZE: &str = "10";

/// Which headline list to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadlineFeed {
    /// Business headlines about stocks and markets
    Stock,
    /// Popular headlines for the tracked company
    Trending,
}

impl HeadlineFeed {
    fn params(&self) -> Vec<(&'static str, &'static str)> {
        match self {
            HeadlineFeed::Stock => vec![
                ("q", "stocks OR stock market OR finance OR Wall Street"),
                ("category", "business"),
                ("country", "us"),
                ("language", "en"),
                ("pageSize", PAGE_SIZE),
            ],
            HeadlineFeed::Trending => vec![
                ("q", "infosys"),
                ("country", "us"),
                ("language", "en"),
                ("sortBy", "popularity"),
                ("pageSize", PAGE_SIZE),
            ],
        }
    }
}

#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn top_headlines(&self, feed: HeadlineFeed) -> Result<Vec<Value>, UpstreamError>;
}

#[derive(Deserialize)]
struct HeadlinesResponse {
    #[serde(default)]
    articles: Vec<Value>,
}

/// Client for newsapi.org top headlines
pub struct NewsApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl NewsApiClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, UpstreamError> {
        Ok(Self {
            http: http_client(SERVICE)?,
            base_url: trim_base_url(base_url),
            api_key,
        })
    }
}

#[async_trait]
impl NewsProvider for NewsApiClient {
    async fn top_headlines(&self, feed: HeadlineFeed) -> Result<Vec<Value>, UpstreamError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(UpstreamError::MissingCredentials {
                service: SERVICE,
                setting: "NEWS_API_KEY",
            })?;

        debug!("Fetching {:?} headlines", feed);
        let request = self
            .http
            .get(format!("{}/v2/top-headlines", self.base_url))
            .header("X-Api-Key", api_key)
            .query(&feed.params());
        let response: HeadlinesResponse = send_json(SERVICE, request).await?;
        Ok(response.articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_fails_without_calling_out() {
        let client = NewsApiClient::new("http://127.0.0.1:9", None).unwrap();
        let err = client.top_headlines(HeadlineFeed::Stock).await.unwrap_err();
        assert!(matches!(
            err,
            UpstreamError::MissingCredentials { setting: "NEWS_API_KEY", .. }
        ));
    }

    #[test]
    fn test_feeds_differ_in_query() {
        let stock = HeadlineFeed::Stock.params();
        let trending = HeadlineFeed::Trending.params();
        assert!(stock.contains(&("category", "business")));
        assert!(trending.contains(&("sortBy", "popularity")));
        assert!(stock.iter().chain(trending.iter()).all(|(_, v)| !v.is_empty()));
    }
}
