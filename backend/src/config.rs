//! Runtime configuration, read once at startup from the environment (and an optional
//! `.env` file loaded by `main`).

use anyhow::{Context, Result};
use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:expenses.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3001";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_MARKET_DATA_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_MARKET_SYMBOLS: &str = "^NSEI,^BSESN,NIFTYMIDCAP150.NS,^NSEBANK";
pub const DEFAULT_NEWS_API_BASE_URL: &str = "https://newsapi.org";
pub const DEFAULT_CHAT_API_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_CHAT_SYSTEM_PROMPT: &str = "You are a personal finance assistant. \
Answer the user's question briefly. When you recommend changes to spending, also include a \
fenced ```json block of the form {\"response\": [{\"Category\": \"<category>\", \
\"Recommendation\": \"<advice>\"}]}.";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub cors_origin: String,
    pub market_data_base_url: String,
    pub market_symbols: Vec<String>,
    pub news_api_base_url: String,
    pub news_api_key: Option<String>,
    pub chat_api_base_url: String,
    pub chat_api_key: Option<String>,
    pub chat_model: String,
    pub chat_system_prompt: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            market_data_base_url: DEFAULT_MARKET_DATA_BASE_URL.to_string(),
            market_symbols: split_symbols(DEFAULT_MARKET_SYMBOLS),
            news_api_base_url: DEFAULT_NEWS_API_BASE_URL.to_string(),
            news_api_key: None,
            chat_api_base_url: DEFAULT_CHAT_API_BASE_URL.to_string(),
            chat_api_key: None,
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            chat_system_prompt: DEFAULT_CHAT_SYSTEM_PROMPT.to_string(),
        }
    }
}

fn split_symbols(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let or_default = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let bind_addr = or_default("BIND_ADDR", DEFAULT_BIND_ADDR);
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .with_context(|| format!("BIND_ADDR '{}' is not a valid socket address", bind_addr))?;

        let market_symbols = split_symbols(&or_default("MARKET_SYMBOLS", DEFAULT_MARKET_SYMBOLS));
        if market_symbols.is_empty() {
            anyhow::bail!("MARKET_SYMBOLS must name at least one symbol");
        }

        Ok(Self {
            database_url: or_default("DATABASE_URL", DEFAULT_DATABASE_URL),
            bind_addr,
            cors_origin: or_default("CORS_ORIGIN", DEFAULT_CORS_ORIGIN),
            market_data_base_url: or_default("MARKET_DATA_BASE_URL", DEFAULT_MARKET_DATA_BASE_URL),
            market_symbols,
            news_api_base_url: or_default("NEWS_API_BASE_URL", DEFAULT_NEWS_API_BASE_URL),
            news_api_key: get("NEWS_API_KEY"),
            chat_api_base_url: or_default("CHAT_API_BASE_URL", DEFAULT_CHAT_API_BASE_URL),
            chat_api_key: get("CHAT_API_KEY"),
            chat_model: or_default("CHAT_MODEL", DEFAULT_CHAT_MODEL),
            chat_system_prompt: or_default("CHAT_SYSTEM_PROMPT", DEFAULT_CHAT_SYSTEM_PROMPT),
        })
    }
}
