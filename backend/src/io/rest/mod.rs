//! # REST API Interface Layer
//!
//! One `*_apis.rs` file per resource, each exposing a `router()` that `create_router`
//! mounts. Handlers log the request, call one service method and map the outcome:
//!
//! - success: the DTO as JSON (201 for creates)
//! - failure: [`ApiError`], which picks the status code and error body
//!
//! Expense, category and calculator routes live under `/api`; market data, news and chat
//! routes sit at the root where the dashboard client calls them.

pub mod category_apis;
pub mod chat_apis;
pub mod error;
pub mod expense_apis;
pub mod mappers;
pub mod market_apis;
pub mod news_apis;
pub mod roi_apis;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::ApiError;
