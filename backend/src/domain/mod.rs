//! # Domain Module
//!
//! Business rules of the expense dashboard: validation, category id derivation, period
//! windows, statistics and the thin services wrapping the market, news and chat
//! collaborators.
//!
//! Services are generic over the storage [`Connection`](crate::storage::Connection) so the
//! same code runs against the production pool and the in-memory test database.

pub mod category_service;
pub mod chat_service;
pub mod error;
pub mod expense_service;
pub mod models;
pub mod period;
pub mod roi_service;
pub mod stats_service;
pub mod validation;

pub use category_service::CategoryService;
pub use chat_service::ChatService;
pub use error::{DomainError, DomainResult};
pub use expense_service::ExpenseService;
pub use roi_service::RoiService;
pub use stats_service::StatsService;
