pub mod category_repository;
pub mod expense_repository;

pub use category_repository::CategoryRepository;
pub use expense_repository::ExpenseRepository;

use anyhow::{anyhow, Result};
use chrono::{DateTime, TimeZone, Utc};

pub(crate) fn to_millis(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

pub(crate) fn from_millis(ms: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| anyhow!("Stored timestamp out of range: {}", ms))
}

pub(crate) fn to_text(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

pub(crate) fn from_text(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)
        .map_err(|e| anyhow!("Stored timestamp '{}' is not RFC 3339: {}", s, e))?
        .with_timezone(&Utc))
}
