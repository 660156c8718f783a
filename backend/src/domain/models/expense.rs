use chrono::{DateTime, Utc};

use crate::domain::period::PeriodWindow;

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: String,
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Selection applied by the expense store. Matching records come back newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    pub category: Option<String>,
    pub window: PeriodWindow,
}

impl ExpenseFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn in_window(window: PeriodWindow) -> Self {
        Self {
            category: None,
            window,
        }
    }
}
