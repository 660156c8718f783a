use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: String,
    pub label: String,
    pub color: String,
    pub budget: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Derive the category id from its label: trimmed, lowercased, every run of
    /// whitespace collapsed to a single `_`.
    ///
    /// Both single creates and bulk upserts key categories through this function.
    pub fn is_reserved_id(id: &str) -> bool {
        id.eq_ignore_ascii_case(ALL_CATEGORIES)
    }

    pub fn id_from_label(label: &str) -> String {
        label
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
    }
}

/// Filter value meaning "every category"; never a category id
pub const ALL_CATEGORIES: &str = "all";

/// Result of a guarded category delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    /// Expenses still reference the category; nothing was removed
    InUse(u64),
}
