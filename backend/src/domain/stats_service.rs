//! Expense statistics over a period window.
//!
//! `aggregate` and `summarize_categories` are pure so they can be checked against fixed
//! clocks; the service only resolves the window, loads the rows and delegates.

use chrono::{DateTime, Utc};
use shared::{CategoryStats, StatsQuery, StatsResult};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::category::Category;
use crate::domain::models::expense::{Expense, ExpenseFilter};
use crate::domain::period::PeriodWindow;
use crate::storage::{CategoryStorage, Connection, ExpenseStorage};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Reduce expenses to totals. Records outside `window` are ignored.
///
/// `avg_daily` is the mean amount per matching record. `daily_rate` divides the total by
/// the number of days the window spans; an open start is taken from the earliest record
/// and an open end from `now`.
pub fn aggregate(expenses: &[Expense], window: &PeriodWindow, now: DateTime<Utc>) -> StatsResult {
    let matching: Vec<&Expense> = expenses.iter().filter(|e| window.contains(e.date)).collect();
    if matching.is_empty() {
        return StatsResult::default();
    }

    let mut category_totals: BTreeMap<String, f64> = BTreeMap::new();
    let mut total = 0.0;
    for expense in &matching {
        total += expense.amount;
        *category_totals.entry(expense.category.clone()).or_insert(0.0) += expense.amount;
    }

    let count = matching.len();
    let earliest = matching.iter().map(|e| e.date).min().unwrap_or(now);
    let span_start = window.start.unwrap_or(earliest);
    let span_end = window.end.unwrap_or(now).max(span_start);
    let days = ((span_end - span_start).num_milliseconds() as f64 / MILLIS_PER_DAY)
        .ceil()
        .max(1.0);

    StatsResult {
        total,
        avg_daily: total / count as f64,
        category_totals,
        count: count as u32,
        daily_rate: total / days,
    }
}

/// Spending against budget for every category, in the order given
pub fn summarize_categories(
    categories: &[Category],
    expenses: &[Expense],
    window: &PeriodWindow,
) -> Vec<CategoryStats> {
    let mut spent: HashMap<&str, (f64, u32)> = HashMap::new();
    for expense in expenses.iter().filter(|e| window.contains(e.date)) {
        let entry = spent.entry(expense.category.as_str()).or_insert((0.0, 0));
        entry.0 += expense.amount;
        entry.1 += 1;
    }

    categories
        .iter()
        .map(|category| {
            let (total_spent, transaction_count) =
                spent.get(category.id.as_str()).copied().unwrap_or((0.0, 0));
            let budget_utilization = if category.budget > 0.0 {
                Some(total_spent * 100.0 / category.budget)
            } else {
                None
            };
            CategoryStats {
                id: category.id.clone(),
                label: category.label.clone(),
                color: category.color.clone(),
                budget: category.budget,
                total_spent,
                transaction_count,
                budget_utilization,
                over_budget: total_spent > category.budget,
            }
        })
        .collect()
}

/// Service computing dashboard statistics
#[derive(Clone)]
pub struct StatsService<C: Connection> {
    expense_repository: C::ExpenseRepository,
    category_repository: C::CategoryRepository,
}

impl<C: Connection> StatsService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            expense_repository: connection.create_expense_repository(),
            category_repository: connection.create_category_repository(),
        }
    }

    fn window(query: &StatsQuery, now: DateTime<Utc>) -> DomainResult<PeriodWindow> {
        PeriodWindow::resolve(
            query.period.as_deref(),
            query.start_date.as_deref(),
            query.end_date.as_deref(),
            now,
        )
        .map_err(DomainError::Validation)
    }

    pub async fn expense_stats(&self, query: &StatsQuery) -> DomainResult<StatsResult> {
        let now = Utc::now();
        let window = Self::window(query, now)?;
        let expenses = self
            .expense_repository
            .list_expenses(&ExpenseFilter::in_window(window))
            .await?;

        let stats = aggregate(&expenses, &window, now);
        info!(
            "Computed stats over {} expenses: total={:.2}, avg={:.2}",
            stats.count, stats.total, stats.avg_daily
        );
        Ok(stats)
    }

    pub async fn category_stats(&self, query: &StatsQuery) -> DomainResult<Vec<CategoryStats>> {
        let window = Self::window(query, Utc::now())?;
        let categories = self.category_repository.list_categories().await?;
        let expenses = self
            .expense_repository
            .list_expenses(&ExpenseFilter::in_window(window))
            .await?;

        debug!(
            "Summarizing {} categories over {} expenses",
            categories.len(),
            expenses.len()
        );
        Ok(summarize_categories(&categories, &expenses, &window))
    }
}
