use chrono::{SubsecRound, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::error::{DomainError, DomainResult, FieldErrors};
use crate::domain::models::category::Category;
use crate::domain::models::expense::{Expense, ExpenseFilter};
use crate::domain::period::PeriodWindow;
use crate::domain::validation::{non_negative, required_text, timestamp};
use crate::storage::{Connection, ExpenseStorage};
use shared::{CreateExpenseRequest, ExpenseListQuery, UpdateExpenseRequest};

const TITLE_REQUIRED: &str = "Title is required";
const AMOUNT_INVALID: &str = "Amount must be a positive number";
const CATEGORY_REQUIRED: &str = "Category is required";

/// Service for recording, listing and editing expenses
#[derive(Clone)]
pub struct ExpenseService<C: Connection> {
    expense_repository: C::ExpenseRepository,
}

impl<C: Connection> ExpenseService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            expense_repository: connection.create_expense_repository(),
        }
    }

    /// Validate and persist a new expense. The category is not checked against the
    /// category store.
    pub async fn create_expense(&self, request: CreateExpenseRequest) -> DomainResult<Expense> {
        info!("Creating expense: title={:?}, category={:?}", request.title, request.category);

        let mut errors = FieldErrors::new();
        let title = errors.check(required_text("title", request.title.as_deref(), TITLE_REQUIRED));
        let amount = errors.check(non_negative("amount", request.amount.as_ref(), AMOUNT_INVALID));
        let category = errors.check(required_text(
            "category",
            request.category.as_deref(),
            CATEGORY_REQUIRED,
        ));
        let date = match request.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => errors.check(timestamp("date", raw)),
            None => None,
        };
        errors.into_result()?;

        let (Some(title), Some(amount), Some(category)) = (title, amount, category) else {
            return Err(DomainError::invalid("request", "Incomplete expense"));
        };

        let now = Utc::now().trunc_subsecs(3);
        let expense = Expense {
            id: Expense::generate_id(),
            title,
            amount,
            category,
            date: date.unwrap_or(now).trunc_subsecs(3),
            created_at: now,
            updated_at: now,
        };

        self.expense_repository.store_expense(&expense).await?;

        info!("Created expense {} ({:.2} in {})", expense.id, expense.amount, expense.category);
        Ok(expense)
    }

    /// List expenses, newest first, narrowed by category and period window
    pub async fn list_expenses(&self, query: &ExpenseListQuery) -> DomainResult<Vec<Expense>> {
        let window = PeriodWindow::resolve(
            query.period.as_deref(),
            query.start_date.as_deref(),
            query.end_date.as_deref(),
            Utc::now(),
        )
        .map_err(DomainError::Validation)?;

        let category = query
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !Category::is_reserved_id(c))
            .map(str::to_string);

        let filter = ExpenseFilter { category, window };
        let expenses = self.expense_repository.list_expenses(&filter).await?;

        info!("Found {} expenses for {:?}", expenses.len(), filter);
        Ok(expenses)
    }

    pub async fn get_expense(&self, expense_id: &str) -> DomainResult<Expense> {
        self.expense_repository
            .get_expense(expense_id)
            .await?
            .ok_or_else(|| DomainError::expense_not_found(expense_id))
    }

    /// Apply a partial update. Fields absent from the request keep their stored values.
    pub async fn update_expense(
        &self,
        expense_id: &str,
        request: UpdateExpenseRequest,
    ) -> DomainResult<Expense> {
        info!("Updating expense: {}", expense_id);

        let mut errors = FieldErrors::new();
        let title = request
            .title
            .as_deref()
            .and_then(|t| errors.check(required_text("title", Some(t), TITLE_REQUIRED)));
        let amount = request
            .amount
            .as_ref()
            .and_then(|a| errors.check(non_negative("amount", Some(a), AMOUNT_INVALID)));
        let category = request
            .category
            .as_deref()
            .and_then(|c| errors.check(required_text("category", Some(c), CATEGORY_REQUIRED)));
        let date = request
            .date
            .as_deref()
            .and_then(|d| errors.check(timestamp("date", d)));
        errors.into_result()?;

        let mut expense = self.get_expense(expense_id).await?;
        if let Some(title) = title {
            expense.title = title;
        }
        if let Some(amount) = amount {
            expense.amount = amount;
        }
        if let Some(category) = category {
            expense.category = category;
        }
        if let Some(date) = date {
            expense.date = date.trunc_subsecs(3);
        }
        expense.updated_at = Utc::now().trunc_subsecs(3);

        if !self.expense_repository.update_expense(&expense).await? {
            warn!("Expense {} disappeared before update", expense_id);
            return Err(DomainError::expense_not_found(expense_id));
        }

        info!("Updated expense {}", expense.id);
        Ok(expense)
    }

    pub async fn delete_expense(&self, expense_id: &str) -> DomainResult<()> {
        info!("Deleting expense: {}", expense_id);

        if !self.expense_repository.delete_expense(expense_id).await? {
            warn!("Expense not found: {}", expense_id);
            return Err(DomainError::expense_not_found(expense_id));
        }
        Ok(())
    }
}
