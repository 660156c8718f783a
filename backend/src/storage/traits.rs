//! # Storage Traits
//!
//! Storage abstractions used by the domain layer, so services never depend on a
//! particular backend.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::category::{Category, DeleteOutcome};
use crate::domain::models::expense::{Expense, ExpenseFilter};

#[async_trait]
pub trait ExpenseStorage: Send + Sync {
    /// Store a new expense
    async fn store_expense(&self, expense: &Expense) -> Result<()>;

    /// Retrieve a specific expense by ID
    async fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>>;

    /// List expenses matching the filter, ordered by date descending (most recent first)
    async fn list_expenses(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>>;

    /// Replace the mutable fields of an existing expense.
    /// Returns false if no expense has that ID.
    async fn update_expense(&self, expense: &Expense) -> Result<bool>;

    /// Returns true if the expense was found and deleted
    async fn delete_expense(&self, expense_id: &str) -> Result<bool>;
}

#[async_trait]
pub trait CategoryStorage: Send + Sync {
    /// Insert a new category. Returns false, writing nothing, if the ID is already taken.
    async fn insert_category(&self, category: &Category) -> Result<bool>;

    async fn get_category(&self, category_id: &str) -> Result<Option<Category>>;

    /// List all categories ordered by label
    async fn list_categories(&self) -> Result<Vec<Category>>;

    /// Returns false if no category has that ID
    async fn update_category(&self, category: &Category) -> Result<bool>;

    /// Delete a category unless an expense references it. The reference check and
    /// the delete happen atomically.
    async fn delete_category_if_unused(&self, category_id: &str) -> Result<DeleteOutcome>;

    /// Insert-or-replace every category by ID in one atomic write
    async fn upsert_categories(&self, categories: &[Category]) -> Result<()>;
}

/// Factory for the repositories of one storage backend
pub trait Connection: Send + Sync + Clone + 'static {
    type ExpenseRepository: ExpenseStorage + Clone + 'static;
    type CategoryRepository: CategoryStorage + Clone + 'static;

    fn create_expense_repository(&self) -> Self::ExpenseRepository;

    fn create_category_repository(&self) -> Self::CategoryRepository;
}
