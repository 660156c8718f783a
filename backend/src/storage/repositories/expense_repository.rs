use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use super::{from_millis, from_text, to_millis, to_text};
use crate::domain::models::expense::{Expense, ExpenseFilter};
use crate::storage::connection::DbConnection;
use crate::storage::traits::ExpenseStorage;

const SELECT_EXPENSE: &str =
    "SELECT id, title, amount, category, date_ms, created_at, updated_at FROM expenses";

/// Repository for expense operations
#[derive(Clone)]
pub struct ExpenseRepository {
    db: DbConnection,
}

impl ExpenseRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_expense(row: &SqliteRow) -> Result<Expense> {
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;
        Ok(Expense {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            amount: row.try_get("amount")?,
            category: row.try_get("category")?,
            date: from_millis(row.try_get("date_ms")?)?,
            created_at: from_text(&created_at)?,
            updated_at: from_text(&updated_at)?,
        })
    }
}

#[async_trait]
impl ExpenseStorage for ExpenseRepository {
    async fn store_expense(&self, expense: &Expense) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO expenses (id, title, amount, category, date_ms, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&expense.id)
        .bind(&expense.title)
        .bind(expense.amount)
        .bind(&expense.category)
        .bind(to_millis(expense.date))
        .bind(to_text(expense.created_at))
        .bind(to_text(expense.updated_at))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_EXPENSE))
            .bind(expense_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::row_to_expense).transpose()
    }

    async fn list_expenses(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_EXPENSE);
        query.push(" WHERE 1 = 1");

        if let Some(category) = &filter.category {
            query.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(start) = filter.window.start {
            query.push(" AND date_ms >= ").push_bind(to_millis(start));
        }
        if let Some(end) = filter.window.end {
            query.push(" AND date_ms <= ").push_bind(to_millis(end));
        }
        query.push(" ORDER BY date_ms DESC, created_at DESC");

        let rows = query.build().fetch_all(self.db.pool()).await?;
        rows.iter().map(Self::row_to_expense).collect()
    }

    async fn update_expense(&self, expense: &Expense) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE expenses
            SET title = ?, amount = ?, category = ?, date_ms = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&expense.title)
        .bind(expense.amount)
        .bind(&expense.category)
        .bind(to_millis(expense.date))
        .bind(to_text(expense.updated_at))
        .bind(&expense.id)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_expense(&self, expense_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(expense_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
