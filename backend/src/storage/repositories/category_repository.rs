use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{from_text, to_text};
use crate::domain::models::category::{Category, DeleteOutcome};
use crate::storage::connection::DbConnection;
use crate::storage::traits::CategoryStorage;

/// Repository for category operations
#[derive(Clone)]
pub struct CategoryRepository {
    db: DbConnection,
}

impl CategoryRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_category(row: &SqliteRow) -> Result<Category> {
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;
        Ok(Category {
            id: row.try_get("id")?,
            label: row.try_get("label")?,
            color: row.try_get("color")?,
            budget: row.try_get("budget")?,
            created_at: from_text(&created_at)?,
            updated_at: from_text(&updated_at)?,
        })
    }
}

#[async_trait]
impl CategoryStorage for CategoryRepository {
    async fn insert_category(&self, category: &Category) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO categories (id, label, color, budget, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&category.id)
        .bind(&category.label)
        .bind(&category.color)
        .bind(category.budget)
        .bind(to_text(category.created_at))
        .bind(to_text(category.updated_at))
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_category(&self, category_id: &str) -> Result<Option<Category>> {
        let row = sqlx::query(
            r#"
            SELECT id, label, color, budget, created_at, updated_at
            FROM categories
            WHERE id = ?
            "#,
        )
        .bind(category_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_category).transpose()
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query(
            r#"
            SELECT id, label, color, budget, created_at, updated_at
            FROM categories
            ORDER BY label ASC, id ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_category).collect()
    }

    async fn update_category(&self, category: &Category) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE categories
            SET label = ?, color = ?, budget = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&category.label)
        .bind(&category.color)
        .bind(category.budget)
        .bind(to_text(category.updated_at))
        .bind(&category.id)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_category_if_unused(&self, category_id: &str) -> Result<DeleteOutcome> {
        let mut tx = self.db.pool().begin().await?;

        let in_use: i64 = sqlx::query("SELECT COUNT(*) AS n FROM expenses WHERE category = ?")
            .bind(category_id)
            .fetch_one(&mut *tx)
            .await?
            .try_get("n")?;

        if in_use > 0 {
            tx.rollback().await?;
            return Ok(DeleteOutcome::InUse(in_use as u64));
        }

        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(category_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        if result.rows_affected() > 0 {
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::NotFound)
        }
    }

    async fn upsert_categories(&self, categories: &[Category]) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;

        for category in categories {
            sqlx::query(
                r#"
                INSERT INTO categories (id, label, color, budget, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT(id) DO UPDATE SET
                    label = excluded.label,
                    color = excluded.color,
                    budget = excluded.budget,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(&category.id)
            .bind(&category.label)
            .bind(&category.color)
            .bind(category.budget)
            .bind(to_text(category.created_at))
            .bind(to_text(category.updated_at))
            .execute(&mut *tx)
            .await?;
        }

        // Dropping the transaction on an early return rolls the whole batch back
        tx.commit().await?;
        Ok(())
    }
}
