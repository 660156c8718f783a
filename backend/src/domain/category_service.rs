use chrono::{SubsecRound, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::error::{DomainError, DomainResult, FieldErrors};
use crate::domain::models::category::{Category, DeleteOutcome};
use crate::domain::validation::{hex_color, non_negative, required_text};
use crate::storage::{CategoryStorage, Connection};
use shared::{CategoryUpsertRequest, CreateCategoryRequest, FieldError, UpdateCategoryRequest};

const LABEL_REQUIRED: &str = "Category name is required";
const BUDGET_INVALID: &str = "Budget must be a positive number";
const RESERVED_NAME: &str = "'All' is reserved for the unfiltered view";

/// A label whose derived id would collide with the "all categories" filter
fn unreserved_label(field: &str, label: String) -> Result<String, FieldError> {
    if Category::is_reserved_id(&Category::id_from_label(&label)) {
        Err(FieldError::new(field, RESERVED_NAME))
    } else {
        Ok(label)
    }
}

/// Service for managing spending categories
#[derive(Clone)]
pub struct CategoryService<C: Connection> {
    category_repository: C::CategoryRepository,
}

impl<C: Connection> CategoryService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            category_repository: connection.create_category_repository(),
        }
    }

    pub async fn list_categories(&self) -> DomainResult<Vec<Category>> {
        let categories = self.category_repository.list_categories().await?;
        info!("Found {} categories", categories.len());
        Ok(categories)
    }

    pub async fn get_category(&self, category_id: &str) -> DomainResult<Category> {
        self.category_repository
            .get_category(category_id)
            .await?
            .ok_or_else(|| DomainError::category_not_found(category_id))
    }

    /// Create a category keyed by the id derived from its label
    pub async fn create_category(&self, request: CreateCategoryRequest) -> DomainResult<Category> {
        info!("Creating category: label={:?}", request.label);

        let mut errors = FieldErrors::new();
        let label = errors.check(
            required_text("label", request.label.as_deref(), LABEL_REQUIRED)
                .and_then(|label| unreserved_label("label", label)),
        );
        let color = errors.check(hex_color("color", request.color.as_deref()));
        let budget = errors.check(non_negative("budget", request.budget.as_ref(), BUDGET_INVALID));
        errors.into_result()?;

        let (Some(label), Some(color), Some(budget)) = (label, color, budget) else {
            return Err(DomainError::invalid("request", "Incomplete category"));
        };

        let now = Utc::now().trunc_subsecs(3);
        let category = Category {
            id: Category::id_from_label(&label),
            label,
            color,
            budget,
            created_at: now,
            updated_at: now,
        };

        if !self.category_repository.insert_category(&category).await? {
            warn!("Category id already taken: {}", category.id);
            return Err(DomainError::DuplicateCategory(category.id));
        }

        info!("Created category {}", category.id);
        Ok(category)
    }

    /// Apply a partial update. The id never changes, even when the label does.
    pub async fn update_category(
        &self,
        category_id: &str,
        request: UpdateCategoryRequest,
    ) -> DomainResult<Category> {
        info!("Updating category: {}", category_id);

        let mut errors = FieldErrors::new();
        let label = request
            .label
            .as_deref()
            .and_then(|l| errors.check(required_text("label", Some(l), LABEL_REQUIRED)));
        let color = request
            .color
            .as_deref()
            .and_then(|c| errors.check(hex_color("color", Some(c))));
        let budget = request
            .budget
            .as_ref()
            .and_then(|b| errors.check(non_negative("budget", Some(b), BUDGET_INVALID)));
        errors.into_result()?;

        let mut category = self.get_category(category_id).await?;
        if let Some(label) = label {
            category.label = label;
        }
        if let Some(color) = color {
            category.color = color;
        }
        if let Some(budget) = budget {
            category.budget = budget;
        }
        category.updated_at = Utc::now().trunc_subsecs(3);

        if !self.category_repository.update_category(&category).await? {
            return Err(DomainError::category_not_found(category_id));
        }
        Ok(category)
    }

    /// Remove a category nothing references
    pub async fn delete_category(&self, category_id: &str) -> DomainResult<()> {
        info!("Deleting category: {}", category_id);

        match self.category_repository.delete_category_if_unused(category_id).await? {
            DeleteOutcome::Deleted => Ok(()),
            DeleteOutcome::NotFound => Err(DomainError::category_not_found(category_id)),
            DeleteOutcome::InUse(count) => {
                warn!("Category {} still referenced by {} expense(s)", category_id, count);
                Err(DomainError::CategoryInUse {
                    id: category_id.to_string(),
                    count,
                })
            }
        }
    }

    /// Insert or replace a batch of categories.
    ///
    /// Every entry is validated before anything is written; one bad entry rejects the
    /// whole batch. Returns the full category list afterwards.
    pub async fn bulk_upsert(&self, requests: Vec<CategoryUpsertRequest>) -> DomainResult<Vec<Category>> {
        info!("Bulk upserting {} categories", requests.len());

        let now = Utc::now().trunc_subsecs(3);
        let mut errors = FieldErrors::new();
        let mut seen = HashSet::new();
        let mut batch = Vec::with_capacity(requests.len());

        for (index, request) in requests.iter().enumerate() {
            let field = |name: &str| format!("categories[{}].{}", index, name);

            let explicit_id = request.id.as_deref().map(str::trim).filter(|id| !id.is_empty());
            let label = required_text(&field("label"), request.label.as_deref(), LABEL_REQUIRED);
            let label = errors.check(match explicit_id {
                Some(_) => label,
                None => label.and_then(|label| unreserved_label(&field("label"), label)),
            });
            let id = errors.check(match explicit_id {
                Some(id) if Category::is_reserved_id(id) => Err(FieldError::new(field("id"), RESERVED_NAME)),
                other => Ok(other.map(str::to_string)),
            });
            let color = errors.check(hex_color(&field("color"), request.color.as_deref()));
            let budget = errors.check(non_negative(
                &field("budget"),
                request.budget.as_ref(),
                BUDGET_INVALID,
            ));

            let (Some(label), Some(id), Some(color), Some(budget)) = (label, id, color, budget) else {
                continue;
            };
            let id = id.unwrap_or_else(|| Category::id_from_label(&label));

            if !seen.insert(id.clone()) {
                errors.push(FieldError::new(
                    field("id"),
                    format!("Duplicate category id '{}' in batch", id),
                ));
                continue;
            }

            batch.push(Category {
                id,
                label,
                color,
                budget,
                created_at: now,
                updated_at: now,
            });
        }
        errors.into_result()?;

        self.category_repository.upsert_categories(&batch).await?;
        self.list_categories().await
    }
}
