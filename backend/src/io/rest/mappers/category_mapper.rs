use crate::domain::models::category::Category as DomainCategory;
use shared::Category;

pub struct CategoryMapper;

impl CategoryMapper {
    /// Convert domain Category to shared Category DTO
    pub fn to_dto(domain: DomainCategory) -> Category {
        Category {
            id: domain.id,
            label: domain.label,
            color: domain.color,
            budget: domain.budget,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }

    pub fn to_dtos(domain: Vec<DomainCategory>) -> Vec<Category> {
        domain.into_iter().map(Self::to_dto).collect()
    }
}
