use crate::domain::models::expense::Expense as DomainExpense;
use shared::Expense;

pub struct ExpenseMapper;

impl ExpenseMapper {
    /// Convert domain Expense to shared Expense DTO
    pub fn to_dto(domain: DomainExpense) -> Expense {
        Expense {
            id: domain.id,
            title: domain.title,
            amount: domain.amount,
            category: domain.category,
            date: domain.date,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }

    pub fn to_dtos(domain: Vec<DomainExpense>) -> Vec<Expense> {
        domain.into_iter().map(Self::to_dto).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_to_dto_keeps_every_field() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap();
        let domain = DomainExpense {
            id: "e1".to_string(),
            title: "Coffee".to_string(),
            amount: 4.5,
            category: "food".to_string(),
            date: ts,
            created_at: ts,
            updated_at: ts,
        };

        let dto = ExpenseMapper::to_dto(domain);
        assert_eq!(dto.id, "e1");
        assert_eq!(dto.title, "Coffee");
        assert_eq!(dto.amount, 4.5);
        assert_eq!(dto.category, "food");
        assert_eq!(dto.date, ts);
    }
}
