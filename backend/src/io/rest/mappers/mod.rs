pub mod category_mapper;
pub mod expense_mapper;

pub use category_mapper::CategoryMapper;
pub use expense_mapper::ExpenseMapper;
