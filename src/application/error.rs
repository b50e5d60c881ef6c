use thiserror::Error;

use crate::domain::ExpenseId;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Expense not found: {0}")]
    ExpenseNotFound(ExpenseId),

    #[error("Invalid expense: {0}")]
    InvalidExpense(String),

    #[error("Receipt analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Expense store unavailable: {0}")]
    Store(#[from] anyhow::Error),
}
