use crate::domain::{
    ExpenseId, ExpenseRecord, MonthLedger, MonthSelection, NewExpense, SettlementResult, Yen,
};
use crate::storage::Repository;

use super::AppError;

/// Application service providing high-level operations over the expense
/// store. This is the primary interface for any client (CLI, API, TUI, etc.).
pub struct ExpenseService {
    repo: Repository,
}

/// One month's working set together with its computed settlement.
pub struct MonthReport {
    pub ledger: MonthLedger,
    pub result: SettlementResult,
}

impl ExpenseService {
    /// Create a new service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Save a new expense after validation. The store assigns the id.
    pub async fn add_expense(&self, expense: NewExpense) -> Result<ExpenseRecord, AppError> {
        if expense.amount < 0 {
            return Err(AppError::InvalidExpense(
                "Amount must not be negative".to_string(),
            ));
        }

        Ok(self.repo.insert_expense(&expense).await?)
    }

    /// Get an expense by id.
    pub async fn get_expense(&self, id: ExpenseId) -> Result<ExpenseRecord, AppError> {
        self.repo
            .get_expense(id)
            .await?
            .ok_or(AppError::ExpenseNotFound(id))
    }

    /// Fetch a month's records into a fresh working set.
    /// A month with no matching records yields an empty ledger, not an error.
    pub async fn month_ledger(&self, month: MonthSelection) -> Result<MonthLedger, AppError> {
        let expenses = self
            .repo
            .list_expenses(month.first_day(), month.last_day())
            .await?;
        Ok(MonthLedger::new(month, expenses))
    }

    /// Fetch a month and aggregate it in one step.
    pub async fn month_report(&self, month: MonthSelection) -> Result<MonthReport, AppError> {
        let ledger = self.month_ledger(month).await?;
        let result = ledger.settle();
        Ok(MonthReport { ledger, result })
    }

    /// List every stored expense, newest purchase first.
    pub async fn all_expenses(&self) -> Result<Vec<ExpenseRecord>, AppError> {
        Ok(self.repo.list_all_expenses().await?)
    }

    /// Delete an expense permanently and return the removed record.
    /// There is no soft delete and no undo.
    pub async fn delete_expense(&self, id: ExpenseId) -> Result<ExpenseRecord, AppError> {
        let expense = self.get_expense(id).await?;
        if !self.repo.delete_expense(id).await? {
            return Err(AppError::ExpenseNotFound(id));
        }
        Ok(expense)
    }

    /// Per-payer totals for a month straight from the store.
    pub async fn payer_totals(&self, month: MonthSelection) -> Result<(Yen, Yen), AppError> {
        Ok(self
            .repo
            .sum_by_payer(month.first_day(), month.last_day())
            .await?)
    }
}
