use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Row, SqlitePool};

use crate::domain::{Category, ExpenseId, ExpenseRecord, NewExpense, Payer, Yen};

use super::MIGRATION_001_INITIAL;

/// Dates are stored as ISO "YYYY-MM-DD" text so lexicographic comparison in
/// SQL matches chronological order.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Repository for persisting and querying expense records.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given path.
    /// Creates the database file if it doesn't exist.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Insert a new expense and return the stored record with its assigned id.
    pub async fn insert_expense(&self, expense: &NewExpense) -> Result<ExpenseRecord> {
        let row = sqlx::query(
            r#"
            INSERT INTO expenses (store_name, amount, purchase_date, paid_by, category, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&expense.store_name)
        .bind(expense.amount)
        .bind(expense.purchase_date.format(DATE_FORMAT).to_string())
        .bind(expense.paid_by.map(|p| p.as_str()))
        .bind(expense.category.map(|c| c.as_str()))
        .bind(expense.created_at.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert expense")?;

        Ok(ExpenseRecord {
            id: row.get("id"),
            store_name: expense.store_name.clone(),
            amount: expense.amount,
            purchase_date: expense.purchase_date,
            paid_by: expense.paid_by,
            category: expense.category,
            created_at: expense.created_at,
        })
    }

    /// Get an expense by id.
    pub async fn get_expense(&self, id: ExpenseId) -> Result<Option<ExpenseRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, store_name, amount, purchase_date, paid_by, category, created_at
            FROM expenses
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch expense")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_expense(&row)?)),
            None => Ok(None),
        }
    }

    /// List expenses within an inclusive date range, newest purchase first.
    /// An empty range is an empty list, not an error.
    pub async fn list_expenses(&self, first: NaiveDate, last: NaiveDate) -> Result<Vec<ExpenseRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, store_name, amount, purchase_date, paid_by, category, created_at
            FROM expenses
            WHERE purchase_date >= ? AND purchase_date <= ?
            ORDER BY purchase_date DESC, id DESC
            "#,
        )
        .bind(first.format(DATE_FORMAT).to_string())
        .bind(last.format(DATE_FORMAT).to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list expenses")?;

        rows.iter().map(Self::row_to_expense).collect()
    }

    /// List every stored expense, newest purchase first.
    pub async fn list_all_expenses(&self) -> Result<Vec<ExpenseRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, store_name, amount, purchase_date, paid_by, category, created_at
            FROM expenses
            ORDER BY purchase_date DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list expenses")?;

        rows.iter().map(Self::row_to_expense).collect()
    }

    /// Delete an expense permanently. Returns false when no row matched.
    pub async fn delete_expense(&self, id: ExpenseId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete expense")?;
        Ok(result.rows_affected() > 0)
    }

    /// Per-payer totals for a date range, computed with SQL aggregation.
    /// Mirrors the in-memory aggregator for export footers and cross-checks.
    pub async fn sum_by_payer(&self, first: NaiveDate, last: NaiveDate) -> Result<(Yen, Yen)> {
        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN paid_by = 'a' THEN amount ELSE 0 END), 0) as total_a,
                COALESCE(SUM(CASE WHEN paid_by = 'b' THEN amount ELSE 0 END), 0) as total_b
            FROM expenses
            WHERE purchase_date >= ? AND purchase_date <= ?
            "#,
        )
        .bind(first.format(DATE_FORMAT).to_string())
        .bind(last.format(DATE_FORMAT).to_string())
        .fetch_one(&self.pool)
        .await
        .context("Failed to sum expenses by payer")?;

        Ok((row.get("total_a"), row.get("total_b")))
    }

    fn row_to_expense(row: &sqlx::sqlite::SqliteRow) -> Result<ExpenseRecord> {
        let purchase_date_str: String = row.get("purchase_date");
        let paid_by_str: Option<String> = row.get("paid_by");
        let category_str: Option<String> = row.get("category");
        let created_at_str: String = row.get("created_at");

        let paid_by = match paid_by_str {
            Some(s) => Some(
                Payer::from_str(&s).ok_or_else(|| anyhow::anyhow!("Invalid payer: {}", s))?,
            ),
            None => None,
        };
        let category = match category_str {
            Some(s) => Some(
                Category::from_str(&s).ok_or_else(|| anyhow::anyhow!("Invalid category: {}", s))?,
            ),
            None => None,
        };

        Ok(ExpenseRecord {
            id: row.get("id"),
            store_name: row.get("store_name"),
            amount: row.get("amount"),
            purchase_date: NaiveDate::parse_from_str(&purchase_date_str, DATE_FORMAT)
                .context("Invalid purchase_date")?,
            paid_by,
            category,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}
