use anyhow::Result;
use std::io::Write;

use crate::application::ExpenseService;
use crate::domain::{ExpenseRecord, MonthSelection};

/// Exporter for writing expense data as CSV.
pub struct Exporter<'a> {
    service: &'a ExpenseService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a ExpenseService) -> Self {
        Self { service }
    }

    /// Export one month's expenses (or everything) to CSV.
    /// Returns the number of rows written.
    pub async fn export_expenses_csv<W: Write>(
        &self,
        writer: W,
        month: Option<MonthSelection>,
    ) -> Result<usize> {
        let expenses = match month {
            Some(month) => self.service.month_ledger(month).await?.expenses,
            None => self.service.all_expenses().await?,
        };

        write_expense_rows(writer, &expenses)
    }
}

fn write_expense_rows<W: Write>(writer: W, expenses: &[ExpenseRecord]) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record([
        "id",
        "purchase_date",
        "store_name",
        "amount",
        "paid_by",
        "category",
    ])?;

    let mut count = 0;
    for expense in expenses {
        csv_writer.write_record([
            expense.id.to_string(),
            expense.purchase_date.to_string(),
            expense.store_name.clone(),
            expense.amount.to_string(),
            expense
                .paid_by
                .map(|p| p.as_str().to_string())
                .unwrap_or_default(),
            expense
                .category
                .map(|c| c.as_str().to_string())
                .unwrap_or_default(),
        ])?;
        count += 1;
    }

    csv_writer.flush()?;
    Ok(count)
}
