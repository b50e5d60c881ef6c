use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use crate::analysis::{HttpAnalyzer, ReceiptAnalyzer, ReceiptGuess};
use crate::application::{ExpenseService, MonthReport};
use crate::domain::{
    format_yen, parse_yen, Category, ExpenseRecord, MonthSelection, NewExpense, Payer, Settlement,
};

/// Warikan - Shared Expense Tracker
#[derive(Parser)]
#[command(name = "warikan")]
#[command(about = "A receipt-driven shared-expense tracker with monthly 50/50 settlement")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "warikan.db")]
    pub database: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Record an expense
    Add {
        /// Amount in yen (e.g., "1200" or "¥1,200")
        amount: String,

        /// Store name from the receipt
        #[arg(short, long, default_value = "")]
        store: String,

        /// Purchase date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Who paid: a or b
        #[arg(short, long)]
        paid_by: Option<String>,

        /// Category: food, daily, eatout, transport, other
        #[arg(short, long)]
        category: Option<String>,
    },

    /// List a month's expenses
    List {
        /// Month to list (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Delete an expense permanently
    Delete {
        /// Expense id
        id: i64,
    },

    /// Show the monthly settlement report
    Settle {
        /// Month to settle (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Go back this many months from the selected month
        #[arg(long, default_value = "0")]
        back: u32,

        /// Go forward this many months from the selected month
        #[arg(long, default_value = "0")]
        forward: u32,
    },

    /// Analyze a receipt image and optionally save the result
    Scan {
        /// Path to the receipt image
        image: String,

        /// Receipt analysis endpoint URL
        #[arg(long, env = "WARIKAN_ANALYZE_URL")]
        endpoint: String,

        /// MIME type of the image (inferred from the extension if omitted)
        #[arg(long)]
        mime: Option<String>,

        /// Override the guessed store name
        #[arg(long)]
        store: Option<String>,

        /// Override the guessed amount
        #[arg(long)]
        amount: Option<String>,

        /// Override the guessed date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Who paid: a or b
        #[arg(short, long)]
        paid_by: Option<String>,

        /// Category: food, daily, eatout, transport, other
        #[arg(short, long)]
        category: Option<String>,

        /// Save the (corrected) result instead of just printing it
        #[arg(long)]
        save: bool,
    },

    /// Export expenses to CSV
    Export {
        /// Month to export (YYYY-MM, omit for all expenses)
        #[arg(short, long)]
        month: Option<String>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                ExpenseService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Add {
                amount,
                store,
                date,
                paid_by,
                category,
            } => {
                let service = ExpenseService::connect(&self.database).await?;
                let amount =
                    parse_yen(&amount).context("Invalid amount format. Use '1200' or '¥1,200'")?;
                let purchase_date = parse_date_or_today(date.as_deref())?;

                let mut expense = NewExpense::new(store, amount, purchase_date);
                if let Some(payer) = paid_by.as_deref().map(parse_payer).transpose()? {
                    expense = expense.with_paid_by(payer);
                }
                if let Some(cat) = category.as_deref().map(parse_category).transpose()? {
                    expense = expense.with_category(cat);
                }

                let saved = service.add_expense(expense).await?;
                println!(
                    "Recorded expense #{}: {} on {} ({})",
                    saved.id,
                    format_yen(saved.amount),
                    saved.purchase_date,
                    saved
                        .paid_by
                        .map(|p| format!("paid by {}", p))
                        .unwrap_or_else(|| "payer unknown".to_string())
                );
            }

            Commands::List { month } => {
                let service = ExpenseService::connect(&self.database).await?;
                let month = parse_month_or_current(month.as_deref())?;
                let ledger = service.month_ledger(month).await?;

                if ledger.is_empty() {
                    println!("No expenses recorded for {}.", month);
                } else {
                    println!("Expenses for {} ({} records)", month, ledger.len());
                    print_expense_table(&ledger.expenses);
                }
            }

            Commands::Delete { id } => {
                let service = ExpenseService::connect(&self.database).await?;
                let removed = service.delete_expense(id).await?;
                println!(
                    "Deleted expense #{}: {} {} ({})",
                    removed.id,
                    format_yen(removed.amount),
                    if removed.store_name.is_empty() {
                        "(no store)"
                    } else {
                        &removed.store_name
                    },
                    removed.purchase_date
                );
            }

            Commands::Settle {
                month,
                back,
                forward,
            } => {
                let service = ExpenseService::connect(&self.database).await?;
                let mut month = parse_month_or_current(month.as_deref())?;
                for _ in 0..back {
                    month = month.prev();
                }
                for _ in 0..forward {
                    month = month.next();
                }

                let report = service.month_report(month).await?;
                print_settlement(&report);
            }

            Commands::Scan {
                image,
                endpoint,
                mime,
                store,
                amount,
                date,
                paid_by,
                category,
                save,
            } => {
                let bytes = std::fs::read(&image)
                    .with_context(|| format!("Failed to read image file: {}", image))?;
                let mime = mime.unwrap_or_else(|| infer_mime(&image).to_string());

                let analyzer = HttpAnalyzer::new(endpoint);
                let guess = analyzer.analyze(&bytes, &mime).await?;

                // Manual corrections take priority over whatever the analyzer guessed
                let store_name = store.unwrap_or_else(|| guess.store.clone());
                let amount = match amount {
                    Some(a) => Some(
                        parse_yen(&a).context("Invalid amount format. Use '1200' or '¥1,200'")?,
                    ),
                    None => guess.amount,
                };
                let purchase_date = match date {
                    Some(d) => parse_date(&d)?,
                    None => guess.date.unwrap_or_else(|| Local::now().date_naive()),
                };

                print_guess(&guess, &store_name, amount, purchase_date);

                if save {
                    let Some(amount) = amount else {
                        anyhow::bail!(
                            "No amount was recognized. Re-run with --amount to set it manually."
                        );
                    };

                    let service = ExpenseService::connect(&self.database).await?;
                    let mut expense = NewExpense::new(store_name, amount, purchase_date);
                    if let Some(payer) = paid_by.as_deref().map(parse_payer).transpose()? {
                        expense = expense.with_paid_by(payer);
                    }
                    if let Some(cat) = category.as_deref().map(parse_category).transpose()? {
                        expense = expense.with_category(cat);
                    }

                    let saved = service.add_expense(expense).await?;
                    println!("Saved as expense #{}", saved.id);
                } else {
                    println!("Re-run with --save (and any corrections) to record it.");
                }
            }

            Commands::Export { month, output } => {
                use crate::io::Exporter;
                use std::fs::File;
                use std::io::{stdout, Write};

                let service = ExpenseService::connect(&self.database).await?;
                let month = month
                    .as_deref()
                    .map(parse_month)
                    .transpose()?;

                let writer: Box<dyn Write> = match &output {
                    Some(path) => {
                        let file = File::create(path)
                            .with_context(|| format!("Failed to create output file: {}", path))?;
                        Box::new(file)
                    }
                    None => Box::new(stdout()),
                };

                let exporter = Exporter::new(&service);
                let count = exporter.export_expenses_csv(writer, month).await?;
                if output.is_some() {
                    eprintln!("Exported {} expenses", count);
                    if let Some(month) = month {
                        let (total_a, total_b) = service.payer_totals(month).await?;
                        eprintln!(
                            "Totals for {}: A {} / B {}",
                            month,
                            format_yen(total_a),
                            format_yen(total_b)
                        );
                    }
                }
            }
        }

        Ok(())
    }
}

fn parse_month(input: &str) -> Result<MonthSelection> {
    input
        .parse()
        .with_context(|| format!("Invalid month '{}'. Use YYYY-MM", input))
}

fn parse_month_or_current(input: Option<&str>) -> Result<MonthSelection> {
    match input {
        Some(s) => parse_month(s),
        None => Ok(MonthSelection::current()),
    }
}

fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", input))
}

fn parse_date_or_today(input: Option<&str>) -> Result<NaiveDate> {
    match input {
        Some(s) => parse_date(s),
        None => Ok(Local::now().date_naive()),
    }
}

fn parse_payer(input: &str) -> Result<Payer> {
    Payer::from_str(input)
        .ok_or_else(|| anyhow::anyhow!("Invalid payer '{}'. Valid payers: a, b", input))
}

fn parse_category(input: &str) -> Result<Category> {
    Category::from_str(input).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid category '{}'. Valid categories: food, daily, eatout, transport, other",
            input
        )
    })
}

fn infer_mime(path: &str) -> &'static str {
    match path.rsplit('.').next().map(|ext| ext.to_lowercase()) {
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

fn print_expense_table(expenses: &[ExpenseRecord]) {
    println!(
        "{:<6} {:<12} {:<24} {:>12} {:<6} {:<10}",
        "ID", "DATE", "STORE", "AMOUNT", "PAYER", "CATEGORY"
    );
    println!("{}", "-".repeat(76));
    for expense in expenses {
        println!(
            "{:<6} {:<12} {:<24} {:>12} {:<6} {:<10}",
            expense.id,
            expense.purchase_date.to_string(),
            if expense.store_name.is_empty() {
                "(no store)"
            } else {
                &expense.store_name
            },
            format_yen(expense.amount),
            expense
                .paid_by
                .map(|p| p.to_string())
                .unwrap_or_else(|| "?".to_string()),
            expense
                .category
                .map(|c| c.to_string())
                .unwrap_or_default(),
        );
    }
}

fn print_settlement(report: &MonthReport) {
    let result = &report.result;

    println!("Settlement for {}", report.ledger.month);
    println!("  A paid:      {}", format_yen(result.total_a));
    println!("  B paid:      {}", format_yen(result.total_b));
    println!("  Total:       {}", format_yen(result.total));
    println!("  Per person:  {}", format_yen(result.split));
    println!();
    match result.settlement() {
        Settlement::Even => println!("  Nothing to settle."),
        Settlement::BOwesA(amount) => println!("  B pays A {}", format_yen(amount)),
        Settlement::AOwesB(amount) => println!("  A pays B {}", format_yen(amount)),
    }
    println!();

    if report.ledger.is_empty() {
        println!("No expenses recorded for {}.", report.ledger.month);
    } else {
        println!("History ({} records)", result.record_count);
        print_expense_table(&report.ledger.expenses);
    }
}

fn print_guess(
    guess: &ReceiptGuess,
    store_name: &str,
    amount: Option<i64>,
    purchase_date: NaiveDate,
) {
    println!("Receipt analysis result:");
    println!(
        "  Store:   {}{}",
        if store_name.is_empty() {
            "(not recognized)"
        } else {
            store_name
        },
        if guess.store != store_name {
            " (corrected)"
        } else {
            ""
        }
    );
    println!("  Date:    {}", purchase_date);
    match amount {
        Some(amount) => println!("  Amount:  {}", format_yen(amount)),
        None => println!("  Amount:  (not recognized)"),
    }
}
