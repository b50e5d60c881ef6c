use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Yen;

/// Expense identifiers are assigned by the store (SQLite AUTOINCREMENT).
pub type ExpenseId = i64;

/// The two participants sharing expenses. A record with no payer still shows
/// up in the history but contributes to neither settlement total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Payer {
    A,
    B,
}

impl Payer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Payer::A => "a",
            Payer::B => "b",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "a" => Some(Payer::A),
            "b" => Some(Payer::B),
            _ => None,
        }
    }

    /// The participant on the other side of the split.
    pub fn other(&self) -> Self {
        match self {
            Payer::A => Payer::B,
            Payer::B => Payer::A,
        }
    }
}

impl std::fmt::Display for Payer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Payer::A => write!(f, "A"),
            Payer::B => write!(f, "B"),
        }
    }
}

/// Expense categories, fixed enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Daily,
    EatOut,
    Transport,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Daily => "daily",
            Category::EatOut => "eatout",
            Category::Transport => "transport",
            Category::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "food" => Some(Category::Food),
            "daily" => Some(Category::Daily),
            "eatout" => Some(Category::EatOut),
            "transport" => Some(Category::Transport),
            "other" => Some(Category::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A saved purchase record. Records are immutable once stored; corrections
/// are made by deleting and re-adding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: ExpenseId,
    /// Store name from the receipt, may be empty when unknown
    pub store_name: String,
    /// Amount in whole yen, never negative
    pub amount: Yen,
    /// When the purchase happened, as printed on the receipt
    pub purchase_date: NaiveDate,
    /// Who fronted the money, if known
    pub paid_by: Option<Payer>,
    pub category: Option<Category>,
    /// When the record was saved, distinct from the purchase date
    pub created_at: DateTime<Utc>,
}

/// An expense as submitted by the user, before the store assigns an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    pub store_name: String,
    pub amount: Yen,
    pub purchase_date: NaiveDate,
    pub paid_by: Option<Payer>,
    pub category: Option<Category>,
    pub created_at: DateTime<Utc>,
}

impl NewExpense {
    pub fn new(store_name: impl Into<String>, amount: Yen, purchase_date: NaiveDate) -> Self {
        Self {
            store_name: store_name.into(),
            amount,
            purchase_date,
            paid_by: None,
            category: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_paid_by(mut self, payer: Payer) -> Self {
        self.paid_by = Some(payer);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }
}
