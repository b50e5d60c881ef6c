use serde::{Deserialize, Serialize};

use super::{ExpenseRecord, Payer, Yen};

/// Per-payer totals and the 50/50 settlement for one month of expenses.
/// Derived on every aggregation, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementResult {
    /// Sum of amounts paid by A
    pub total_a: Yen,
    /// Sum of amounts paid by B
    pub total_b: Yen,
    /// total_a + total_b
    pub total: Yen,
    /// Half of the total, rounded half-up
    pub split: Yen,
    /// total_a - split; the sign decides who owes whom
    pub balance: Yen,
    /// Length of the displayed history, including records with no payer
    pub record_count: usize,
}

/// Interpretation of the settlement balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Nothing to settle
    Even,
    /// B pays this amount to A (A overpaid relative to the split)
    BOwesA(Yen),
    /// A pays this amount to B
    AOwesB(Yen),
}

impl SettlementResult {
    pub fn settlement(&self) -> Settlement {
        if self.balance > 0 {
            Settlement::BOwesA(self.balance)
        } else if self.balance < 0 {
            Settlement::AOwesB(-self.balance)
        } else {
            Settlement::Even
        }
    }
}

/// Aggregate a month's records into per-payer totals and the settlement.
///
/// Records with no payer are excluded from both sums but still counted in
/// `record_count`. The split is half the total rounded half-up; when the
/// total is odd this puts the extra yen on A's notional share, so
/// `total_b - split == -balance` does not hold exactly in that case.
///
/// Pure and deterministic; callers re-run it on every change to the record
/// set (add, delete, month switch).
pub fn aggregate(records: &[ExpenseRecord]) -> SettlementResult {
    let total_a: Yen = records
        .iter()
        .filter(|r| r.paid_by == Some(Payer::A))
        .map(|r| r.amount)
        .sum();
    let total_b: Yen = records
        .iter()
        .filter(|r| r.paid_by == Some(Payer::B))
        .map(|r| r.amount)
        .sum();

    let total = total_a + total_b;
    // Round-half-up; total is never negative since amounts are non-negative
    let split = (total + 1) / 2;

    SettlementResult {
        total_a,
        total_b,
        total,
        split,
        balance: total_a - split,
        record_count: records.len(),
    }
}
