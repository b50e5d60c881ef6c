use super::{aggregate, ExpenseId, ExpenseRecord, MonthSelection, SettlementResult};

/// The in-memory working set for one month: the fetched records in display
/// order (purchase date descending). Deletes confirmed by the store are
/// applied locally without a re-fetch; the settlement is recomputed from
/// whatever the set currently holds.
#[derive(Debug, Clone)]
pub struct MonthLedger {
    pub month: MonthSelection,
    pub expenses: Vec<ExpenseRecord>,
}

impl MonthLedger {
    pub fn new(month: MonthSelection, expenses: Vec<ExpenseRecord>) -> Self {
        Self { month, expenses }
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Remove exactly the record with the given id, preserving the order of
    /// the rest. Returns the removed record, or None if the id is not in the
    /// working set.
    pub fn remove(&mut self, id: ExpenseId) -> Option<ExpenseRecord> {
        let pos = self.expenses.iter().position(|e| e.id == id)?;
        Some(self.expenses.remove(pos))
    }

    /// Recompute the settlement over the current working set.
    pub fn settle(&self) -> SettlementResult {
        aggregate(&self.expenses)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{Payer, Yen};

    fn record(id: ExpenseId, amount: Yen, day: u32) -> ExpenseRecord {
        ExpenseRecord {
            id,
            store_name: format!("store-{}", id),
            amount,
            purchase_date: NaiveDate::from_ymd_opt(2026, 8, day).unwrap(),
            paid_by: Some(Payer::A),
            category: None,
            created_at: chrono::Utc::now(),
        }
    }

    fn ledger() -> MonthLedger {
        let month = MonthSelection::new(2026, 8).unwrap();
        MonthLedger::new(
            month,
            vec![record(3, 300, 20), record(2, 200, 15), record(1, 100, 10)],
        )
    }

    #[test]
    fn test_remove_keeps_order_of_others() {
        let mut ledger = ledger();
        let removed = ledger.remove(2).unwrap();

        assert_eq!(removed.id, 2);
        let ids: Vec<_> = ledger.expenses.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let mut ledger = ledger();
        assert!(ledger.remove(99).is_none());
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_settle_tracks_removals() {
        let mut ledger = ledger();
        assert_eq!(ledger.settle().total_a, 600);

        ledger.remove(3);
        assert_eq!(ledger.settle().total_a, 300);
        assert_eq!(ledger.settle().record_count, 2);
    }
}
