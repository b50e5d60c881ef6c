mod common;

use anyhow::Result;
use common::{expense, test_service};
use warikan::application::AppError;
use warikan::domain::{Category, MonthSelection, Payer};

#[tokio::test]
async fn test_insert_assigns_unique_ids() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let first = service.add_expense(expense("Seiyu", 1200, "2026-08-05")).await?;
    let second = service.add_expense(expense("Lawson", 480, "2026-08-06")).await?;

    assert_ne!(first.id, second.id);

    let fetched = service.get_expense(first.id).await?;
    assert_eq!(fetched.store_name, "Seiyu");
    assert_eq!(fetched.amount, 1200);

    Ok(())
}

#[tokio::test]
async fn test_insert_preserves_all_fields() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let saved = service
        .add_expense(
            expense("Torikizoku", 4200, "2026-08-15")
                .with_paid_by(Payer::B)
                .with_category(Category::EatOut),
        )
        .await?;

    let fetched = service.get_expense(saved.id).await?;
    assert_eq!(fetched.store_name, "Torikizoku");
    assert_eq!(fetched.amount, 4200);
    assert_eq!(fetched.purchase_date.to_string(), "2026-08-15");
    assert_eq!(fetched.paid_by, Some(Payer::B));
    assert_eq!(fetched.category, Some(Category::EatOut));

    Ok(())
}

#[tokio::test]
async fn test_negative_amount_is_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let result = service.add_expense(expense("Seiyu", -100, "2026-08-05")).await;
    assert!(matches!(result, Err(AppError::InvalidExpense(_))));

    Ok(())
}

#[tokio::test]
async fn test_zero_amount_is_allowed() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let saved = service.add_expense(expense("Free sample", 0, "2026-08-05")).await?;
    assert_eq!(saved.amount, 0);

    Ok(())
}

#[tokio::test]
async fn test_list_orders_newest_purchase_first() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let early = service.add_expense(expense("early", 100, "2026-08-03")).await?;
    let late = service.add_expense(expense("late", 300, "2026-08-25")).await?;
    let mid = service.add_expense(expense("mid", 200, "2026-08-14")).await?;

    let month = MonthSelection::new(2026, 8).unwrap();
    let ledger = service.month_ledger(month).await?;

    let ids: Vec<_> = ledger.expenses.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![late.id, mid.id, early.id]);

    Ok(())
}

#[tokio::test]
async fn test_same_day_purchases_order_newest_record_first() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let first = service.add_expense(expense("first", 100, "2026-08-10")).await?;
    let second = service.add_expense(expense("second", 200, "2026-08-10")).await?;

    let month = MonthSelection::new(2026, 8).unwrap();
    let ledger = service.month_ledger(month).await?;

    let ids: Vec<_> = ledger.expenses.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    Ok(())
}

#[tokio::test]
async fn test_month_filter_is_inclusive_on_both_ends() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.add_expense(expense("prev month", 1, "2026-07-31")).await?;
    let first = service.add_expense(expense("first day", 2, "2026-08-01")).await?;
    let last = service.add_expense(expense("last day", 3, "2026-08-31")).await?;
    service.add_expense(expense("next month", 4, "2026-09-01")).await?;

    let month = MonthSelection::new(2026, 8).unwrap();
    let ledger = service.month_ledger(month).await?;

    let ids: Vec<_> = ledger.expenses.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![last.id, first.id]);

    Ok(())
}

#[tokio::test]
async fn test_delete_removes_only_that_record() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let a = service.add_expense(expense("a", 100, "2026-08-01")).await?;
    let b = service.add_expense(expense("b", 200, "2026-08-02")).await?;
    let c = service.add_expense(expense("c", 300, "2026-08-03")).await?;

    let removed = service.delete_expense(b.id).await?;
    assert_eq!(removed.id, b.id);
    assert_eq!(removed.store_name, "b");

    let month = MonthSelection::new(2026, 8).unwrap();
    let ledger = service.month_ledger(month).await?;
    let ids: Vec<_> = ledger.expenses.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![c.id, a.id]);

    Ok(())
}

#[tokio::test]
async fn test_delete_missing_id_is_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let result = service.delete_expense(999).await;
    assert!(matches!(result, Err(AppError::ExpenseNotFound(999))));

    Ok(())
}

#[tokio::test]
async fn test_delete_is_permanent() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let saved = service.add_expense(expense("a", 100, "2026-08-01")).await?;
    service.delete_expense(saved.id).await?;

    let result = service.delete_expense(saved.id).await;
    assert!(matches!(result, Err(AppError::ExpenseNotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_confirmed_delete_applied_to_working_set() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let a = service.add_expense(expense("a", 100, "2026-08-01")).await?;
    let b = service.add_expense(expense("b", 200, "2026-08-02")).await?;

    let month = MonthSelection::new(2026, 8).unwrap();
    let mut ledger = service.month_ledger(month).await?;

    // Optimistic local mutation after the store confirms the delete,
    // no re-fetch needed
    service.delete_expense(a.id).await?;
    let removed = ledger.remove(a.id).unwrap();
    assert_eq!(removed.id, a.id);

    let ids: Vec<_> = ledger.expenses.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![b.id]);

    // The local working set now matches a fresh fetch
    let refetched = service.month_ledger(month).await?;
    let refetched_ids: Vec<_> = refetched.expenses.iter().map(|e| e.id).collect();
    assert_eq!(ids, refetched_ids);

    Ok(())
}

#[tokio::test]
async fn test_month_navigation_to_empty_month() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.add_expense(expense("march", 500, "2026-03-15")).await?;

    let march = MonthSelection::new(2026, 3).unwrap();
    assert_eq!(service.month_ledger(march).await?.len(), 1);

    // Navigating forward to a month with no records is an empty list, not an error
    let april = march.next();
    let ledger = service.month_ledger(april).await?;
    assert!(ledger.is_empty());

    assert_eq!(ledger.month, MonthSelection::new(2026, 4).unwrap());

    Ok(())
}

#[tokio::test]
async fn test_all_expenses_spans_months() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.add_expense(expense("july", 100, "2026-07-10")).await?;
    service.add_expense(expense("august", 200, "2026-08-10")).await?;

    let all = service.all_expenses().await?;
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].store_name, "august");
    assert_eq!(all[1].store_name, "july");

    Ok(())
}
