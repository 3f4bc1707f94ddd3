use std::sync::Arc;

use assert_matches::assert_matches;
use uuid::Uuid;

use finance_cell::{
    Category, CreateEntryRequest, EntryKind, FinanceError, FinanceService,
    InMemoryLedgerRepository, UpdateEntryRequest,
};
use shared_utils::test_utils::{date, TestConfig};

fn service() -> FinanceService {
    let config = TestConfig::default().to_app_config();
    FinanceService::new(Arc::new(InMemoryLedgerRepository::new(&config)))
}

fn revenue(amount: f64, day: u32, category: Category) -> CreateEntryRequest {
    CreateEntryRequest {
        kind: EntryKind::Revenue,
        amount,
        date: date(2024, 11, day),
        description: "Consulta - Rex".to_string(),
        category,
        appointment_id: None,
    }
}

#[tokio::test]
async fn test_amount_must_be_positive() {
    let finance = service();

    assert_matches!(
        finance.create_entry(revenue(0.0, 20, Category::Consultation)).await,
        Err(FinanceError::ValidationError(_))
    );
    assert_matches!(
        finance.create_entry(revenue(-5.0, 20, Category::Consultation)).await,
        Err(FinanceError::ValidationError(_))
    );
    assert!(finance.list_entries().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_period_listing_is_inclusive() {
    let finance = service();
    finance.create_entry(revenue(150.0, 20, Category::Consultation)).await.unwrap();
    finance.create_entry(revenue(80.0, 18, Category::Vaccine)).await.unwrap();
    finance.create_entry(revenue(60.0, 30, Category::Grooming)).await.unwrap();

    let period = finance
        .list_in_period(date(2024, 11, 18), date(2024, 11, 20))
        .await
        .unwrap();
    assert_eq!(period.len(), 2);

    assert_matches!(
        finance.list_in_period(date(2024, 11, 20), date(2024, 11, 18)).await,
        Err(FinanceError::ValidationError(_))
    );
}

#[tokio::test]
async fn test_update_and_delete() {
    let finance = service();
    let entry = finance
        .create_entry(revenue(150.0, 20, Category::Consultation))
        .await
        .unwrap();

    let updated = finance
        .update_entry(
            entry.id,
            UpdateEntryRequest {
                amount: Some(180.0),
                appointment_id: Some(Uuid::from_u128(1)),
                ..UpdateEntryRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.amount, 180.0);
    assert_eq!(updated.appointment_id, Some(Uuid::from_u128(1)));
    assert_eq!(updated.category, Category::Consultation);

    assert_matches!(
        finance
            .update_entry(entry.id, UpdateEntryRequest {
                amount: Some(0.0),
                ..UpdateEntryRequest::default()
            })
            .await,
        Err(FinanceError::ValidationError(_))
    );

    finance.delete_entry(entry.id).await.unwrap();
    assert_matches!(finance.get_entry(entry.id).await, Err(FinanceError::NotFound));
    assert_matches!(finance.delete_entry(entry.id).await, Err(FinanceError::NotFound));
}

#[tokio::test]
async fn test_summary_reads_the_ledger() {
    let finance = service();
    finance.create_entry(revenue(150.0, 20, Category::Consultation)).await.unwrap();
    finance.create_entry(revenue(80.0, 18, Category::Vaccine)).await.unwrap();
    finance
        .create_entry(CreateEntryRequest {
            kind: EntryKind::Expense,
            amount: 500.0,
            date: date(2024, 11, 15),
            description: "Compra de medicamentos".to_string(),
            category: Category::Medication,
            appointment_id: None,
        })
        .await
        .unwrap();

    let summary = finance.summary(date(2024, 11, 25)).await.unwrap();
    assert_eq!(summary.monthly_revenue, 230.0);
    assert_eq!(summary.monthly_expense, 500.0);
    assert_eq!(summary.balance, -270.0);
    assert_eq!(summary.recent_entries.len(), 3);
    assert_eq!(summary.recent_entries[0].date, date(2024, 11, 20));
    assert_eq!(summary.expense_by_category[&Category::Medication], 500.0);
}
