use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{
    CreateEntryRequest, FinanceError, FinancialSummary, LedgerEntry, UpdateEntryRequest,
};
use crate::services::repository::LedgerRepository;
use crate::services::summary::summarize;

pub struct FinanceService {
    ledger: Arc<dyn LedgerRepository>,
}

impl FinanceService {
    pub fn new(ledger: Arc<dyn LedgerRepository>) -> Self {
        Self { ledger }
    }

    pub async fn create_entry(&self, request: CreateEntryRequest) -> Result<LedgerEntry, FinanceError> {
        debug!("Recording {} of {:.2}", request.kind, request.amount);

        validate_amount(request.amount)?;
        validate_description(&request.description)?;

        let now = Utc::now();
        let entry = LedgerEntry {
            id: Uuid::new_v4(),
            kind: request.kind,
            amount: request.amount,
            date: request.date,
            description: request.description.trim().to_string(),
            category: request.category,
            appointment_id: request.appointment_id,
            created_at: now,
            updated_at: now,
        };

        let entry = self.ledger.insert(entry).await?;
        info!("Ledger entry {} recorded", entry.id);
        Ok(entry)
    }

    pub async fn get_entry(&self, id: Uuid) -> Result<LedgerEntry, FinanceError> {
        self.ledger.get(id).await
    }

    pub async fn list_entries(&self) -> Result<Vec<LedgerEntry>, FinanceError> {
        self.ledger.list().await
    }

    /// Entries dated between `start` and `end`, both inclusive.
    pub async fn list_in_period(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LedgerEntry>, FinanceError> {
        if end < start {
            return Err(FinanceError::ValidationError(format!(
                "Period end {} is before its start {}",
                end, start
            )));
        }
        self.ledger.list_in_period(start, end).await
    }

    pub async fn update_entry(
        &self,
        id: Uuid,
        request: UpdateEntryRequest,
    ) -> Result<LedgerEntry, FinanceError> {
        if let Some(amount) = request.amount {
            validate_amount(amount)?;
        }
        if let Some(description) = &request.description {
            validate_description(description)?;
        }

        let entry = self.ledger.update(id, request).await?;
        info!("Ledger entry {} updated", id);
        Ok(entry)
    }

    pub async fn delete_entry(&self, id: Uuid) -> Result<(), FinanceError> {
        self.ledger.delete(id).await?;
        info!("Ledger entry {} deleted", id);
        Ok(())
    }

    pub async fn summary(&self, today: NaiveDate) -> Result<FinancialSummary, FinanceError> {
        let entries = self.ledger.list().await?;
        Ok(summarize(&entries, today))
    }
}

fn validate_amount(amount: f64) -> Result<(), FinanceError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(FinanceError::ValidationError(format!(
            "Amount must be greater than zero, got {}",
            amount
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), FinanceError> {
    if description.trim().is_empty() {
        return Err(FinanceError::ValidationError(
            "Description is required".to_string(),
        ));
    }
    Ok(())
}
