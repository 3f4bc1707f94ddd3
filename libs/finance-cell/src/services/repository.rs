use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::InMemoryStore;

use crate::models::{FinanceError, LedgerEntry, UpdateEntryRequest};

#[async_trait]
pub trait LedgerRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<LedgerEntry>, FinanceError>;
    async fn get(&self, id: Uuid) -> Result<LedgerEntry, FinanceError>;
    /// Entries dated `start..=end`.
    async fn list_in_period(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LedgerEntry>, FinanceError>;
    async fn insert(&self, entry: LedgerEntry) -> Result<LedgerEntry, FinanceError>;
    async fn update(
        &self,
        id: Uuid,
        changes: UpdateEntryRequest,
    ) -> Result<LedgerEntry, FinanceError>;
    async fn delete(&self, id: Uuid) -> Result<(), FinanceError>;
}

pub struct InMemoryLedgerRepository {
    store: InMemoryStore<LedgerEntry>,
}

impl InMemoryLedgerRepository {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_entries(config, Vec::new())
    }

    pub fn with_entries(config: &AppConfig, entries: Vec<LedgerEntry>) -> Self {
        Self {
            store: InMemoryStore::with_rows("ledger_entries", config, entries),
        }
    }
}

#[async_trait]
impl LedgerRepository for InMemoryLedgerRepository {
    async fn list(&self) -> Result<Vec<LedgerEntry>, FinanceError> {
        Ok(self.store.all().await)
    }

    async fn get(&self, id: Uuid) -> Result<LedgerEntry, FinanceError> {
        self.store.find(id).await.ok_or(FinanceError::NotFound)
    }

    async fn list_in_period(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LedgerEntry>, FinanceError> {
        Ok(self
            .store
            .filter(|entry| start <= entry.date && entry.date <= end)
            .await)
    }

    async fn insert(&self, entry: LedgerEntry) -> Result<LedgerEntry, FinanceError> {
        Ok(self.store.insert(entry).await)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: UpdateEntryRequest,
    ) -> Result<LedgerEntry, FinanceError> {
        let now = Utc::now();
        self.store
            .update(id, move |entry| changes.apply(entry, now))
            .await
            .ok_or(FinanceError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), FinanceError> {
        self.store.remove(id).await.map(|_| ()).ok_or(FinanceError::NotFound)
    }
}
