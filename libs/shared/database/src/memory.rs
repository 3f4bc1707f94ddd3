use std::time::Duration;

use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;

/// A row that can live in an [`InMemoryStore`].
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
}

/// Table-like in-memory storage with simulated round-trip latency.
///
/// Rows keep insertion order. Each call sleeps for the configured latency
/// before touching the rows, the lock is never held across that sleep.
pub struct InMemoryStore<T: Record> {
    table: &'static str,
    latency: Duration,
    rows: RwLock<Vec<T>>,
}

impl<T: Record> InMemoryStore<T> {
    pub fn new(table: &'static str, config: &AppConfig) -> Self {
        Self::with_rows(table, config, Vec::new())
    }

    pub fn with_rows(table: &'static str, config: &AppConfig, rows: Vec<T>) -> Self {
        Self {
            table,
            latency: config.simulated_latency,
            rows: RwLock::new(rows),
        }
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    async fn round_trip(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    pub async fn all(&self) -> Vec<T> {
        self.round_trip().await;
        let rows = self.rows.read().await;
        debug!("Read {} rows from {}", rows.len(), self.table);
        rows.clone()
    }

    pub async fn find(&self, id: Uuid) -> Option<T> {
        self.round_trip().await;
        let rows = self.rows.read().await;
        rows.iter().find(|row| row.id() == id).cloned()
    }

    pub async fn filter<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool + Send,
    {
        self.round_trip().await;
        let rows = self.rows.read().await;
        rows.iter().filter(|row| predicate(row)).cloned().collect()
    }

    pub async fn count(&self) -> usize {
        self.round_trip().await;
        self.rows.read().await.len()
    }

    pub async fn insert(&self, row: T) -> T {
        self.round_trip().await;
        let mut rows = self.rows.write().await;
        debug!("Inserting {} into {}", row.id(), self.table);
        rows.push(row.clone());
        row
    }

    /// Applies `change` to the row with `id` and returns the updated copy.
    pub async fn update<F>(&self, id: Uuid, change: F) -> Option<T>
    where
        F: FnOnce(&mut T) + Send,
    {
        self.round_trip().await;
        let mut rows = self.rows.write().await;
        let row = rows.iter_mut().find(|row| row.id() == id)?;
        change(row);
        debug!("Updated {} in {}", id, self.table);
        Some(row.clone())
    }

    pub async fn remove(&self, id: Uuid) -> Option<T> {
        self.round_trip().await;
        let mut rows = self.rows.write().await;
        let index = rows.iter().position(|row| row.id() == id)?;
        debug!("Removing {} from {}", id, self.table);
        Some(rows.remove(index))
    }
}
