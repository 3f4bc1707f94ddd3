// libs/appointment-cell/src/services/repository.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::InMemoryStore;

use crate::models::{Appointment, AppointmentChanges, AppointmentError, AppointmentStatus};

/// Data access the scheduling core depends on. The in-memory implementation
/// below stands in for a real backend.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Appointments with `start <= scheduled_at <= end`.
    async fn list_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, AppointmentError>;

    async fn list_all(&self) -> Result<Vec<Appointment>, AppointmentError>;

    async fn list_by_animal(&self, animal_id: Uuid) -> Result<Vec<Appointment>, AppointmentError>;

    async fn list_by_veterinarian(
        &self,
        veterinarian_id: Uuid,
    ) -> Result<Vec<Appointment>, AppointmentError>;

    async fn get(&self, id: Uuid) -> Result<Appointment, AppointmentError>;

    async fn set_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError>;

    async fn insert(&self, appointment: Appointment) -> Result<Appointment, AppointmentError>;

    async fn update(
        &self,
        id: Uuid,
        changes: AppointmentChanges,
    ) -> Result<Appointment, AppointmentError>;

    async fn delete(&self, id: Uuid) -> Result<(), AppointmentError>;
}

pub struct InMemoryAppointmentRepository {
    store: InMemoryStore<Appointment>,
}

impl InMemoryAppointmentRepository {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_appointments(config, Vec::new())
    }

    pub fn with_appointments(config: &AppConfig, appointments: Vec<Appointment>) -> Self {
        Self {
            store: InMemoryStore::with_rows("appointments", config, appointments),
        }
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn list_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        debug!("Listing appointments between {} and {}", start, end);
        Ok(self
            .store
            .filter(|a| start <= a.scheduled_at && a.scheduled_at <= end)
            .await)
    }

    async fn list_all(&self) -> Result<Vec<Appointment>, AppointmentError> {
        Ok(self.store.all().await)
    }

    async fn list_by_animal(&self, animal_id: Uuid) -> Result<Vec<Appointment>, AppointmentError> {
        Ok(self.store.filter(|a| a.animal_id == animal_id).await)
    }

    async fn list_by_veterinarian(
        &self,
        veterinarian_id: Uuid,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        Ok(self.store.filter(|a| a.veterinarian_id == veterinarian_id).await)
    }

    async fn get(&self, id: Uuid) -> Result<Appointment, AppointmentError> {
        self.store.find(id).await.ok_or(AppointmentError::NotFound)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError> {
        let now = Utc::now();
        self.store
            .update(id, move |a| {
                a.status = status;
                a.updated_at = now;
            })
            .await
            .ok_or(AppointmentError::NotFound)
    }

    async fn insert(&self, appointment: Appointment) -> Result<Appointment, AppointmentError> {
        Ok(self.store.insert(appointment).await)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: AppointmentChanges,
    ) -> Result<Appointment, AppointmentError> {
        let now = Utc::now();
        self.store
            .update(id, move |a| changes.apply(a, now))
            .await
            .ok_or(AppointmentError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppointmentError> {
        self.store
            .remove(id)
            .await
            .map(|_| ())
            .ok_or(AppointmentError::NotFound)
    }
}
