// libs/appointment-cell/src/services/booking.rs
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use auth_cell::UserRepository;
use client_cell::{AnimalRepository, ClientRepository};

use crate::models::{
    AnimalHistory, Appointment, AppointmentChanges, AppointmentError, AppointmentStatus,
    CreateAppointmentRequest, UpdateAppointmentRequest,
};
use crate::services::aggregator::filter_by_status;
use crate::services::repository::AppointmentRepository;

/// Creates and edits appointments. Display names are always resolved from
/// the veterinarian, animal and owner records the ids point at.
pub struct AppointmentBookingService {
    appointments: Arc<dyn AppointmentRepository>,
    animals: Arc<dyn AnimalRepository>,
    clients: Arc<dyn ClientRepository>,
    users: Arc<dyn UserRepository>,
}

struct ResolvedAnimal {
    animal: (Uuid, String),
    owner: (Uuid, String),
}

impl AppointmentBookingService {
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        animals: Arc<dyn AnimalRepository>,
        clients: Arc<dyn ClientRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            appointments,
            animals,
            clients,
            users,
        }
    }

    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        info!(
            "Booking appointment for animal {} with veterinarian {} at {}",
            request.animal_id, request.veterinarian_id, request.scheduled_at
        );

        validate_reason(&request.reason)?;
        validate_amount(request.total_amount)?;

        let veterinarian = self.resolve_veterinarian(request.veterinarian_id).await?;
        let resolved = self.resolve_animal(request.animal_id).await?;

        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            scheduled_at: request.scheduled_at,
            veterinarian_id: veterinarian.0,
            veterinarian_name: veterinarian.1,
            animal_id: resolved.animal.0,
            animal_name: resolved.animal.1,
            owner_id: resolved.owner.0,
            owner_name: resolved.owner.1,
            reason: request.reason.trim().to_string(),
            clinical_notes: request.clinical_notes,
            diagnosis: request.diagnosis,
            prescription: request.prescription,
            status: AppointmentStatus::Scheduled,
            total_amount: request.total_amount,
            created_at: now,
            updated_at: now,
        };

        let appointment = self.appointments.insert(appointment).await?;
        info!("Appointment {} booked", appointment.id);
        Ok(appointment)
    }

    pub async fn get_appointment(&self, id: Uuid) -> Result<Appointment, AppointmentError> {
        debug!("Fetching appointment {}", id);
        self.appointments.get(id).await
    }

    /// Listing for the appointments page; `None` lists every status.
    pub async fn list_appointments(
        &self,
        status: Option<AppointmentStatus>,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let appointments = self.appointments.list_all().await?;
        Ok(filter_by_status(&appointments, status)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn list_by_animal(&self, animal_id: Uuid) -> Result<Vec<Appointment>, AppointmentError> {
        self.appointments.list_by_animal(animal_id).await
    }

    pub async fn list_by_veterinarian(
        &self,
        veterinarian_id: Uuid,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        self.appointments.list_by_veterinarian(veterinarian_id).await
    }

    /// Applies a partial edit. Changing the animal also moves the owner to
    /// the new animal's owner.
    pub async fn update_appointment(
        &self,
        id: Uuid,
        request: UpdateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Updating appointment {}", id);

        self.appointments.get(id).await?;

        if let Some(reason) = &request.reason {
            validate_reason(reason)?;
        }
        if let Some(amount) = request.total_amount {
            validate_amount(amount)?;
        }

        let mut changes = AppointmentChanges {
            scheduled_at: request.scheduled_at,
            reason: request.reason.map(|r| r.trim().to_string()),
            clinical_notes: request.clinical_notes,
            diagnosis: request.diagnosis,
            prescription: request.prescription,
            total_amount: request.total_amount,
            ..AppointmentChanges::default()
        };

        if let Some(veterinarian_id) = request.veterinarian_id {
            changes.veterinarian = Some(self.resolve_veterinarian(veterinarian_id).await?);
        }
        if let Some(animal_id) = request.animal_id {
            let resolved = self.resolve_animal(animal_id).await?;
            changes.animal = Some(resolved.animal);
            changes.owner = Some(resolved.owner);
        }

        let appointment = self.appointments.update(id, changes).await?;
        info!("Appointment {} updated", id);
        Ok(appointment)
    }

    pub async fn set_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self.appointments.set_status(id, status).await?;
        info!("Appointment {} is now {}", id, status);
        Ok(appointment)
    }

    pub async fn delete_appointment(&self, id: Uuid) -> Result<(), AppointmentError> {
        self.appointments.delete(id).await?;
        info!("Appointment {} deleted", id);
        Ok(())
    }

    /// Visit history of one animal relative to `now`.
    pub async fn animal_history(
        &self,
        animal_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<AnimalHistory, AppointmentError> {
        self.animals.get(animal_id).await?;
        let appointments = self.appointments.list_by_animal(animal_id).await?;

        let completed: Vec<_> = appointments
            .iter()
            .filter(|a| a.status == AppointmentStatus::Completed)
            .collect();

        Ok(AnimalHistory {
            animal_id,
            total_appointments: appointments.len(),
            completed_appointments: completed.len(),
            last_visit: completed
                .iter()
                .map(|a| a.scheduled_at)
                .filter(|at| *at <= now)
                .max(),
            next_appointment: appointments
                .iter()
                .filter(|a| a.status == AppointmentStatus::Scheduled && a.scheduled_at > now)
                .map(|a| a.scheduled_at)
                .min(),
        })
    }

    async fn resolve_veterinarian(&self, id: Uuid) -> Result<(Uuid, String), AppointmentError> {
        let account = self.users.get(id).await.map_err(|e| {
            warn!("Veterinarian {} lookup failed: {}", id, e);
            AppointmentError::VeterinarianNotFound
        })?;

        if !account.user.active {
            warn!("Veterinarian {} is inactive", id);
            return Err(AppointmentError::VeterinarianNotFound);
        }

        Ok((account.user.id, account.user.name))
    }

    async fn resolve_animal(&self, id: Uuid) -> Result<ResolvedAnimal, AppointmentError> {
        let animal = self.animals.get(id).await?;
        let owner = self
            .clients
            .get(animal.owner_id)
            .await
            .map_err(|_| AppointmentError::OwnerNotFound)?;

        Ok(ResolvedAnimal {
            animal: (animal.id, animal.name),
            owner: (owner.id, owner.full_name),
        })
    }
}

fn validate_reason(reason: &str) -> Result<(), AppointmentError> {
    if reason.trim().is_empty() {
        return Err(AppointmentError::ValidationError("Reason is required".to_string()));
    }
    Ok(())
}

fn validate_amount(amount: f64) -> Result<(), AppointmentError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(AppointmentError::ValidationError(format!(
            "Total amount must be a non-negative number, got {}",
            amount
        )));
    }
    Ok(())
}
