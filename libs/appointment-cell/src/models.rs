// libs/appointment-cell/src/models.rs
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use client_cell::ClientError;
use shared_config::AppConfig;
use shared_database::Record;
use shared_models::AppError;

/// Every agenda slot is booked for this long.
pub const SLOT_DURATION_MINUTES: i64 = 30;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub veterinarian_id: Uuid,
    pub veterinarian_name: String,
    pub animal_id: Uuid,
    pub animal_name: String,
    pub owner_id: Uuid,
    pub owner_name: String,
    pub reason: String,
    pub clinical_notes: Option<String>,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub status: AppointmentStatus,
    pub total_amount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn scheduled_end_time(&self) -> DateTime<Utc> {
        self.scheduled_at + Duration::minutes(SLOT_DURATION_MINUTES)
    }
}

impl Record for Appointment {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::NoShow,
    ];
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::NoShow => write!(f, "no_show"),
        }
    }
}

// ==============================================================================
// SCHEDULING WINDOW MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Day,
    #[default]
    Week,
    Month,
}

/// A granularity plus an anchor date, evaluated in the clinic's UTC offset.
///
/// The covered range is derived on demand, see `services::period`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulingWindow {
    pub granularity: Granularity,
    pub anchor: NaiveDate,
    pub week_starts_on: Weekday,
    pub utc_offset: FixedOffset,
    /// Day of month month-stepping aims for; survives clamping to short months.
    pub(crate) preferred_day: u32,
}

impl SchedulingWindow {
    pub fn new(
        granularity: Granularity,
        anchor: NaiveDate,
        week_starts_on: Weekday,
        utc_offset: FixedOffset,
    ) -> Self {
        Self {
            granularity,
            anchor,
            week_starts_on,
            utc_offset,
            preferred_day: anchor.day(),
        }
    }

    pub fn from_config(granularity: Granularity, anchor: NaiveDate, config: &AppConfig) -> Self {
        Self::new(granularity, anchor, config.week_starts_on, config.utc_offset)
    }
}

/// Per-status counts of a list of appointments. Always derived, never stored.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusTally {
    pub scheduled: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub no_show: usize,
}

impl StatusTally {
    pub fn record(&mut self, status: AppointmentStatus) {
        match status {
            AppointmentStatus::Scheduled => self.scheduled += 1,
            AppointmentStatus::Completed => self.completed += 1,
            AppointmentStatus::Cancelled => self.cancelled += 1,
            AppointmentStatus::NoShow => self.no_show += 1,
        }
    }

    pub fn count(&self, status: AppointmentStatus) -> usize {
        match status {
            AppointmentStatus::Scheduled => self.scheduled,
            AppointmentStatus::Completed => self.completed,
            AppointmentStatus::Cancelled => self.cancelled,
            AppointmentStatus::NoShow => self.no_show,
        }
    }

    pub fn total(&self) -> usize {
        self.scheduled + self.completed + self.cancelled + self.no_show
    }
}

/// Compact agenda row used by the calendar view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgendaEntry {
    pub id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub veterinarian_name: String,
    pub animal_name: String,
    pub owner_name: String,
    pub status: AppointmentStatus,
    pub duration_minutes: i64,
}

impl AgendaEntry {
    pub fn title(&self) -> String {
        format!("{} - {}", self.animal_name, self.owner_name)
    }

    pub fn subtitle(&self) -> &str {
        &self.veterinarian_name
    }
}

impl From<&Appointment> for AgendaEntry {
    fn from(appointment: &Appointment) -> Self {
        Self {
            id: appointment.id,
            scheduled_at: appointment.scheduled_at,
            veterinarian_name: appointment.veterinarian_name.clone(),
            animal_name: appointment.animal_name.clone(),
            owner_name: appointment.owner_name.clone(),
            status: appointment.status,
            duration_minutes: SLOT_DURATION_MINUTES,
        }
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub scheduled_at: DateTime<Utc>,
    pub veterinarian_id: Uuid,
    pub animal_id: Uuid,
    pub reason: String,
    pub clinical_notes: Option<String>,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub total_amount: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub scheduled_at: Option<DateTime<Utc>>,
    pub veterinarian_id: Option<Uuid>,
    pub animal_id: Option<Uuid>,
    pub reason: Option<String>,
    pub clinical_notes: Option<String>,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub total_amount: Option<f64>,
}

/// Resolved field changes handed to the repository. Display names are
/// already looked up, so storage never invents them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentChanges {
    pub scheduled_at: Option<DateTime<Utc>>,
    pub veterinarian: Option<(Uuid, String)>,
    pub animal: Option<(Uuid, String)>,
    pub owner: Option<(Uuid, String)>,
    pub reason: Option<String>,
    pub clinical_notes: Option<String>,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub total_amount: Option<f64>,
}

impl AppointmentChanges {
    pub fn apply(self, appointment: &mut Appointment, now: DateTime<Utc>) {
        if let Some(scheduled_at) = self.scheduled_at {
            appointment.scheduled_at = scheduled_at;
        }
        if let Some((id, name)) = self.veterinarian {
            appointment.veterinarian_id = id;
            appointment.veterinarian_name = name;
        }
        if let Some((id, name)) = self.animal {
            appointment.animal_id = id;
            appointment.animal_name = name;
        }
        if let Some((id, name)) = self.owner {
            appointment.owner_id = id;
            appointment.owner_name = name;
        }
        if let Some(reason) = self.reason {
            appointment.reason = reason;
        }
        if let Some(notes) = self.clinical_notes {
            appointment.clinical_notes = Some(notes);
        }
        if let Some(diagnosis) = self.diagnosis {
            appointment.diagnosis = Some(diagnosis);
        }
        if let Some(prescription) = self.prescription {
            appointment.prescription = Some(prescription);
        }
        if let Some(total_amount) = self.total_amount {
            appointment.total_amount = total_amount;
        }
        appointment.updated_at = now;
    }
}

/// Consultation history of one animal, derived from its appointments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnimalHistory {
    pub animal_id: Uuid,
    pub total_appointments: usize,
    pub completed_appointments: usize,
    pub last_visit: Option<DateTime<Utc>>,
    pub next_appointment: Option<DateTime<Utc>>,
}

// ==============================================================================
// ERROR MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Animal not found")]
    AnimalNotFound,

    #[error("Client not found")]
    OwnerNotFound,

    #[error("Veterinarian not found")]
    VeterinarianNotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<ClientError> for AppointmentError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::AnimalNotFound => AppointmentError::AnimalNotFound,
            ClientError::NotFound => AppointmentError::OwnerNotFound,
            ClientError::ValidationError(msg) => AppointmentError::ValidationError(msg),
            ClientError::HasAnimals { .. } => AppointmentError::StorageError(err.to_string()),
        }
    }
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound
            | AppointmentError::AnimalNotFound
            | AppointmentError::OwnerNotFound
            | AppointmentError::VeterinarianNotFound => AppError::NotFound(err.to_string()),
            AppointmentError::ValidationError(_) => AppError::ValidationError(err.to_string()),
            AppointmentError::StorageError(msg) => AppError::Storage(msg),
        }
    }
}
