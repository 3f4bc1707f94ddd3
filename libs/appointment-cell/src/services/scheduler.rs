// libs/appointment-cell/src/services/scheduler.rs
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::{AppConfig, Locale};
use shared_models::AppError;

use crate::models::{
    Appointment, AppointmentError, AppointmentStatus, Granularity, SchedulingWindow, StatusTally,
};
use crate::services::aggregator::{filter_by_window, tally};
use crate::services::period::{
    advance, change_granularity, clinic_today, reset_to_today, retreat, title_for,
};
use crate::services::repository::AppointmentRepository;

/// Point-in-time copy of the agenda view. The tally is counted from
/// `appointments` when the snapshot is taken.
#[derive(Debug, Clone, Serialize)]
pub struct SchedulerSnapshot {
    pub granularity: Granularity,
    pub anchor: NaiveDate,
    #[serde(skip)]
    pub window: SchedulingWindow,
    pub appointments: Vec<Appointment>,
    pub loading: bool,
    pub error: Option<String>,
    pub selected: Option<Appointment>,
    pub title: String,
    pub tally: StatusTally,
}

/// What happened to a `load_window` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Failed,
    /// A newer load was issued while this one was in flight; the response was dropped.
    Stale,
}

struct SchedulerState {
    window: SchedulingWindow,
    appointments: Vec<Appointment>,
    error: Option<String>,
    selected: Option<Appointment>,
    latest_load: u64,
    load_pending: bool,
    selects_pending: usize,
}

/// Agenda view state: the current window, what was loaded for it, the
/// selected appointment and the last error.
///
/// The state lock is only held between awaits, never across a repository call.
pub struct AppointmentScheduler {
    repository: Arc<dyn AppointmentRepository>,
    locale: Locale,
    state: Mutex<SchedulerState>,
}

impl AppointmentScheduler {
    /// Week view anchored at the clinic's current date.
    pub fn new(repository: Arc<dyn AppointmentRepository>, config: &AppConfig) -> Self {
        let window = SchedulingWindow::from_config(
            Granularity::default(),
            clinic_today(config.utc_offset),
            config,
        );
        Self::with_window(repository, window, config.locale)
    }

    pub fn with_window(
        repository: Arc<dyn AppointmentRepository>,
        window: SchedulingWindow,
        locale: Locale,
    ) -> Self {
        Self {
            repository,
            locale,
            state: Mutex::new(SchedulerState {
                window,
                appointments: Vec::new(),
                error: None,
                selected: None,
                latest_load: 0,
                load_pending: false,
                selects_pending: 0,
            }),
        }
    }

    /// Fetches the appointments of the current window. Only the most recently
    /// issued load may write its result; older responses are discarded.
    pub async fn load_window(&self) -> LoadOutcome {
        let (token, window) = {
            let mut state = self.state.lock().await;
            state.latest_load += 1;
            state.load_pending = true;
            (state.latest_load, state.window.clone())
        };

        debug!(
            "Loading {:?} window {} - {} (request {})",
            window.granularity,
            window.first_day(),
            window.last_day(),
            token
        );

        let result = self
            .repository
            .list_in_range(window.start(), window.end())
            .await;

        let mut state = self.state.lock().await;
        if state.latest_load != token {
            debug!("Dropping stale window response {} (latest {})", token, state.latest_load);
            return LoadOutcome::Stale;
        }
        state.load_pending = false;

        match result {
            Ok(appointments) => {
                state.appointments = filter_by_window(&appointments, &window)
                    .into_iter()
                    .cloned()
                    .collect();
                state.error = None;
                info!("Loaded {} appointments", state.appointments.len());
                LoadOutcome::Applied
            }
            Err(err) => {
                warn!("Failed to load appointments: {}", err);
                state.error = Some(user_message(err));
                LoadOutcome::Failed
            }
        }
    }

    pub async fn set_granularity(&self, granularity: Granularity) {
        let mut state = self.state.lock().await;
        state.window = change_granularity(&state.window, granularity);
    }

    pub async fn next(&self) {
        let mut state = self.state.lock().await;
        state.window = advance(&state.window);
    }

    pub async fn previous(&self) {
        let mut state = self.state.lock().await;
        state.window = retreat(&state.window);
    }

    /// Re-anchors on the clinic's current date.
    pub async fn today(&self) {
        let mut state = self.state.lock().await;
        let today = clinic_today(state.window.utc_offset);
        state.window = reset_to_today(&state.window, today);
    }

    /// Re-anchors on an explicit date, keeping the granularity.
    pub async fn go_to(&self, date: NaiveDate) {
        let mut state = self.state.lock().await;
        state.window = reset_to_today(&state.window, date);
    }

    /// On failure the previous selection stays in place and `error` is set.
    /// A successful selection clears any earlier error.
    pub async fn select_appointment(&self, id: Uuid) -> Result<Appointment, AppointmentError> {
        self.state.lock().await.selects_pending += 1;

        let result = self.repository.get(id).await;

        let mut state = self.state.lock().await;
        state.selects_pending = state.selects_pending.saturating_sub(1);
        match result {
            Ok(appointment) => {
                state.selected = Some(appointment.clone());
                state.error = None;
                Ok(appointment)
            }
            Err(err) => {
                warn!("Failed to select appointment {}: {}", id, err);
                state.error = Some(user_message(err.clone()));
                Err(err)
            }
        }
    }

    pub async fn clear_selection(&self) {
        self.state.lock().await.selected = None;
    }

    /// Persists a status change and returns the updated appointment, clearing
    /// any earlier error. The loaded window is left alone; see
    /// `update_status_and_refresh`.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError> {
        info!("Setting appointment {} to {}", id, status);

        let result = self.repository.set_status(id, status).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(appointment) => {
                if state.selected.as_ref().map(|s| s.id) == Some(appointment.id) {
                    state.selected = Some(appointment.clone());
                }
                state.error = None;
                Ok(appointment)
            }
            Err(err) => {
                warn!("Failed to update appointment {}: {}", id, err);
                state.error = Some(user_message(err.clone()));
                Err(err)
            }
        }
    }

    pub async fn update_status_and_refresh(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self.update_status(id, status).await?;
        self.load_window().await;
        Ok(appointment)
    }

    pub async fn snapshot(&self) -> SchedulerSnapshot {
        let state = self.state.lock().await;
        SchedulerSnapshot {
            granularity: state.window.granularity,
            anchor: state.window.anchor,
            window: state.window.clone(),
            appointments: state.appointments.clone(),
            loading: state.load_pending || state.selects_pending > 0,
            error: state.error.clone(),
            selected: state.selected.clone(),
            title: title_for(&state.window, self.locale),
            tally: tally(&state.appointments),
        }
    }
}

fn user_message(err: AppointmentError) -> String {
    AppError::from(err).user_message()
}
