use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, Utc};
use futures::try_join;
use tracing::{debug, info};

use appointment_cell::AppointmentRepository;
use client_cell::{AnimalRepository, ClientRepository};
use finance_cell::{summarize, LedgerRepository};
use shared_config::AppConfig;
use shared_models::AppError;

use crate::models::DashboardStats;

/// Read-only view over the other cells' repositories.
pub struct DashboardService {
    clients: Arc<dyn ClientRepository>,
    animals: Arc<dyn AnimalRepository>,
    appointments: Arc<dyn AppointmentRepository>,
    ledger: Arc<dyn LedgerRepository>,
    utc_offset: FixedOffset,
}

impl DashboardService {
    pub fn new(
        clients: Arc<dyn ClientRepository>,
        animals: Arc<dyn AnimalRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        ledger: Arc<dyn LedgerRepository>,
        config: &AppConfig,
    ) -> Self {
        Self {
            clients,
            animals,
            appointments,
            ledger,
            utc_offset: config.utc_offset,
        }
    }

    /// "Today" and "this month" are evaluated in the clinic's offset. The
    /// last-week count covers `now - 7d ..= now`; appointments booked after
    /// `now` are not counted.
    pub async fn stats(&self, now: DateTime<Utc>) -> Result<DashboardStats, AppError> {
        debug!("Computing dashboard stats at {}", now);

        let (clients, animals, appointments, entries) = try_join!(
            async { self.clients.list().await.map_err(AppError::from) },
            async { self.animals.list().await.map_err(AppError::from) },
            async { self.appointments.list_all().await.map_err(AppError::from) },
            async { self.ledger.list().await.map_err(AppError::from) }
        )?;

        let today = now.with_timezone(&self.utc_offset).date_naive();
        let week_ago = now - Duration::days(7);

        let appointments_today = appointments
            .iter()
            .filter(|a| a.scheduled_at.with_timezone(&self.utc_offset).date_naive() == today)
            .count();
        let appointments_last_week = appointments
            .iter()
            .filter(|a| week_ago <= a.scheduled_at && a.scheduled_at <= now)
            .count();

        let summary = summarize(&entries, today);

        let stats = DashboardStats {
            total_clients: clients.len(),
            total_animals: animals.len(),
            appointments_today,
            appointments_last_week,
            monthly_revenue: summary.monthly_revenue,
            monthly_balance: summary.monthly_revenue - summary.monthly_expense,
        };

        info!(
            "Dashboard: {} clients, {} animals, {} appointments today",
            stats.total_clients, stats.total_animals, stats.appointments_today
        );
        Ok(stats)
    }
}
