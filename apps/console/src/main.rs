use anyhow::Result;
use chrono::{NaiveDate, Utc};
use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod seed;

use appointment_cell::{
    build_calendar, AppointmentScheduler, Granularity, LoadOutcome, SchedulerSnapshot,
};
use auth_cell::{visible_sections, LoginCredentials};
use shared_config::AppConfig;

use seed::{Clinic, ADMIN_EMAIL, DEMO_PASSWORD};

#[tokio::main]
async fn main() -> Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Kikão clinic console");

    let mut config = AppConfig::from_env();
    if !config.is_configured() {
        warn!("Using a throwaway session secret for the demo run");
        config.session_secret = "kikao-console-demo-secret".to_string();
    }

    let clinic = Clinic::new(config);
    clinic.seed().await?;

    let session = clinic
        .auth
        .login(LoginCredentials {
            email: ADMIN_EMAIL.to_string(),
            password: DEMO_PASSWORD.to_string(),
        })
        .await?;
    info!("Logged in as {} ({})", session.user.name, session.user.role);

    let menu: Vec<&str> = visible_sections(session.user.role)
        .iter()
        .map(|section| section.label())
        .collect();
    info!("Menu: {}", menu.join(" | "));

    let scheduler = AppointmentScheduler::new(clinic.appointments.clone(), &clinic.config);
    load_and_log(&scheduler).await;

    // The seeded appointments live in November 2024
    if let Some(seeded_month) = NaiveDate::from_ymd_opt(2024, 11, 20) {
        scheduler.go_to(seeded_month).await;
        scheduler.set_granularity(Granularity::Month).await;
        load_and_log(&scheduler).await;
    }

    let stats = clinic.dashboard.stats(Utc::now()).await?;
    info!(
        "Dashboard: {} clients, {} animals, {} appointments today, {} in the last 7 days",
        stats.total_clients, stats.total_animals, stats.appointments_today, stats.appointments_last_week
    );
    info!(
        "Monthly revenue {:.2}, monthly balance {:.2}",
        stats.monthly_revenue, stats.monthly_balance
    );

    let summary = clinic
        .finance
        .summary(NaiveDate::from_ymd_opt(2024, 11, 30).unwrap_or_else(|| Utc::now().date_naive()))
        .await?;
    info!(
        "November 2024: revenue {:.2}, expense {:.2}, yearly balance {:.2}",
        summary.monthly_revenue, summary.monthly_expense, summary.balance
    );

    clinic.auth.logout(&session.token).await?;
    info!("Done");
    Ok(())
}

async fn load_and_log(scheduler: &AppointmentScheduler) {
    if scheduler.load_window().await == LoadOutcome::Failed {
        warn!("Agenda failed to load");
    }
    log_agenda(&scheduler.snapshot().await);
}

fn log_agenda(snapshot: &SchedulerSnapshot) {
    info!(
        "Agenda {}: {} appointment(s), {} scheduled, {} completed, {} cancelled, {} no-show",
        snapshot.title,
        snapshot.appointments.len(),
        snapshot.tally.scheduled,
        snapshot.tally.completed,
        snapshot.tally.cancelled,
        snapshot.tally.no_show
    );
    for day in build_calendar(&snapshot.window, &snapshot.appointments) {
        if day.is_empty() {
            continue;
        }
        info!("  {}", day.date.format("%d/%m/%Y"));
        for entry in &day.entries {
            info!(
                "    {} {} with {} [{}]",
                entry.scheduled_at.with_timezone(&snapshot.window.utc_offset).format("%H:%M"),
                entry.title(),
                entry.veterinarian_name,
                entry.status
            );
        }
    }
}
