//! Fixtures shared by the cells' test suites.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use shared_config::AppConfig;

pub struct TestConfig {
    pub session_secret: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            session_secret: "test-secret-key-for-session-tokens".to_string(),
        }
    }
}

impl TestConfig {
    /// Config with no simulated latency, clinic in UTC-03:00 and weeks starting on Sunday.
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            session_secret: self.session_secret.clone(),
            ..AppConfig::default()
        }
    }
}

/// Deterministic id for seeded fixtures.
pub fn fixed_id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| panic!("invalid fixture date {}-{}-{}", year, month, day))
}

/// Instant for a wall-clock time at the clinic (default UTC-03:00 offset).
pub fn clinic_time(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    let offset = AppConfig::default().utc_offset;
    offset
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| panic!("invalid fixture time {}-{}-{} {}:{}", year, month, day, hour, minute))
}
