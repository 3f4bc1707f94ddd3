use std::env;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc, Weekday};
use tracing::warn;

/// Display language used for agenda titles and labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    PtBr,
    EnUs,
}

impl Locale {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "pt-br" | "pt" => Some(Locale::PtBr),
            "en-us" | "en" => Some(Locale::EnUs),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub simulated_latency: Duration,
    pub utc_offset: FixedOffset,
    pub week_starts_on: Weekday,
    pub locale: Locale,
    pub session_secret: String,
    pub session_ttl_hours: i64,
}

const DEFAULT_UTC_OFFSET_MINUTES: i32 = -180;
const DEFAULT_SESSION_TTL_HOURS: i64 = 12;

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            simulated_latency: Duration::ZERO,
            utc_offset: default_offset(),
            week_starts_on: Weekday::Sun,
            locale: Locale::PtBr,
            session_secret: String::new(),
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let simulated_latency = match env::var("SIMULATED_LATENCY_MS") {
            Ok(raw) => raw.parse::<u64>().map(Duration::from_millis).unwrap_or_else(|_| {
                warn!("SIMULATED_LATENCY_MS is not a number ({}), using 0", raw);
                defaults.simulated_latency
            }),
            Err(_) => defaults.simulated_latency,
        };

        let utc_offset = match env::var("CLINIC_UTC_OFFSET_MINUTES") {
            Ok(raw) => parse_offset_minutes(&raw).unwrap_or_else(|| {
                warn!("CLINIC_UTC_OFFSET_MINUTES is invalid ({}), using default", raw);
                defaults.utc_offset
            }),
            Err(_) => {
                warn!("CLINIC_UTC_OFFSET_MINUTES not set, using UTC-03:00");
                defaults.utc_offset
            }
        };

        let week_starts_on = match env::var("WEEK_STARTS_ON") {
            Ok(raw) => raw.parse::<Weekday>().unwrap_or_else(|_| {
                warn!("WEEK_STARTS_ON is not a weekday ({}), using sunday", raw);
                defaults.week_starts_on
            }),
            Err(_) => defaults.week_starts_on,
        };

        let locale = match env::var("CLINIC_LOCALE") {
            Ok(raw) => Locale::parse(&raw).unwrap_or_else(|| {
                warn!("CLINIC_LOCALE {} is not supported, using pt-BR", raw);
                defaults.locale
            }),
            Err(_) => defaults.locale,
        };

        let session_secret = env::var("SESSION_SECRET").unwrap_or_else(|_| {
            warn!("SESSION_SECRET not set, using empty value");
            String::new()
        });

        let session_ttl_hours = match env::var("SESSION_TTL_HOURS") {
            Ok(raw) => raw.parse::<i64>().ok().filter(|h| *h > 0).unwrap_or_else(|| {
                warn!("SESSION_TTL_HOURS is invalid ({}), using default", raw);
                defaults.session_ttl_hours
            }),
            Err(_) => defaults.session_ttl_hours,
        };

        let config = Self {
            simulated_latency,
            utc_offset,
            week_starts_on,
            locale,
            session_secret,
            session_ttl_hours,
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.session_secret.is_empty()
    }
}

/// Minutes east of UTC; `None` for anything outside a valid offset.
fn parse_offset_minutes(raw: &str) -> Option<FixedOffset> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .and_then(|minutes| minutes.checked_mul(60))
        .and_then(FixedOffset::east_opt)
}

fn default_offset() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_UTC_OFFSET_MINUTES * 60).unwrap_or_else(|| Utc.fix())
}
