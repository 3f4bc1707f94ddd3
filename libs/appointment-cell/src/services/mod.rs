pub mod aggregator;
pub mod booking;
pub mod calendar;
pub mod period;
pub mod repository;
pub mod scheduler;

pub use aggregator::{filter_by_status, filter_by_window, tally};
pub use booking::AppointmentBookingService;
pub use calendar::{build_calendar, CalendarDay};
pub use period::{advance, change_granularity, clinic_today, reset_to_today, retreat, title_for};
pub use repository::*;
pub use scheduler::{AppointmentScheduler, LoadOutcome, SchedulerSnapshot};
