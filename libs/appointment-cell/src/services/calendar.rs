// libs/appointment-cell/src/services/calendar.rs
use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{AgendaEntry, Appointment, SchedulingWindow};
use crate::services::aggregator::filter_by_window;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub entries: Vec<AgendaEntry>,
}

impl CalendarDay {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Buckets the window's appointments by local calendar day, earliest first.
/// Every day of the window gets a bucket, empty days included.
pub fn build_calendar(window: &SchedulingWindow, appointments: &[Appointment]) -> Vec<CalendarDay> {
    let mut in_window = filter_by_window(appointments, window);
    in_window.sort_by_key(|appointment| appointment.scheduled_at);

    window
        .days()
        .into_iter()
        .map(|date| CalendarDay {
            date,
            entries: in_window
                .iter()
                .filter(|appointment| window.local_date(appointment.scheduled_at) == date)
                .map(|appointment| AgendaEntry::from(*appointment))
                .collect(),
        })
        .collect()
}
