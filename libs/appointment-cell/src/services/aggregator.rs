// libs/appointment-cell/src/services/aggregator.rs
use crate::models::{Appointment, AppointmentStatus, SchedulingWindow, StatusTally};

/// Appointments scheduled inside the window's inclusive bounds, in input order.
pub fn filter_by_window<'a>(
    appointments: &'a [Appointment],
    window: &SchedulingWindow,
) -> Vec<&'a Appointment> {
    let (start, end) = (window.start(), window.end());
    appointments
        .iter()
        .filter(|appointment| start <= appointment.scheduled_at && appointment.scheduled_at <= end)
        .collect()
}

/// `None` keeps every appointment.
pub fn filter_by_status(
    appointments: &[Appointment],
    status: Option<AppointmentStatus>,
) -> Vec<&Appointment> {
    appointments
        .iter()
        .filter(|appointment| status.map_or(true, |wanted| appointment.status == wanted))
        .collect()
}

pub fn tally<'a, I>(appointments: I) -> StatusTally
where
    I: IntoIterator<Item = &'a Appointment>,
{
    appointments
        .into_iter()
        .fold(StatusTally::default(), |mut tally, appointment| {
            tally.record(appointment.status);
            tally
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Granularity;
    use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc, Weekday};
    use uuid::Uuid;

    fn brt() -> FixedOffset {
        FixedOffset::west_opt(3 * 3600).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        brt()
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn appointment(n: u128, scheduled_at: DateTime<Utc>, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: Uuid::from_u128(n),
            scheduled_at,
            veterinarian_id: Uuid::from_u128(100),
            veterinarian_name: "Dr. Carlos Silva".to_string(),
            animal_id: Uuid::from_u128(200),
            animal_name: "Rex".to_string(),
            owner_id: Uuid::from_u128(300),
            owner_name: "João Pedro Oliveira".to_string(),
            reason: "Consulta de rotina".to_string(),
            clinical_notes: None,
            diagnosis: None,
            prescription: None,
            status,
            total_amount: 150.0,
            created_at: scheduled_at,
            updated_at: scheduled_at,
        }
    }

    fn month(y: i32, m: u32) -> SchedulingWindow {
        SchedulingWindow::new(
            Granularity::Month,
            NaiveDate::from_ymd_opt(y, m, 1).unwrap(),
            Weekday::Sun,
            brt(),
        )
    }

    #[test]
    fn november_window_counts_two_scheduled() {
        let appointments = vec![
            appointment(1, at(2024, 11, 20, 10, 0), AppointmentStatus::Scheduled),
            appointment(2, at(2024, 11, 25, 14, 30), AppointmentStatus::Scheduled),
        ];

        let subset = filter_by_window(&appointments, &month(2024, 11));
        assert_eq!(subset.len(), 2);
        assert_eq!(
            tally(subset),
            StatusTally {
                scheduled: 2,
                completed: 0,
                cancelled: 0,
                no_show: 0
            }
        );
    }

    #[test]
    fn bounds_are_inclusive_and_order_is_kept() {
        let window = month(2024, 11);
        let appointments = vec![
            appointment(1, window.end(), AppointmentStatus::NoShow),
            appointment(2, window.start() - Duration::nanoseconds(1), AppointmentStatus::Scheduled),
            appointment(3, window.start(), AppointmentStatus::Completed),
            appointment(4, window.end() + Duration::nanoseconds(1), AppointmentStatus::Cancelled),
        ];

        let ids: Vec<_> = filter_by_window(&appointments, &window)
            .into_iter()
            .map(|a| a.id.as_u128())
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn tally_sums_to_subset_length_for_every_granularity() {
        let statuses = AppointmentStatus::ALL;
        let appointments: Vec<_> = (0..120u32)
            .map(|i| {
                appointment(
                    i as u128,
                    at(2024, 10, 1, 9, 0) + Duration::hours(i as i64 * 13),
                    statuses[i as usize % statuses.len()],
                )
            })
            .collect();

        for granularity in [Granularity::Day, Granularity::Week, Granularity::Month] {
            let window = SchedulingWindow::new(
                granularity,
                NaiveDate::from_ymd_opt(2024, 10, 20).unwrap(),
                Weekday::Sun,
                brt(),
            );
            let subset = filter_by_window(&appointments, &window);
            assert!(subset.iter().all(|a| window.contains(a.scheduled_at)));

            let counts = tally(subset.iter().copied());
            assert_eq!(counts.total(), subset.len());
            for status in AppointmentStatus::ALL {
                let expected = subset.iter().filter(|a| a.status == status).count();
                assert_eq!(counts.count(status), expected);
            }
        }
    }

    #[test]
    fn status_filter_none_keeps_everything() {
        let appointments = vec![
            appointment(1, at(2024, 11, 20, 10, 0), AppointmentStatus::Completed),
            appointment(2, at(2024, 11, 25, 14, 30), AppointmentStatus::Scheduled),
        ];
        assert_eq!(filter_by_status(&appointments, None).len(), 2);
        let completed = filter_by_status(&appointments, Some(AppointmentStatus::Completed));
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, Uuid::from_u128(1));
        assert_eq!(tally(&appointments[..0]), StatusTally::default());
    }
}
