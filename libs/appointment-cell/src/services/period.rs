// libs/appointment-cell/src/services/period.rs
//! Date windows for the agenda: range computation, stepping and titles.

use chrono::{
    DateTime, Datelike, Days, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc,
};

use shared_config::Locale;

use crate::models::{Granularity, SchedulingWindow};

const MONTHS_PT_BR: [&str; 12] = [
    "janeiro", "fevereiro", "março", "abril", "maio", "junho", "julho", "agosto", "setembro",
    "outubro", "novembro", "dezembro",
];

const MONTHS_EN_US: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

impl SchedulingWindow {
    /// First calendar day covered by the window.
    pub fn first_day(&self) -> NaiveDate {
        match self.granularity {
            Granularity::Day => self.anchor,
            Granularity::Week => {
                let back = (7 + self.anchor.weekday().num_days_from_sunday()
                    - self.week_starts_on.num_days_from_sunday())
                    % 7;
                self.anchor
                    .checked_sub_days(Days::new(back as u64))
                    .unwrap_or(NaiveDate::MIN)
            }
            Granularity::Month => self.anchor.with_day(1).unwrap_or(self.anchor),
        }
    }

    /// Last calendar day covered by the window.
    pub fn last_day(&self) -> NaiveDate {
        match self.granularity {
            Granularity::Day => self.anchor,
            Granularity::Week => self
                .first_day()
                .checked_add_days(Days::new(6))
                .unwrap_or(NaiveDate::MAX),
            Granularity::Month => {
                let last = days_in_month(self.anchor.year(), self.anchor.month());
                self.anchor.with_day(last).unwrap_or(self.anchor)
            }
        }
    }

    /// Local midnight of the first day, as a UTC instant.
    pub fn start(&self) -> DateTime<Utc> {
        local_midnight(self.first_day(), self.utc_offset)
    }

    /// Last representable instant of the last day (inclusive bound).
    pub fn end(&self) -> DateTime<Utc> {
        match self.last_day().succ_opt() {
            Some(next) => local_midnight(next, self.utc_offset) - Duration::nanoseconds(1),
            None => DateTime::<Utc>::MAX_UTC,
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start() <= instant && instant <= self.end()
    }

    /// Every calendar day in the window, in order.
    pub fn days(&self) -> Vec<NaiveDate> {
        self.first_day()
            .iter_days()
            .take_while(|day| *day <= self.last_day())
            .collect()
    }

    /// Calendar day of `instant` at the clinic.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.utc_offset).date_naive()
    }
}

fn local_midnight(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    match offset.from_local_datetime(&naive).single() {
        Some(local) => local.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&naive),
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

fn shift_month(anchor: NaiveDate, delta_months: i32, preferred_day: u32) -> Option<NaiveDate> {
    let total_months = anchor.year() * 12 + (anchor.month() as i32 - 1) + delta_months;
    let year = total_months.div_euclid(12);
    let month = total_months.rem_euclid(12) as u32 + 1;
    let day = preferred_day.min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

fn step(window: &SchedulingWindow, direction: i32) -> SchedulingWindow {
    let shifted = match window.granularity {
        Granularity::Day => shift_days(window.anchor, direction as i64),
        Granularity::Week => shift_days(window.anchor, 7 * direction as i64),
        Granularity::Month => shift_month(window.anchor, direction, window.preferred_day),
    };

    let Some(anchor) = shifted else {
        return window.clone();
    };

    let preferred_day = match window.granularity {
        Granularity::Month => window.preferred_day,
        Granularity::Day | Granularity::Week => anchor.day(),
    };

    SchedulingWindow {
        anchor,
        preferred_day,
        ..window.clone()
    }
}

fn shift_days(anchor: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days >= 0 {
        anchor.checked_add_days(Days::new(days as u64))
    } else {
        anchor.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

/// Next period of the same granularity. Saturates at the calendar's edge.
pub fn advance(window: &SchedulingWindow) -> SchedulingWindow {
    step(window, 1)
}

/// Previous period of the same granularity. Saturates at the calendar's edge.
pub fn retreat(window: &SchedulingWindow) -> SchedulingWindow {
    step(window, -1)
}

/// Window anchored at `today`, keeping the granularity.
pub fn reset_to_today(window: &SchedulingWindow, today: NaiveDate) -> SchedulingWindow {
    SchedulingWindow::new(window.granularity, today, window.week_starts_on, window.utc_offset)
}

pub fn change_granularity(window: &SchedulingWindow, granularity: Granularity) -> SchedulingWindow {
    SchedulingWindow {
        granularity,
        ..window.clone()
    }
}

/// Current calendar date at the clinic.
pub fn clinic_today(offset: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&offset).date_naive()
}

/// Heading for the agenda: a full date for day views, month and year otherwise.
pub fn title_for(window: &SchedulingWindow, locale: Locale) -> String {
    let anchor = window.anchor;
    let month_index = anchor.month0() as usize;

    match (window.granularity, locale) {
        (Granularity::Day, Locale::PtBr) => format!(
            "{} de {} de {}",
            anchor.day(),
            MONTHS_PT_BR[month_index],
            anchor.year()
        ),
        (Granularity::Day, Locale::EnUs) => format!(
            "{} {}, {}",
            MONTHS_EN_US[month_index],
            anchor.day(),
            anchor.year()
        ),
        (Granularity::Week | Granularity::Month, Locale::PtBr) => {
            format!("{} de {}", MONTHS_PT_BR[month_index], anchor.year())
        }
        (Granularity::Week | Granularity::Month, Locale::EnUs) => {
            format!("{} {}", MONTHS_EN_US[month_index], anchor.year())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn brt() -> FixedOffset {
        FixedOffset::west_opt(3 * 3600).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window(granularity: Granularity, anchor: NaiveDate) -> SchedulingWindow {
        SchedulingWindow::new(granularity, anchor, Weekday::Sun, brt())
    }

    #[test]
    fn week_starts_on_configured_weekday() {
        // 2024-11-20 is a Wednesday
        let sunday_week = window(Granularity::Week, date(2024, 11, 20));
        assert_eq!(sunday_week.first_day(), date(2024, 11, 17));
        assert_eq!(sunday_week.last_day(), date(2024, 11, 23));

        let monday_week =
            SchedulingWindow::new(Granularity::Week, date(2024, 11, 20), Weekday::Mon, brt());
        assert_eq!(monday_week.first_day(), date(2024, 11, 18));
        assert_eq!(monday_week.last_day(), date(2024, 11, 24));

        let on_start_day = window(Granularity::Week, date(2024, 11, 17));
        assert_eq!(on_start_day.first_day(), date(2024, 11, 17));
    }

    #[test]
    fn bounds_follow_the_clinic_offset() {
        let day = window(Granularity::Day, date(2024, 11, 20));
        assert_eq!(day.start(), Utc.with_ymd_and_hms(2024, 11, 20, 3, 0, 0).unwrap());
        assert_eq!(
            day.end(),
            Utc.with_ymd_and_hms(2024, 11, 21, 3, 0, 0).unwrap() - Duration::nanoseconds(1)
        );
        assert!(day.contains(day.end()));
        assert!(!day.contains(day.end() + Duration::nanoseconds(1)));
    }

    #[test]
    fn month_covers_leap_february() {
        let february = window(Granularity::Month, date(2024, 2, 10));
        assert_eq!(february.first_day(), date(2024, 2, 1));
        assert_eq!(february.last_day(), date(2024, 2, 29));
        assert_eq!(february.days().len(), 29);
    }

    #[test]
    fn stepping_keeps_granularity() {
        let day = window(Granularity::Day, date(2024, 12, 31));
        assert_eq!(advance(&day).anchor, date(2025, 1, 1));

        let week = window(Granularity::Week, date(2024, 11, 20));
        assert_eq!(advance(&week).anchor, date(2024, 11, 27));
        assert_eq!(retreat(&week).anchor, date(2024, 11, 13));
        assert_eq!(advance(&week).granularity, Granularity::Week);
    }

    #[test]
    fn month_stepping_clamps_but_round_trips() {
        let january = window(Granularity::Month, date(2024, 1, 31));
        let february = advance(&january);
        assert_eq!(february.anchor, date(2024, 2, 29));
        assert_eq!(advance(&february).anchor, date(2024, 3, 31));
        assert_eq!(retreat(&february), january);

        let december = window(Granularity::Month, date(2024, 12, 15));
        assert_eq!(advance(&december).anchor, date(2025, 1, 15));
    }

    #[test]
    fn round_trip_holds_for_every_granularity_and_day_of_year() {
        for granularity in [Granularity::Day, Granularity::Week, Granularity::Month] {
            for anchor in date(2023, 12, 1).iter_days().take(400) {
                let w = window(granularity, anchor);
                assert_eq!(retreat(&advance(&w)).anchor, anchor);
                assert_eq!(advance(&retreat(&w)).anchor, anchor);
            }
        }
    }

    #[test]
    fn changing_granularity_preserves_anchor() {
        let w = window(Granularity::Day, date(2024, 11, 20));
        for granularity in [Granularity::Day, Granularity::Week, Granularity::Month] {
            let changed = change_granularity(&w, granularity);
            assert_eq!(changed.anchor, w.anchor);
            assert_eq!(changed.granularity, granularity);
        }
    }

    #[test]
    fn reset_keeps_granularity() {
        let w = window(Granularity::Month, date(2020, 1, 1));
        let today = reset_to_today(&w, date(2024, 11, 20));
        assert_eq!(today.anchor, date(2024, 11, 20));
        assert_eq!(today.granularity, Granularity::Month);
    }

    #[test]
    fn stepping_saturates_at_calendar_edge() {
        let w = window(Granularity::Day, NaiveDate::MAX);
        assert_eq!(advance(&w), w);
    }

    #[test]
    fn titles() {
        let day = window(Granularity::Day, date(2024, 11, 20));
        assert_eq!(title_for(&day, Locale::PtBr), "20 de novembro de 2024");
        assert_eq!(title_for(&day, Locale::EnUs), "November 20, 2024");

        let week = change_granularity(&day, Granularity::Week);
        assert_eq!(title_for(&week, Locale::PtBr), "novembro de 2024");

        let month = change_granularity(&day, Granularity::Month);
        assert_eq!(title_for(&month, Locale::EnUs), "November 2024");
        assert_eq!(
            title_for(&window(Granularity::Month, date(2024, 3, 1)), Locale::PtBr),
            "março de 2024"
        );
    }
}
