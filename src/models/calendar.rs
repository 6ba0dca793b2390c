//! Business calendar model.
//!
//! Encodes the fixed working window used for timeline placement and
//! availability: Monday through Friday, 09:00 to 17:00, with a lunch hour
//! at noon. There is no holiday calendar; weekends are the only non-working
//! days.
//!
//! # Time Model
//! Calendar days are `chrono::NaiveDate`, scheduled timestamps are
//! `chrono::NaiveDateTime`. Everything lives in a single implicit local
//! time zone.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// The working window tasks are placed into.
///
/// Hours are whole clock hours; the workday spans `[start_hour, end_hour)`
/// on business days only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessCalendar {
    /// First working hour of the day (default 9).
    pub start_hour: u32,
    /// Hour the workday closes (default 17).
    pub end_hour: u32,
    /// Hour the lunch break starts (default 12).
    pub lunch_hour: u32,
}

impl Default for BusinessCalendar {
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 17,
            lunch_hour: 12,
        }
    }
}

impl BusinessCalendar {
    /// Creates a calendar with explicit hours. Hours are clamped to 0..=23.
    pub fn new(start_hour: u32, end_hour: u32, lunch_hour: u32) -> Self {
        Self {
            start_hour: start_hour.min(23),
            end_hour: end_hour.min(23),
            lunch_hour: lunch_hour.min(23),
        }
    }

    /// Working hours in one business day.
    #[inline]
    pub fn workday_hours(&self) -> f64 {
        (self.end_hour.saturating_sub(self.start_hour)) as f64
    }

    /// Whether the date falls on a business day (Monday through Friday).
    #[inline]
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// The first business day strictly after `date`.
    pub fn next_business_day(&self, date: NaiveDate) -> NaiveDate {
        let mut day = date + Duration::days(1);
        while !self.is_business_day(day) {
            day = day + Duration::days(1);
        }
        day
    }

    /// The opening timestamp of a day (start hour, minute zero).
    pub fn day_start(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::from_hms_opt(self.start_hour, 0, 0).unwrap_or_default())
    }

    /// The closing timestamp of a day (end hour, minute zero).
    pub fn day_close(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::from_hms_opt(self.end_hour, 0, 0).unwrap_or_default())
    }

    /// Clamps a prospective start into the business window.
    ///
    /// Weekends and starts at or past the closing hour move to the next
    /// business day's opening; starts before the opening hour move to the
    /// same day's opening. A start already inside the window is returned
    /// unchanged, minutes included.
    pub fn clamp_start(&self, start: NaiveDateTime) -> NaiveDateTime {
        use chrono::Timelike;

        if !self.is_business_day(start.date()) {
            // next_business_day searches from date + 1, so a Saturday lands
            // on Monday.
            self.day_start(self.next_business_day(start.date()))
        } else if start.hour() >= self.end_hour {
            self.day_start(self.next_business_day(start.date()))
        } else if start.hour() < self.start_hour {
            self.day_start(start.date())
        } else {
            start
        }
    }

    /// Number of business days in the inclusive range `[start, end]`.
    ///
    /// Returns 0 when `end < start`.
    pub fn business_day_count(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        self.business_days(start, end).count() as i64
    }

    /// Iterates the business days in the inclusive range `[start, end]`.
    pub fn business_days(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Iterator<Item = NaiveDate> + '_ {
        start
            .iter_days()
            .take_while(move |d| *d <= end)
            .filter(move |d| self.is_business_day(*d))
    }
}
