//! Availability result model.
//!
//! Derived per-member free hours over a date range. Never persisted:
//! recomputed from the allocation store on every query. Weekend days are
//! excluded rather than listed at zero.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Free hours of one member on one business day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayAvailability {
    /// The business day.
    pub date: NaiveDate,
    /// Free hours on that day (never negative).
    pub available_hours: f64,
}

/// A member's free hours across a queried range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceAvailability {
    /// The member this availability belongs to.
    pub member_id: String,
    /// Business days in the range with their free hours.
    pub available_dates: Vec<DayAvailability>,
}

impl ResourceAvailability {
    /// Total free hours over the range.
    pub fn total_hours(&self) -> f64 {
        self.available_dates.iter().map(|d| d.available_hours).sum()
    }

    /// Free hours on a specific day, if it is in the range.
    pub fn hours_on(&self, date: NaiveDate) -> Option<f64> {
        self.available_dates
            .iter()
            .find(|d| d.date == date)
            .map(|d| d.available_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_total_hours() {
        let a = ResourceAvailability {
            member_id: "m1".into(),
            available_dates: vec![
                DayAvailability { date: date(2025, 6, 2), available_hours: 8.0 },
                DayAvailability { date: date(2025, 6, 3), available_hours: 3.5 },
            ],
        };
        assert!((a.total_hours() - 11.5).abs() < 1e-10);
    }

    #[test]
    fn test_hours_on() {
        let a = ResourceAvailability {
            member_id: "m1".into(),
            available_dates: vec![DayAvailability {
                date: date(2025, 6, 2),
                available_hours: 8.0,
            }],
        };
        assert_eq!(a.hours_on(date(2025, 6, 2)), Some(8.0));
        assert_eq!(a.hours_on(date(2025, 6, 3)), None);
    }
}
