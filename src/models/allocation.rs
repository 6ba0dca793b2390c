//! Allocation model.
//!
//! An allocation records a member's commitment over a calendar-day span.
//! For capacity accounting its hours are spread evenly across the business
//! days of its own span; weekend days never enter the divisor.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::BusinessCalendar;

/// Lifecycle state of an allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

/// A member's commitment over `[start_date, end_date]` (inclusive).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// Store-assigned identifier (empty until persisted).
    pub id: String,
    /// Project this commitment belongs to.
    pub project_id: String,
    /// Committed member.
    pub member_id: String,
    /// Optional link to a specific task.
    pub task_id: Option<String>,
    /// First committed day.
    pub start_date: NaiveDate,
    /// Last committed day (inclusive).
    pub end_date: NaiveDate,
    /// Total committed hours over the span.
    pub allocated_hours: f64,
    /// Lifecycle state.
    pub status: AllocationStatus,
}

impl Allocation {
    /// Creates a scheduled allocation. The id stays empty until the store
    /// assigns one.
    pub fn new(
        project_id: impl Into<String>,
        member_id: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        allocated_hours: f64,
    ) -> Self {
        Self {
            id: String::new(),
            project_id: project_id.into(),
            member_id: member_id.into(),
            task_id: None,
            start_date,
            end_date,
            allocated_hours,
            status: AllocationStatus::Scheduled,
        }
    }

    /// Sets the identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Links the allocation to a task.
    pub fn with_task(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    /// Sets the lifecycle state.
    pub fn with_status(mut self, status: AllocationStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether the span intersects the inclusive range `[start, end]`.
    #[inline]
    pub fn overlaps_range(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && start <= self.end_date
    }

    /// Whether the span covers a specific day.
    #[inline]
    pub fn covers_day(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }

    /// Whether this allocation consumes capacity. Cancelled commitments
    /// are released and never count.
    #[inline]
    pub fn counts_against_capacity(&self) -> bool {
        self.status != AllocationStatus::Cancelled
    }

    /// Hours this allocation consumes on each business day of its span.
    ///
    /// The divisor is the business-day count of the span, floored at 1 so
    /// a weekend-only span still spreads over one notional day.
    pub fn daily_hours(&self, calendar: &BusinessCalendar) -> f64 {
        let days = calendar
            .business_day_count(self.start_date, self.end_date)
            .max(1);
        self.allocated_hours / days as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_overlap() {
        // Mon .. Fri
        let a = Allocation::new("p1", "m1", date(2025, 6, 2), date(2025, 6, 6), 20.0);
        assert!(a.overlaps_range(date(2025, 6, 5), date(2025, 6, 10)));
        assert!(a.overlaps_range(date(2025, 6, 6), date(2025, 6, 6)));
        assert!(!a.overlaps_range(date(2025, 6, 9), date(2025, 6, 13)));
        assert!(a.covers_day(date(2025, 6, 4)));
        assert!(!a.covers_day(date(2025, 6, 9)));
    }

    #[test]
    fn test_daily_spread_excludes_weekends() {
        let cal = BusinessCalendar::default();
        // Thu 2025-06-05 .. Mon 2025-06-09 has 3 business days
        let a = Allocation::new("p1", "m1", date(2025, 6, 5), date(2025, 6, 9), 12.0);
        assert!((a.daily_hours(&cal) - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_daily_spread_floors_divisor() {
        let cal = BusinessCalendar::default();
        // Weekend-only span: zero business days, divisor floors at 1
        let a = Allocation::new("p1", "m1", date(2025, 6, 7), date(2025, 6, 8), 3.0);
        assert!((a.daily_hours(&cal) - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_cancelled_releases_capacity() {
        let a = Allocation::new("p1", "m1", date(2025, 6, 2), date(2025, 6, 6), 20.0);
        assert!(a.counts_against_capacity());
        let a = a.with_status(AllocationStatus::Cancelled);
        assert!(!a.counts_against_capacity());
    }

    #[test]
    fn test_allocation_serde_round_trip() {
        let a = Allocation::new("p1", "m1", date(2025, 6, 2), date(2025, 6, 6), 20.0)
            .with_id("alloc-1")
            .with_task("T1");
        let json = serde_json::to_string(&a).unwrap();
        let back: Allocation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
    }
}
