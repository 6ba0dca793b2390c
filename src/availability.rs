//! Team-member availability over a date range.
//!
//! For each candidate member and each business day in the queried range,
//! free hours are the member's daily capacity minus the hours consumed by
//! existing commitments, where every allocation spreads its total evenly
//! across the business days of its own span. Results come back ranked
//! most-available first, which is the order the allocator consumes.

use std::cmp::Ordering;

use chrono::NaiveDate;
use tracing::debug;

use crate::config::EngineConfig;
use crate::models::{Allocation, DayAvailability, ResourceAvailability, TeamMember};
use crate::store::{AllocationStore, StoreError};

/// Computes per-member free hours against the allocation store.
#[derive(Debug, Clone)]
pub struct AvailabilityCalculator<'a> {
    config: &'a EngineConfig,
}

impl<'a> AvailabilityCalculator<'a> {
    /// Creates a calculator over the given configuration.
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Free hours per member per business day in `[start, end]`.
    ///
    /// Inactive members are skipped. When `required_hours` is given,
    /// members whose total free hours fall below the configured fraction
    /// of it are dropped: they could not carry a meaningful share of the
    /// work. A store read failure propagates untouched; there is no
    /// silent fallback.
    pub fn get_availability(
        &self,
        store: &dyn AllocationStore,
        members: &[TeamMember],
        start: NaiveDate,
        end: NaiveDate,
        required_hours: Option<f64>,
    ) -> Result<Vec<ResourceAvailability>, StoreError> {
        let allocations = store.allocations_overlapping(start, end, None)?;

        let mut availability: Vec<ResourceAvailability> = members
            .iter()
            .filter(|m| m.active)
            .map(|m| self.member_availability(m, &allocations, start, end))
            .collect();

        if let Some(required) = required_hours {
            let threshold = self.config.eligibility_threshold * required;
            availability.retain(|a| a.total_hours() >= threshold);
        }

        availability.sort_by(|a, b| {
            b.total_hours()
                .partial_cmp(&a.total_hours())
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.member_id.cmp(&b.member_id))
        });

        debug!(
            members = availability.len(),
            %start,
            %end,
            "availability computed"
        );
        Ok(availability)
    }

    fn member_availability(
        &self,
        member: &TeamMember,
        allocations: &[Allocation],
        start: NaiveDate,
        end: NaiveDate,
    ) -> ResourceAvailability {
        let calendar = &self.config.calendar;
        let capacity = member.capacity_or(self.config.default_daily_capacity);
        let committed: Vec<&Allocation> = allocations
            .iter()
            .filter(|a| a.member_id == member.id && a.counts_against_capacity())
            .collect();

        let available_dates = calendar
            .business_days(start, end)
            .map(|day| {
                let busy: f64 = committed
                    .iter()
                    .filter(|a| a.covers_day(day))
                    .map(|a| a.daily_hours(calendar))
                    .sum();
                DayAvailability {
                    date: day,
                    available_hours: (capacity - busy).max(0.0),
                }
            })
            .collect();

        ResourceAvailability {
            member_id: member.id.clone(),
            available_dates,
        }
    }
}
