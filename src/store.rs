//! Allocation store seam.
//!
//! The engine reads existing commitments and writes new allocations
//! through [`AllocationStore`]; everything else about persistence lives
//! outside the crate. A conforming store must reject writes that would
//! double-book a member beyond capacity, which is why [`StoreError`]
//! distinguishes conflicts from generic write failures: the allocator
//! counts a conflict and moves on instead of aborting the batch.
//!
//! [`InMemoryAllocationStore`] is the reference implementation of the
//! contract, used by tests.

use std::collections::HashMap;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{Allocation, BusinessCalendar};

const CAPACITY_EPSILON: f64 = 1e-9;

/// Failures surfaced by an allocation store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// The write would double-book the member beyond capacity.
    #[error("allocation conflicts with existing commitments for member '{member_id}': {message}")]
    Conflict { member_id: String, message: String },
    /// The store cannot be reached; the caller may retry.
    #[error("allocation store unavailable: {0}")]
    Unavailable(String),
    /// The write failed for a reason other than a conflict.
    #[error("allocation write failed: {0}")]
    WriteFailed(String),
    /// No allocation with the given id.
    #[error("allocation '{0}' not found")]
    NotFound(String),
}

impl StoreError {
    /// Whether this error is an overlap/capacity conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Whether the operation may succeed on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Read/write access to persisted allocations.
pub trait AllocationStore {
    /// Allocations whose span intersects the inclusive range
    /// `[start, end]`, optionally filtered to one member.
    fn allocations_overlapping(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        member_id: Option<&str>,
    ) -> Result<Vec<Allocation>, StoreError>;

    /// Persists an allocation and returns its assigned id.
    ///
    /// Must reject writes that would exceed the member's capacity on any
    /// business day of the span with [`StoreError::Conflict`].
    fn create(&mut self, allocation: Allocation) -> Result<String, StoreError>;

    /// Removes an allocation by id.
    fn delete(&mut self, id: &str) -> Result<(), StoreError>;
}

/// In-memory store enforcing the write-time capacity invariant.
#[derive(Debug, Clone)]
pub struct InMemoryAllocationStore {
    calendar: BusinessCalendar,
    default_capacity: f64,
    capacities: HashMap<String, f64>,
    allocations: Vec<Allocation>,
    next_id: u64,
}

impl Default for InMemoryAllocationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAllocationStore {
    /// Creates an empty store with an 8-hour default capacity.
    pub fn new() -> Self {
        Self {
            calendar: BusinessCalendar::default(),
            default_capacity: 8.0,
            capacities: HashMap::new(),
            allocations: Vec::new(),
            next_id: 0,
        }
    }

    /// Sets the calendar used for daily spreading.
    pub fn with_calendar(mut self, calendar: BusinessCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Sets the capacity assumed for members without an explicit one.
    pub fn with_default_capacity(mut self, hours: f64) -> Self {
        self.default_capacity = hours;
        self
    }

    /// Sets one member's daily capacity.
    pub fn with_member_capacity(mut self, member_id: impl Into<String>, hours: f64) -> Self {
        self.capacities.insert(member_id.into(), hours);
        self
    }

    /// All stored allocations.
    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }

    fn capacity_for(&self, member_id: &str) -> f64 {
        self.capacities
            .get(member_id)
            .copied()
            .unwrap_or(self.default_capacity)
    }
}

impl AllocationStore for InMemoryAllocationStore {
    fn allocations_overlapping(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        member_id: Option<&str>,
    ) -> Result<Vec<Allocation>, StoreError> {
        Ok(self
            .allocations
            .iter()
            .filter(|a| a.overlaps_range(start, end))
            .filter(|a| member_id.map_or(true, |m| a.member_id == m))
            .cloned()
            .collect())
    }

    fn create(&mut self, allocation: Allocation) -> Result<String, StoreError> {
        let capacity = self.capacity_for(&allocation.member_id);
        let new_daily = allocation.daily_hours(&self.calendar);

        for day in self
            .calendar
            .business_days(allocation.start_date, allocation.end_date)
        {
            let committed: f64 = self
                .allocations
                .iter()
                .filter(|a| {
                    a.member_id == allocation.member_id
                        && a.counts_against_capacity()
                        && a.covers_day(day)
                })
                .map(|a| a.daily_hours(&self.calendar))
                .sum();
            if committed + new_daily > capacity + CAPACITY_EPSILON {
                return Err(StoreError::Conflict {
                    member_id: allocation.member_id.clone(),
                    message: format!(
                        "{day}: {committed:.2}h committed + {new_daily:.2}h requested exceeds {capacity:.2}h capacity"
                    ),
                });
            }
        }

        self.next_id += 1;
        let id = if allocation.id.is_empty() {
            format!("alloc-{}", self.next_id)
        } else {
            allocation.id.clone()
        };
        self.allocations.push(allocation.with_id(id.clone()));
        Ok(id)
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        match self.allocations.iter().position(|a| a.id == id) {
            Some(index) => {
                self.allocations.remove(index);
                Ok(())
            }
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }
}
