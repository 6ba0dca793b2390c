//! Scheduling and allocation domain models.
//!
//! Core data types for the engine: tasks with formula-driven effort,
//! team members holding roles, calendar-day allocations, derived
//! availability, and the fixed business calendar.

mod allocation;
mod availability;
mod calendar;
mod member;
mod task;

pub use allocation::{Allocation, AllocationStatus};
pub use availability::{DayAvailability, ResourceAvailability};
pub use calendar::BusinessCalendar;
pub use member::TeamMember;
pub use task::{Task, TaskStatus};
