//! Timeline scheduling and cost reporting.
//!
//! `TimelineScheduler` places dependency-ordered tasks on the business
//! calendar, one sequential lane per owner role. `CostSummary` aggregates
//! the priced effort of a pass.
//!
//! # Algorithm
//!
//! Placement is greedy and deterministic: tasks are taken in topological
//! order (explicit `order` as tie-break) and each one starts at its
//! role's cursor or its predecessor's end, whichever is later, clamped
//! into business hours. There is no backtracking and no optimization.

mod cost;
mod timeline;

pub use cost::{CostSummary, RoleCost};
pub use timeline::{AnomalyKind, ScheduleOutcome, SchedulingAnomaly, TimelineScheduler};
