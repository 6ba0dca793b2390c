//! Task scheduling and resource allocation engine.
//!
//! Computes task effort from spreadsheet-style hour formulas, classifies
//! implementation vs. sustainment work, places dependency-ordered tasks on
//! a fixed business calendar (Monday to Friday, 09:00 to 17:00) with one
//! sequential lane per owner role, derives per-member availability against
//! existing commitments, and greedily allocates members to scheduled work.
//!
//! # Modules
//!
//! - **`models`**: domain types — `Task`, `TeamMember`, `Allocation`,
//!   `ResourceAvailability`, `BusinessCalendar`
//! - **`formula`**: the hour-formula evaluator (tokenizer, recursive
//!   descent parser, AST interpreter)
//! - **`classify`**: sustainment keyword classification
//! - **`validation`**: input integrity checks (duplicate IDs, dependency cycles)
//! - **`scheduler`**: dependency-ordered timeline placement and cost reporting
//! - **`availability`**: per-member free-hours computation
//! - **`allocator`**: greedy member-to-role allocation
//! - **`store`**: the allocation store seam
//! - **`engine`**: facade over the public operations
//!
//! # Determinism
//!
//! Every pass is synchronous, single-threaded and a pure function of its
//! inputs; derived fields are recomputed from scratch each run. The only
//! shared mutable resource is the external allocation store, accessed
//! optimistically: conflicting concurrent writes are rejected by the
//! store and surface as counted failures, never retried internally.

pub mod allocator;
pub mod availability;
pub mod classify;
pub mod config;
pub mod engine;
pub mod formula;
pub mod models;
pub mod scheduler;
pub mod store;
pub mod validation;

pub use allocator::{AllocationFailure, AllocationReport, AutoAllocator};
pub use availability::AvailabilityCalculator;
pub use classify::{Classification, Classifier};
pub use config::EngineConfig;
pub use engine::{Engine, FormulaFailure, ProjectPlan};
pub use formula::{compute_hours, evaluate_formula, parse_formula, FormulaError};
pub use models::{
    Allocation, AllocationStatus, BusinessCalendar, DayAvailability, ResourceAvailability, Task,
    TaskStatus, TeamMember,
};
pub use scheduler::{
    AnomalyKind, CostSummary, RoleCost, ScheduleOutcome, SchedulingAnomaly, TimelineScheduler,
};
pub use store::{AllocationStore, InMemoryAllocationStore, StoreError};
pub use validation::{validate_input, ValidationError, ValidationErrorKind, ValidationResult};
