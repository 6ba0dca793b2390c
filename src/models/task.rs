//! Task model.
//!
//! A task is the unit of effort estimation and timeline placement. Its
//! effort comes either from an hour formula evaluated against the project's
//! attribute set or from a fixed hour value; its position on the calendar
//! comes from the scheduler.
//!
//! `calculated_hours`, `start_date` and `end_date` are derived fields:
//! they are recomputed from scratch on every processing pass and carry no
//! state between passes.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

/// A schedulable unit of work.
///
/// `owner` is a role code, not an individual: the scheduler treats each
/// role as a single sequential lane, and the allocator later assigns
/// concrete team members within that role. `depends_on` is a single
/// predecessor reference; the dependency relation across tasks must form
/// a forest (validated before scheduling).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Project phase this task belongs to (classification input).
    pub phase: String,
    /// Epic grouping (classification input).
    pub epic: String,
    /// Story grouping (reporting only).
    pub story: String,
    /// Role code responsible for the task.
    pub owner: String,
    /// Hour formula evaluated against the attribute set. Takes precedence
    /// over `fixed_hours` when both are present.
    pub hours_formula: Option<String>,
    /// Fixed effort in hours, used when no formula is given.
    pub fixed_hours: Option<f64>,
    /// Derived effort in hours (0 until a pass computes it).
    pub calculated_hours: f64,
    /// Id of the single predecessor task, if any.
    pub depends_on: Option<String>,
    /// Explicit ordering tie-break among tasks with no dependency relation.
    pub order: i32,
    /// Derived start timestamp.
    pub start_date: Option<NaiveDateTime>,
    /// Derived end timestamp.
    pub end_date: Option<NaiveDateTime>,
    /// Lifecycle state.
    pub status: TaskStatus,
}

impl Task {
    /// Creates a new pending task with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            phase: String::new(),
            epic: String::new(),
            story: String::new(),
            owner: String::new(),
            hours_formula: None,
            fixed_hours: None,
            calculated_hours: 0.0,
            depends_on: None,
            order: 0,
            start_date: None,
            end_date: None,
            status: TaskStatus::Pending,
        }
    }

    /// Sets the task name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the phase.
    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = phase.into();
        self
    }

    /// Sets the epic.
    pub fn with_epic(mut self, epic: impl Into<String>) -> Self {
        self.epic = epic.into();
        self
    }

    /// Sets the story.
    pub fn with_story(mut self, story: impl Into<String>) -> Self {
        self.story = story.into();
        self
    }

    /// Sets the owner role code.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    /// Sets the hour formula.
    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.hours_formula = Some(formula.into());
        self
    }

    /// Sets a fixed effort in hours.
    pub fn with_fixed_hours(mut self, hours: f64) -> Self {
        self.fixed_hours = Some(hours);
        self
    }

    /// Sets the predecessor task id.
    pub fn with_dependency(mut self, task_id: impl Into<String>) -> Self {
        self.depends_on = Some(task_id.into());
        self
    }

    /// Sets the ordering tie-break.
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Sets the lifecycle state.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Effort in hours for placement and costing.
    ///
    /// Prefers the derived `calculated_hours`; falls back to `fixed_hours`
    /// when no pass has computed effort yet.
    pub fn effort_hours(&self) -> f64 {
        if self.calculated_hours > 0.0 {
            self.calculated_hours
        } else {
            self.fixed_hours.unwrap_or(self.calculated_hours)
        }
    }

    /// Whether both derived timestamps are set.
    pub fn is_scheduled(&self) -> bool {
        self.start_date.is_some() && self.end_date.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_builder() {
        let task = Task::new("T1")
            .with_name("Set up billing endpoint")
            .with_phase("Implantacao")
            .with_epic("Faturamento")
            .with_story("Billing API")
            .with_owner("BK")
            .with_formula("endpoints * 4")
            .with_dependency("T0")
            .with_order(3);

        assert_eq!(task.id, "T1");
        assert_eq!(task.owner, "BK");
        assert_eq!(task.hours_formula.as_deref(), Some("endpoints * 4"));
        assert_eq!(task.depends_on.as_deref(), Some("T0"));
        assert_eq!(task.order, 3);
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(!task.is_scheduled());
    }

    #[test]
    fn test_effort_prefers_calculated() {
        let mut task = Task::new("T1").with_fixed_hours(4.0);
        assert!((task.effort_hours() - 4.0).abs() < 1e-10);

        task.calculated_hours = 6.0;
        assert!((task.effort_hours() - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_effort_defaults_to_zero() {
        let task = Task::new("T1");
        assert_eq!(task.effort_hours(), 0.0);
    }

    #[test]
    fn test_task_serde_round_trip() {
        let task = Task::new("T1").with_owner("FE").with_fixed_hours(2.5);
        let json = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }
}
