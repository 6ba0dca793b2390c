//! Engine facade.
//!
//! Wires the formula evaluator, classifier, timeline scheduler,
//! availability calculator and auto-allocator behind one configured
//! entry point, and provides the full reactive pass: whenever tasks,
//! attribute values, the roster or committed allocations change, callers
//! rerun [`Engine::plan`] and every derived field is recomputed from
//! scratch. The engine keeps no state between passes.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::allocator::{AllocationReport, AutoAllocator};
use crate::availability::AvailabilityCalculator;
use crate::classify::{Classification, Classifier};
use crate::config::EngineConfig;
use crate::formula::{self, FormulaError};
use crate::models::{ResourceAvailability, Task, TeamMember};
use crate::scheduler::{CostSummary, ScheduleOutcome, SchedulingAnomaly, TimelineScheduler};
use crate::store::{AllocationStore, StoreError};

/// A formula that failed to evaluate during a batch pass.
///
/// The affected task was scheduled with zero hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaFailure {
    pub task_id: String,
    pub formula: String,
    /// Rendered evaluation error.
    pub error: String,
}

/// Result of a full planning pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectPlan {
    /// Calendar-scheduled implementation tasks, dates set.
    pub implementation: Vec<Task>,
    /// Sustainment tasks: effort computed and costed, never date-scheduled.
    pub sustainment: Vec<Task>,
    /// Formulas that fell back to zero hours.
    pub formula_failures: Vec<FormulaFailure>,
    /// Structural problems found while scheduling.
    pub anomalies: Vec<SchedulingAnomaly>,
    /// Priced effort across both buckets.
    pub cost: CostSummary,
}

/// The engine's public surface.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Creates an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Computes one task's effort in hours.
    pub fn compute_hours(
        &self,
        task: &Task,
        attributes: &HashMap<String, f64>,
    ) -> Result<f64, FormulaError> {
        formula::compute_hours(task, attributes)
    }

    /// Computes effort for every task, writing `calculated_hours` in place.
    ///
    /// A failing formula is non-fatal: the task falls back to zero hours
    /// and the failure is recorded and logged with the offending formula.
    pub fn apply_formulas(
        &self,
        tasks: &mut [Task],
        attributes: &HashMap<String, f64>,
    ) -> Vec<FormulaFailure> {
        let mut failures = Vec::new();
        for task in tasks.iter_mut() {
            match formula::compute_hours(task, attributes) {
                Ok(hours) => task.calculated_hours = hours,
                Err(error) => {
                    let formula = task.hours_formula.clone().unwrap_or_default();
                    warn!(
                        task = %task.id,
                        formula = %formula,
                        %error,
                        "formula failed; falling back to 0 hours"
                    );
                    failures.push(FormulaFailure {
                        task_id: task.id.clone(),
                        formula,
                        error: error.to_string(),
                    });
                    task.calculated_hours = 0.0;
                }
            }
        }
        failures
    }

    /// Splits tasks into implementation and sustainment buckets.
    pub fn classify(&self, tasks: Vec<Task>) -> Classification {
        Classifier::new(self.config.sustainment_keywords.iter().cloned()).separate(tasks)
    }

    /// Free hours per member per business day in `[start, end]`.
    pub fn get_availability(
        &self,
        store: &dyn AllocationStore,
        members: &[TeamMember],
        start: NaiveDate,
        end: NaiveDate,
        required_hours: Option<f64>,
    ) -> Result<Vec<ResourceAvailability>, StoreError> {
        AvailabilityCalculator::new(&self.config).get_availability(
            store,
            members,
            start,
            end,
            required_hours,
        )
    }

    /// Places tasks on the business calendar from `project_start`.
    pub fn schedule(&self, tasks: &[Task], project_start: NaiveDateTime) -> ScheduleOutcome {
        TimelineScheduler::new(self.config.calendar.clone()).schedule(tasks, project_start)
    }

    /// Allocates members to the scheduled tasks' roles over `[start, end]`.
    pub fn auto_allocate(
        &self,
        project_id: &str,
        scheduled_tasks: &[Task],
        members: &[TeamMember],
        store: &mut dyn AllocationStore,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<AllocationReport, StoreError> {
        AutoAllocator::new(&self.config).auto_allocate(
            project_id,
            scheduled_tasks,
            members,
            store,
            start,
            end,
        )
    }

    /// Runs a full planning pass: compute effort, classify, schedule the
    /// implementation bucket, and cost both buckets.
    ///
    /// Sustainment tasks keep their computed effort but receive no dates.
    /// The pass is a pure function of its inputs.
    pub fn plan(
        &self,
        tasks: Vec<Task>,
        attributes: &HashMap<String, f64>,
        members: &[TeamMember],
        project_start: NaiveDateTime,
    ) -> ProjectPlan {
        let mut tasks = tasks;
        let formula_failures = self.apply_formulas(&mut tasks, attributes);

        let Classification {
            implementation,
            sustainment,
        } = self.classify(tasks);

        let outcome = self.schedule(&implementation, project_start);
        let cost = CostSummary::calculate(&outcome.tasks, &sustainment, members);

        debug!(
            implementation = outcome.tasks.len(),
            sustainment = sustainment.len(),
            formula_failures = formula_failures.len(),
            anomalies = outcome.anomalies.len(),
            "planning pass complete"
        );

        ProjectPlan {
            implementation: outcome.tasks,
            sustainment,
            formula_failures,
            anomalies: outcome.anomalies,
            cost,
        }
    }
}
