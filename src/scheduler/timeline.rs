//! Dependency-ordered timeline scheduler.
//!
//! Places tasks on the business calendar in dependency order, with one
//! sequential lane per owner role: a role works one task at a time, and a
//! task never starts before its predecessor ends. Deterministic, single
//! pass, no backtracking.
//!
//! # Placement rules
//!
//! - A start outside the working window clamps forward (weekend or past
//!   closing → next business morning; before opening → same morning).
//! - A task starting before noon and running into it absorbs one extra
//!   hour for lunch.
//! - An end at or past the closing hour carries its overflow, rounded up
//!   to whole hours, to the next business morning; the carry repeats until
//!   the end lands inside a workday. Multi-day tasks therefore schedule
//!   with a coarse whole-hour carry; callers wanting exact multi-day
//!   spreading should pre-split them.
//!
//! Structural problems (missing owner, unknown or cyclic dependencies)
//! are reported as anomalies alongside the placed tasks; the affected
//! task still gets a slot from safe defaults and the pass never aborts.

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{BusinessCalendar, Task};

/// Categories of scheduling anomalies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnomalyKind {
    /// The task has no owner role; it was placed at the project start.
    MissingOwner,
    /// The task is part of a dependency cycle; its dependency was ignored.
    DependencyCycle,
    /// The task depends on an id that matches no task; the dependency was
    /// ignored.
    UnresolvedDependency,
}

/// A structural problem found while scheduling.
///
/// Anomalies are reported, not thrown: the task is still placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingAnomaly {
    pub kind: AnomalyKind,
    pub task_id: String,
    pub message: String,
}

impl SchedulingAnomaly {
    fn new(kind: AnomalyKind, task_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            task_id: task_id.into(),
            message: message.into(),
        }
    }
}

/// The result of a scheduling pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleOutcome {
    /// The input tasks, in input order, with `start_date`/`end_date` set.
    pub tasks: Vec<Task>,
    /// Structural problems encountered during the pass.
    pub anomalies: Vec<SchedulingAnomaly>,
}

/// Places dependency-ordered tasks on the business calendar.
#[derive(Debug, Clone, Default)]
pub struct TimelineScheduler {
    calendar: BusinessCalendar,
}

impl TimelineScheduler {
    /// Creates a scheduler over the given calendar.
    pub fn new(calendar: BusinessCalendar) -> Self {
        Self { calendar }
    }

    /// Schedules tasks from `project_start`, returning them in input order
    /// with derived dates set.
    pub fn schedule(&self, tasks: &[Task], project_start: NaiveDateTime) -> ScheduleOutcome {
        let mut anomalies = Vec::new();
        let index: HashMap<&str, usize> = tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.as_str(), i))
            .collect();

        let order = placement_order(tasks, &index, &mut anomalies);

        let mut out = tasks.to_vec();
        let mut owner_cursor: HashMap<String, NaiveDateTime> = HashMap::new();
        let mut completed: HashMap<String, NaiveDateTime> = HashMap::new();

        for &i in &order {
            let task = &out[i];

            let mut start = if task.owner.is_empty() {
                anomalies.push(SchedulingAnomaly::new(
                    AnomalyKind::MissingOwner,
                    &task.id,
                    format!("task '{}' has no owner; placed at project start", task.id),
                ));
                project_start
            } else {
                owner_cursor
                    .get(&task.owner)
                    .copied()
                    .unwrap_or(project_start)
            };

            if let Some(dep) = &task.depends_on {
                if let Some(&dep_end) = completed.get(dep) {
                    if dep_end > start {
                        start = dep_end;
                    }
                } else if !index.contains_key(dep.as_str()) {
                    anomalies.push(SchedulingAnomaly::new(
                        AnomalyKind::UnresolvedDependency,
                        &task.id,
                        format!("task '{}' depends on unknown task '{dep}'", task.id),
                    ));
                }
                // A known dependency with no recorded end is a cycle
                // member, already reported during ordering.
            }

            let start = self.calendar.clamp_start(start);
            let end = self.place_end(start, task.effort_hours());

            let owner = task.owner.clone();
            let id = task.id.clone();
            let placed = &mut out[i];
            placed.start_date = Some(start);
            placed.end_date = Some(end);
            if !owner.is_empty() {
                owner_cursor.insert(owner, end);
            }
            completed.insert(id, end);
        }

        for anomaly in &anomalies {
            warn!(task = %anomaly.task_id, kind = ?anomaly.kind, "{}", anomaly.message);
        }

        ScheduleOutcome { tasks: out, anomalies }
    }

    /// Computes the end timestamp for a task of `hours` starting at
    /// `start` (already clamped into the working window).
    fn place_end(&self, start: NaiveDateTime, hours: f64) -> NaiveDateTime {
        let cal = &self.calendar;

        let mut duration = hours;
        if (start.hour() as f64) < cal.lunch_hour as f64
            && start.hour() as f64 + hours >= cal.lunch_hour as f64
        {
            duration += 1.0;
        }

        let mut base = start;
        let mut end = base + Duration::minutes((duration * 60.0).round() as i64);

        // A zero-width window has no workday to carry into.
        if cal.end_hour <= cal.start_hour {
            return end;
        }

        // Carry overflow past the closing hour to the next business
        // morning until the end lands inside a workday. Each iteration
        // shrinks the overflow by a full workday, so this terminates for
        // any finite duration.
        loop {
            let close = cal.day_close(base.date());
            if end < close {
                break;
            }
            let over_minutes = (end - close).num_minutes();
            let mut overflow = over_minutes / 60;
            if over_minutes % 60 > 0 {
                overflow += 1;
            }
            if overflow > 3 {
                // restarting at the morning, the carried hours cross noon
                overflow += 1;
            }
            base = cal.day_start(cal.next_business_day(base.date()));
            end = base + Duration::hours(overflow);
        }

        end
    }
}

fn key(task: &Task, position: usize) -> (i32, usize) {
    (task.order, position)
}

/// Topological placement order: a task is ready once its predecessor is
/// placed (or it has none); among ready tasks the smallest (`order`,
/// input position) goes first. Tasks stuck in cycles are appended in the
/// same key order, each with a reported anomaly.
fn placement_order(
    tasks: &[Task],
    index: &HashMap<&str, usize>,
    anomalies: &mut Vec<SchedulingAnomaly>,
) -> Vec<usize> {
    let deps: Vec<Option<usize>> = tasks
        .iter()
        .map(|t| {
            t.depends_on
                .as_deref()
                .and_then(|d| index.get(d).copied())
        })
        .collect();

    let mut pending: Vec<usize> = (0..tasks.len()).collect();
    pending.sort_by_key(|&i| key(&tasks[i], i));

    let mut placed = vec![false; tasks.len()];
    let mut order = Vec::with_capacity(tasks.len());

    loop {
        let ready = pending
            .iter()
            .position(|&i| deps[i].map_or(true, |d| placed[d]));
        match ready {
            Some(slot) => {
                let i = pending.remove(slot);
                placed[i] = true;
                order.push(i);
            }
            None => break,
        }
    }

    // Whatever is left depends (directly or transitively) on itself.
    for &i in &pending {
        anomalies.push(SchedulingAnomaly::new(
            AnomalyKind::DependencyCycle,
            &tasks[i].id,
            format!(
                "task '{}' is part of a dependency cycle; scheduling without the dependency",
                tasks[i].id
            ),
        ));
        order.push(i);
    }

    order
}
