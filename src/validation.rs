//! Input validation for scheduling passes.
//!
//! Checks structural integrity of tasks and team members before the
//! engine runs. Detects:
//! - Duplicate task and member IDs
//! - `depends_on` references to unknown tasks
//! - Cycles in the dependency relation (which must form a forest)
//! - Negative fixed hours
//!
//! Cycle detection works on an arena view: tasks live in a vector and
//! dependencies are resolved to indices, then chains of single
//! predecessors are walked with color marks. Each task has at most one
//! predecessor, so a cycle shows up as a chain that reaches a node
//! already on the current walk.

use std::collections::{HashMap, HashSet};

use crate::models::{Task, TeamMember};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two tasks share the same ID.
    DuplicateTaskId,
    /// Two members share the same ID.
    DuplicateMemberId,
    /// A task depends on an ID that matches no task.
    UnknownDependency,
    /// The dependency relation contains a cycle.
    CyclicDependency,
    /// A task declares negative fixed hours.
    NegativeHours,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the inputs of a scheduling pass.
///
/// Returns `Ok(())` if all checks pass, `Err(errors)` with every detected
/// issue otherwise.
pub fn validate_input(tasks: &[Task], members: &[TeamMember]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut index: HashMap<&str, usize> = HashMap::new();
    for (i, task) in tasks.iter().enumerate() {
        if index.insert(task.id.as_str(), i).is_some() {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateTaskId,
                format!("duplicate task ID: {}", task.id),
            ));
        }
        if let Some(fixed) = task.fixed_hours {
            if fixed < 0.0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NegativeHours,
                    format!("task '{}' has negative fixed hours ({fixed})", task.id),
                ));
            }
        }
    }

    let mut member_ids = HashSet::new();
    for member in members {
        if !member_ids.insert(member.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateMemberId,
                format!("duplicate member ID: {}", member.id),
            ));
        }
    }

    // Resolve dependencies to indices; unknown references are reported and
    // excluded from the cycle walk.
    let deps: Vec<Option<usize>> = tasks
        .iter()
        .map(|task| match &task.depends_on {
            Some(dep) => {
                let resolved = index.get(dep.as_str()).copied();
                if resolved.is_none() {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::UnknownDependency,
                        format!("task '{}' depends on unknown task '{dep}'", task.id),
                    ));
                }
                resolved
            }
            None => None,
        })
        .collect();

    errors.extend(detect_cycles(tasks, &deps));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

const UNVISITED: u8 = 0;
const ON_WALK: u8 = 1;
const DONE: u8 = 2;

fn detect_cycles(tasks: &[Task], deps: &[Option<usize>]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut state = vec![UNVISITED; tasks.len()];

    for start in 0..tasks.len() {
        if state[start] != UNVISITED {
            continue;
        }
        let mut walk = Vec::new();
        let mut current = start;
        loop {
            match state[current] {
                UNVISITED => {
                    state[current] = ON_WALK;
                    walk.push(current);
                    match deps[current] {
                        Some(parent) => current = parent,
                        None => break,
                    }
                }
                ON_WALK => {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::CyclicDependency,
                        format!(
                            "circular dependency detected involving task '{}'",
                            tasks[current].id
                        ),
                    ));
                    break;
                }
                _ => break, // reached an already-cleared chain
            }
        }
        for &visited in &walk {
            state[visited] = DONE;
        }
    }

    errors
}
