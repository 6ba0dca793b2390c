//! Automatic allocation of team members to scheduled work.
//!
//! Groups scheduled tasks by owner role, asks the availability calculator
//! for eligible members of that role, and splits the role's required hours
//! evenly across them, writing one allocation per member through the
//! store. Greedy and deterministic: roles are processed in sorted order
//! and members in the calculator's most-available-first ranking.
//!
//! The read-then-write window is optimistic. A concurrent writer may win
//! the race; the store rejects the losing write as a conflict, which is
//! counted and reported without aborting the rest of the batch.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::availability::AvailabilityCalculator;
use crate::config::EngineConfig;
use crate::models::{Allocation, Task, TeamMember};
use crate::store::{AllocationStore, StoreError};

/// One failed allocation write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationFailure {
    /// Role being allocated.
    pub role: String,
    /// Member the write targeted.
    pub member_id: String,
    /// Whether the store rejected the write as an overlap/capacity
    /// conflict (as opposed to a generic write failure).
    pub conflict: bool,
    /// Store error message.
    pub message: String,
}

/// Outcome of an allocation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationReport {
    /// Allocation records successfully written.
    pub allocated_count: usize,
    /// Tasks (for uncovered roles) plus failed writes.
    pub not_allocated_count: usize,
    /// Roles with no eligible member.
    pub not_allocated_roles: Vec<String>,
    /// Individual write failures, conflicts flagged.
    pub failures: Vec<AllocationFailure>,
}

/// Greedy member-to-role allocator.
#[derive(Debug, Clone)]
pub struct AutoAllocator<'a> {
    config: &'a EngineConfig,
}

impl<'a> AutoAllocator<'a> {
    /// Creates an allocator over the given configuration.
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Allocates members to the scheduled tasks' roles over `[start, end]`.
    ///
    /// Only an availability read failure aborts (it is retryable); write
    /// failures are counted per member and the batch continues.
    pub fn auto_allocate(
        &self,
        project_id: &str,
        scheduled_tasks: &[Task],
        members: &[TeamMember],
        store: &mut dyn AllocationStore,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<AllocationReport, StoreError> {
        let mut report = AllocationReport::default();

        // Required hours and task count per role, in deterministic order.
        let mut by_role: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        for task in scheduled_tasks {
            let entry = by_role.entry(task.owner.as_str()).or_insert((0.0, 0));
            entry.0 += task.effort_hours();
            entry.1 += 1;
        }

        let calculator = AvailabilityCalculator::new(self.config);

        for (role, (required_hours, task_count)) in by_role {
            let candidates: Vec<TeamMember> = members
                .iter()
                .filter(|m| m.position == role && m.active)
                .cloned()
                .collect();

            let eligible = calculator.get_availability(
                &*store,
                &candidates,
                start,
                end,
                Some(required_hours),
            )?;

            if eligible.is_empty() {
                report.not_allocated_count += task_count;
                report.not_allocated_roles.push(role.to_string());
                warn!(role, required_hours, "no eligible members for role");
                continue;
            }

            let share = required_hours / eligible.len() as f64;
            for availability in &eligible {
                let allocation =
                    Allocation::new(project_id, &availability.member_id, start, end, share);
                match store.create(allocation) {
                    Ok(_) => report.allocated_count += 1,
                    Err(err) => {
                        report.not_allocated_count += 1;
                        let conflict = err.is_conflict();
                        warn!(
                            role,
                            member = %availability.member_id,
                            conflict,
                            "allocation write failed: {err}"
                        );
                        report.failures.push(AllocationFailure {
                            role: role.to_string(),
                            member_id: availability.member_id.clone(),
                            conflict,
                            message: err.to_string(),
                        });
                    }
                }
            }
        }

        info!(
            allocated = report.allocated_count,
            not_allocated = report.not_allocated_count,
            "allocation pass complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryAllocationStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // Mon 2025-06-02 .. Fri 2025-06-13 (10 business days, 80h capacity)
    fn range() -> (NaiveDate, NaiveDate) {
        (date(2025, 6, 2), date(2025, 6, 13))
    }

    fn task(id: &str, owner: &str, hours: f64) -> Task {
        Task::new(id).with_owner(owner).with_fixed_hours(hours)
    }

    #[test]
    fn test_even_split_across_eligible_members() {
        let config = EngineConfig::default();
        let allocator = AutoAllocator::new(&config);
        let mut store = InMemoryAllocationStore::new();
        let (start, end) = range();

        let tasks = vec![task("T1", "BK", 24.0), task("T2", "BK", 16.0)];
        let members = vec![TeamMember::new("m1", "BK"), TeamMember::new("m2", "BK")];

        let report = allocator
            .auto_allocate("p1", &tasks, &members, &mut store, start, end)
            .unwrap();

        assert_eq!(report.allocated_count, 2);
        assert_eq!(report.not_allocated_count, 0);
        assert!(report.not_allocated_roles.is_empty());
        // 40h split evenly
        assert!(store
            .allocations()
            .iter()
            .all(|a| (a.allocated_hours - 20.0).abs() < 1e-10));
    }

    #[test]
    fn test_role_without_members_is_reported() {
        let config = EngineConfig::default();
        let allocator = AutoAllocator::new(&config);
        let mut store = InMemoryAllocationStore::new();
        let (start, end) = range();

        let tasks = vec![task("T1", "QA", 8.0), task("T2", "QA", 8.0)];
        let members = vec![TeamMember::new("m1", "BK")];

        let report = allocator
            .auto_allocate("p1", &tasks, &members, &mut store, start, end)
            .unwrap();

        assert_eq!(report.allocated_count, 0);
        assert_eq!(report.not_allocated_count, 2);
        assert_eq!(report.not_allocated_roles, vec!["QA".to_string()]);
    }

    #[test]
    fn test_negligible_member_excluded_by_threshold() {
        let config = EngineConfig::default();
        let allocator = AutoAllocator::new(&config);
        let (start, end) = range();
        let mut store = InMemoryAllocationStore::new();
        // m1 is booked 70h of 80h: 10h free, below half of 40h required
        store
            .create(Allocation::new("other", "m1", start, end, 70.0))
            .unwrap();

        let tasks = vec![task("T1", "BK", 40.0)];
        let members = vec![TeamMember::new("m1", "BK"), TeamMember::new("m2", "BK")];

        let report = allocator
            .auto_allocate("p1", &tasks, &members, &mut store, start, end)
            .unwrap();

        assert_eq!(report.allocated_count, 1);
        let new: Vec<_> = store
            .allocations()
            .iter()
            .filter(|a| a.project_id == "p1")
            .collect();
        assert_eq!(new.len(), 1);
        assert_eq!(new[0].member_id, "m2");
        assert!((new[0].allocated_hours - 40.0).abs() < 1e-10);
    }

    #[test]
    fn test_conflict_counted_and_batch_continues() {
        let config = EngineConfig::default();
        let allocator = AutoAllocator::new(&config);
        let (start, end) = range();
        // m1 passes the eligibility filter (40h free of 80h) but the write
        // of 35h more collides with the store's 8h/day cap on busy days.
        let mut store = InMemoryAllocationStore::new();
        store
            .create(Allocation::new("other", "m1", start, date(2025, 6, 6), 40.0))
            .unwrap();

        let tasks = vec![task("T1", "BK", 70.0)];
        let members = vec![TeamMember::new("m1", "BK"), TeamMember::new("m2", "BK")];

        let report = allocator
            .auto_allocate("p1", &tasks, &members, &mut store, start, end)
            .unwrap();

        // m2 takes its share; m1's write conflicts
        assert_eq!(report.allocated_count, 1);
        assert_eq!(report.not_allocated_count, 1);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].conflict);
        assert_eq!(report.failures[0].member_id, "m1");
    }

    #[test]
    fn test_multiple_roles_processed_independently() {
        let config = EngineConfig::default();
        let allocator = AutoAllocator::new(&config);
        let mut store = InMemoryAllocationStore::new();
        let (start, end) = range();

        let tasks = vec![
            task("T1", "BK", 16.0),
            task("T2", "FE", 8.0),
            task("T3", "QA", 8.0), // no QA member
        ];
        let members = vec![TeamMember::new("m1", "BK"), TeamMember::new("m2", "FE")];

        let report = allocator
            .auto_allocate("p1", &tasks, &members, &mut store, start, end)
            .unwrap();

        assert_eq!(report.allocated_count, 2);
        assert_eq!(report.not_allocated_count, 1);
        assert_eq!(report.not_allocated_roles, vec!["QA".to_string()]);
    }

    #[test]
    fn test_allocations_written_as_scheduled() {
        use crate::models::AllocationStatus;

        let config = EngineConfig::default();
        let allocator = AutoAllocator::new(&config);
        let mut store = InMemoryAllocationStore::new();
        let (start, end) = range();

        let tasks = vec![task("T1", "BK", 8.0)];
        let members = vec![TeamMember::new("m1", "BK")];

        allocator
            .auto_allocate("p1", &tasks, &members, &mut store, start, end)
            .unwrap();

        let written = &store.allocations()[0];
        assert_eq!(written.status, AllocationStatus::Scheduled);
        assert_eq!(written.project_id, "p1");
        assert_eq!(written.start_date, start);
        assert_eq!(written.end_date, end);
    }
}
