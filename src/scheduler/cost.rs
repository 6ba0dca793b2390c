//! Cost reporting over classified tasks.
//!
//! Aggregates effort hours by role across the implementation and
//! sustainment buckets and prices them with the mean hourly rate of the
//! active members holding each role. Roles carrying hours without a
//! priced member are listed separately instead of silently costing zero.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{Task, TeamMember};

/// Hours and cost attributed to one role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleCost {
    /// Effort hours across both buckets.
    pub hours: f64,
    /// Mean hourly rate of active members holding the role.
    pub hourly_rate: f64,
    /// `hours * hourly_rate`.
    pub cost: f64,
}

/// Cost breakdown of a planning pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    /// Total effort hours of calendar-scheduled work.
    pub implementation_hours: f64,
    /// Total effort hours of sustainment work.
    pub sustainment_hours: f64,
    /// Per-role hours and cost, keyed by role code.
    pub cost_by_role: BTreeMap<String, RoleCost>,
    /// Sum of all role costs.
    pub total_cost: f64,
    /// Roles with hours but no active member to price them.
    pub unpriced_roles: Vec<String>,
}

impl CostSummary {
    /// Computes the summary from both task buckets and the team roster.
    pub fn calculate(
        implementation: &[Task],
        sustainment: &[Task],
        members: &[TeamMember],
    ) -> Self {
        let mut rates: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        for member in members.iter().filter(|m| m.active) {
            let entry = rates.entry(member.position.as_str()).or_insert((0.0, 0));
            entry.0 += member.hourly_rate;
            entry.1 += 1;
        }

        let implementation_hours: f64 = implementation.iter().map(Task::effort_hours).sum();
        let sustainment_hours: f64 = sustainment.iter().map(Task::effort_hours).sum();

        let mut hours_by_role: BTreeMap<&str, f64> = BTreeMap::new();
        for task in implementation.iter().chain(sustainment) {
            *hours_by_role.entry(task.owner.as_str()).or_insert(0.0) += task.effort_hours();
        }

        let mut cost_by_role = BTreeMap::new();
        let mut total_cost = 0.0;
        let mut unpriced_roles = Vec::new();

        for (role, hours) in hours_by_role {
            let hourly_rate = match rates.get(role) {
                Some((sum, count)) if *count > 0 => sum / *count as f64,
                _ => {
                    unpriced_roles.push(role.to_string());
                    0.0
                }
            };
            let cost = hours * hourly_rate;
            total_cost += cost;
            cost_by_role.insert(
                role.to_string(),
                RoleCost {
                    hours,
                    hourly_rate,
                    cost,
                },
            );
        }

        Self {
            implementation_hours,
            sustainment_hours,
            cost_by_role,
            total_cost,
            unpriced_roles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, owner: &str, hours: f64) -> Task {
        Task::new(id).with_owner(owner).with_fixed_hours(hours)
    }

    #[test]
    fn test_bucket_totals() {
        let implementation = vec![task("T1", "BK", 10.0), task("T2", "FE", 6.0)];
        let sustainment = vec![task("S1", "BK", 4.0)];
        let members = vec![
            TeamMember::new("m1", "BK").with_hourly_rate(100.0),
            TeamMember::new("m2", "FE").with_hourly_rate(80.0),
        ];

        let summary = CostSummary::calculate(&implementation, &sustainment, &members);
        assert!((summary.implementation_hours - 16.0).abs() < 1e-10);
        assert!((summary.sustainment_hours - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_role_costing_uses_mean_rate() {
        let implementation = vec![task("T1", "BK", 10.0)];
        let members = vec![
            TeamMember::new("m1", "BK").with_hourly_rate(100.0),
            TeamMember::new("m2", "BK").with_hourly_rate(140.0),
        ];

        let summary = CostSummary::calculate(&implementation, &[], &members);
        let bk = &summary.cost_by_role["BK"];
        assert!((bk.hourly_rate - 120.0).abs() < 1e-10);
        assert!((bk.cost - 1200.0).abs() < 1e-10);
        assert!((summary.total_cost - 1200.0).abs() < 1e-10);
    }

    #[test]
    fn test_sustainment_hours_are_costed() {
        let sustainment = vec![task("S1", "BK", 8.0)];
        let members = vec![TeamMember::new("m1", "BK").with_hourly_rate(100.0)];

        let summary = CostSummary::calculate(&[], &sustainment, &members);
        assert!((summary.cost_by_role["BK"].cost - 800.0).abs() < 1e-10);
    }

    #[test]
    fn test_unpriced_role_listed() {
        let implementation = vec![task("T1", "QA", 5.0)];
        let members = vec![TeamMember::new("m1", "BK").with_hourly_rate(100.0)];

        let summary = CostSummary::calculate(&implementation, &[], &members);
        assert_eq!(summary.unpriced_roles, vec!["QA".to_string()]);
        assert!((summary.cost_by_role["QA"].cost - 0.0).abs() < 1e-10);
        assert!((summary.total_cost - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_inactive_members_do_not_price() {
        let implementation = vec![task("T1", "BK", 5.0)];
        let members = vec![TeamMember::new("m1", "BK")
            .with_hourly_rate(100.0)
            .inactive()];

        let summary = CostSummary::calculate(&implementation, &[], &members);
        assert_eq!(summary.unpriced_roles, vec!["BK".to_string()]);
    }

    #[test]
    fn test_empty_inputs() {
        let summary = CostSummary::calculate(&[], &[], &[]);
        assert_eq!(summary.implementation_hours, 0.0);
        assert_eq!(summary.total_cost, 0.0);
        assert!(summary.cost_by_role.is_empty());
        assert!(summary.unpriced_roles.is_empty());
    }
}
