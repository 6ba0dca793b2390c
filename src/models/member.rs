//! Team member model.
//!
//! A team member is a concrete person holding a role (`position`). Tasks
//! reference roles, not individuals; members are matched to scheduled work
//! by the allocator through their position.

use serde::{Deserialize, Serialize};

/// A person who can be allocated to scheduled work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    /// Unique member identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Role code (matched against `Task::owner`).
    pub position: String,
    /// Working hours per day. `None` means the engine default applies.
    pub daily_capacity: Option<f64>,
    /// Economic cost per hour, used for cost reporting.
    pub hourly_rate: f64,
    /// Whether the member participates in availability and allocation.
    pub active: bool,
}

impl TeamMember {
    /// Creates an active member with the given id and role.
    pub fn new(id: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            position: position.into(),
            daily_capacity: None,
            hourly_rate: 0.0,
            active: true,
        }
    }

    /// Sets the member name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the daily capacity in hours.
    pub fn with_daily_capacity(mut self, hours: f64) -> Self {
        self.daily_capacity = Some(hours);
        self
    }

    /// Sets the hourly rate.
    pub fn with_hourly_rate(mut self, rate: f64) -> Self {
        self.hourly_rate = rate;
        self
    }

    /// Marks the member inactive.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Daily capacity, or the given default when unset.
    pub fn capacity_or(&self, default: f64) -> f64 {
        self.daily_capacity.unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_builder() {
        let m = TeamMember::new("m1", "BK")
            .with_name("Ana")
            .with_daily_capacity(6.0)
            .with_hourly_rate(120.0);

        assert_eq!(m.id, "m1");
        assert_eq!(m.position, "BK");
        assert_eq!(m.daily_capacity, Some(6.0));
        assert!((m.hourly_rate - 120.0).abs() < 1e-10);
        assert!(m.active);
    }

    #[test]
    fn test_capacity_default() {
        let m = TeamMember::new("m1", "FE");
        assert!((m.capacity_or(8.0) - 8.0).abs() < 1e-10);

        let m = m.with_daily_capacity(7.0);
        assert!((m.capacity_or(8.0) - 7.0).abs() < 1e-10);
    }

    #[test]
    fn test_inactive() {
        let m = TeamMember::new("m1", "QA").inactive();
        assert!(!m.active);
    }
}
