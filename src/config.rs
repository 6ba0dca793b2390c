//! Engine configuration.
//!
//! One structure holding every tunable the engine consults: the business
//! calendar, the default daily capacity, the allocator's eligibility
//! threshold and the sustainment keyword list. Passed into the engine
//! explicitly; nothing here is process-global.

use serde::{Deserialize, Serialize};

use crate::classify::DEFAULT_SUSTAINMENT_KEYWORDS;
use crate::models::BusinessCalendar;

/// Tunables for a scheduling and allocation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Working window for placement and availability.
    pub calendar: BusinessCalendar,
    /// Hours per day assumed for members without an explicit capacity.
    pub default_daily_capacity: f64,
    /// Fraction of a role's required hours a member must be able to cover
    /// to be considered for allocation (0.5 = half).
    pub eligibility_threshold: f64,
    /// Phase/epic keywords that classify a task as sustainment. Matched
    /// after lowercasing and diacritic folding.
    pub sustainment_keywords: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            calendar: BusinessCalendar::default(),
            default_daily_capacity: 8.0,
            eligibility_threshold: 0.5,
            sustainment_keywords: DEFAULT_SUSTAINMENT_KEYWORDS
                .iter()
                .map(|k| (*k).to_string())
                .collect(),
        }
    }
}

impl EngineConfig {
    /// Sets the business calendar.
    pub fn with_calendar(mut self, calendar: BusinessCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Sets the default daily capacity in hours.
    pub fn with_default_daily_capacity(mut self, hours: f64) -> Self {
        self.default_daily_capacity = hours;
        self
    }

    /// Sets the allocator eligibility threshold.
    pub fn with_eligibility_threshold(mut self, fraction: f64) -> Self {
        self.eligibility_threshold = fraction;
        self
    }

    /// Replaces the sustainment keyword list.
    pub fn with_sustainment_keywords(
        mut self,
        keywords: impl IntoIterator<Item = String>,
    ) -> Self {
        self.sustainment_keywords = keywords.into_iter().collect();
        self
    }

    /// Adds one sustainment keyword.
    pub fn with_sustainment_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.sustainment_keywords.push(keyword.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!((config.default_daily_capacity - 8.0).abs() < 1e-10);
        assert!((config.eligibility_threshold - 0.5).abs() < 1e-10);
        assert!(config
            .sustainment_keywords
            .iter()
            .any(|k| k == "sustentacao"));
        assert_eq!(config.calendar, BusinessCalendar::default());
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::default()
            .with_default_daily_capacity(6.0)
            .with_eligibility_threshold(0.3)
            .with_sustainment_keyword("operacao assistida");

        assert!((config.default_daily_capacity - 6.0).abs() < 1e-10);
        assert!((config.eligibility_threshold - 0.3).abs() < 1e-10);
        assert!(config
            .sustainment_keywords
            .iter()
            .any(|k| k == "operacao assistida"));
    }
}
