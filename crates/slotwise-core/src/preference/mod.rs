//! Stated preferences parsed from a client's memo text.
//!
//! The memo is free text such as "tuesday mornings or Fridays at 2PM". It is
//! reduced to a [`PreferencePredicate`]: a set of weekdays, a set of day periods
//! and a set of exact hours. An empty predicate means "no stated preference".

mod parser;

pub use parser::PreferenceParser;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::time::{day_name, hour_label, TimePeriod};

/// Structured form of a memo's stated preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencePredicate {
    /// Weekday indices, Monday=0.
    pub days_of_week: BTreeSet<u8>,
    pub time_periods: BTreeSet<TimePeriod>,
    /// Hours of day (0-23) named literally in the text.
    pub exact_hours: BTreeSet<u8>,
}

impl PreferencePredicate {
    /// True when no day, period or hour was recognized.
    pub fn is_empty(&self) -> bool {
        self.days_of_week.is_empty() && self.time_periods.is_empty() && self.exact_hours.is_empty()
    }

    pub fn matches_day(&self, weekday: u8) -> bool {
        self.days_of_week.contains(&weekday)
    }

    /// The first stated period (canonical order) containing `hour`.
    pub fn matching_period(&self, hour: u8) -> Option<TimePeriod> {
        self.time_periods.iter().copied().find(|p| p.contains(hour))
    }

    pub fn matches_exact_hour(&self, hour: u8) -> bool {
        self.exact_hours.contains(&hour)
    }

    /// Human-readable fragments, one per non-empty category.
    pub fn describe(&self) -> Vec<String> {
        let mut parts = Vec::new();
        if !self.days_of_week.is_empty() {
            let days: Vec<&str> = self.days_of_week.iter().map(|d| day_name(*d)).collect();
            parts.push(format!("Stated preference for: {}", days.join(", ")));
        }
        if !self.time_periods.is_empty() {
            let periods: Vec<String> = self
                .time_periods
                .iter()
                .map(|p| format!("{}s", p.name()))
                .collect();
            parts.push(format!("Preferred time periods: {}", periods.join(", ")));
        }
        if !self.exact_hours.is_empty() {
            let hours: Vec<String> = self.exact_hours.iter().map(|h| hour_label(*h)).collect();
            parts.push(format!("Preferred times: {}", hours.join(", ")));
        }
        parts
    }
}
