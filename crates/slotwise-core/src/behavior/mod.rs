//! Behavioral booking patterns.
//!
//! A client's recent appointment history is tabulated into weekday, hour and
//! period frequencies. The dominant entries feed the behavioral bonuses of the
//! scorer.

mod analyzer;

pub use analyzer::{validate_window_weeks, BehavioralAnalyzer, DEFAULT_WINDOW_WEEKS, MAX_WINDOW_WEEKS};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::TimePeriod;

/// Frequency statistics over a trailing window of past appointments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralProfile {
    /// Count per weekday index, Monday=0.
    pub day_counts: [u32; 7],
    /// Count per hour of day.
    pub hour_counts: [u32; 24],
    /// Count per period, indexed by [`TimePeriod::index`].
    pub period_counts: [u32; 4],
    pub total_appointments: u32,
    pub dominant_day: Option<u8>,
    pub dominant_hour: Option<u8>,
    pub dominant_period: Option<TimePeriod>,
    pub window_weeks: u32,
    /// Earliest instant included in the window.
    pub window_start: DateTime<Utc>,
}

impl BehavioralProfile {
    /// Profile with no appointments.
    pub fn empty(window_weeks: u32, window_start: DateTime<Utc>) -> Self {
        Self {
            day_counts: [0; 7],
            hour_counts: [0; 24],
            period_counts: [0; 4],
            total_appointments: 0,
            dominant_day: None,
            dominant_hour: None,
            dominant_period: None,
            window_weeks,
            window_start,
        }
    }

    pub fn has_history(&self) -> bool {
        self.total_appointments > 0
    }

    pub fn period_count(&self, period: TimePeriod) -> u32 {
        self.period_counts[period.index()]
    }

    /// True when the slot weekday is the client's most frequent day.
    pub fn matches_day(&self, weekday: u8) -> bool {
        self.dominant_day == Some(weekday)
    }

    /// True when `hour` is within one hour of the most frequent start hour.
    ///
    /// Distance is plain arithmetic on 0-23; 23 and 0 are not neighbors.
    pub fn near_dominant_hour(&self, hour: u8) -> bool {
        self.dominant_hour
            .map(|dominant| hour.abs_diff(dominant) <= 1)
            .unwrap_or(false)
    }

    pub fn matches_period(&self, hour: u8) -> bool {
        self.dominant_period
            .map(|period| period.contains(hour))
            .unwrap_or(false)
    }
}
