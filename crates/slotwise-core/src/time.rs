//! Shared time vocabulary: weekday indices, named day periods, and candidate slots.
//!
//! Weekdays are indexed Monday=0 .. Sunday=6. Hours are read in the offset the
//! timestamp was supplied with, so "Tuesday 09:00-05:00" is a Tuesday-morning slot
//! regardless of where the engine runs.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Default appointment length in minutes.
pub const DEFAULT_DURATION_MINUTES: u32 = 50;

const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Full English name for a weekday index (Monday=0).
pub fn day_name(day: u8) -> &'static str {
    DAY_NAMES.get(day as usize).copied().unwrap_or("Unknown")
}

/// Render an hour of day as a 12-hour clock label, e.g. `14` -> `2:00 PM`.
pub fn hour_label(hour: u8) -> String {
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display}:00 {suffix}")
}

/// Named period of the day.
///
/// Each hour belongs to exactly one period; `Night` wraps midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriod {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimePeriod {
    /// All periods in canonical order.
    pub const ALL: [TimePeriod; 4] = [
        TimePeriod::Morning,
        TimePeriod::Afternoon,
        TimePeriod::Evening,
        TimePeriod::Night,
    ];

    /// Half-open hour interval `[start, end)`. Night returns `(21, 6)`.
    pub fn hours(self) -> (u8, u8) {
        match self {
            TimePeriod::Morning => (6, 12),
            TimePeriod::Afternoon => (12, 17),
            TimePeriod::Evening => (17, 21),
            TimePeriod::Night => (21, 6),
        }
    }

    /// Whether `hour` falls inside this period.
    pub fn contains(self, hour: u8) -> bool {
        let (start, end) = self.hours();
        if start < end {
            (start..end).contains(&hour)
        } else {
            hour >= start || hour < end
        }
    }

    /// The period an hour of day belongs to.
    pub fn of_hour(hour: u8) -> TimePeriod {
        Self::ALL
            .into_iter()
            .find(|p| p.contains(hour))
            .unwrap_or(TimePeriod::Night)
    }

    /// Position in canonical order, used for array-backed counters.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            TimePeriod::Morning => "morning",
            TimePeriod::Afternoon => "afternoon",
            TimePeriod::Evening => "evening",
            TimePeriod::Night => "night",
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse an ISO-8601/RFC 3339 timestamp carrying an offset.
///
/// `field` names the input the value came from and is echoed back in the error.
pub fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<FixedOffset>, ValidationError> {
    DateTime::parse_from_rfc3339(value.trim()).map_err(|e| ValidationError::InvalidTimestamp {
        field: field.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// An open appointment time offered for ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub start_time: DateTime<FixedOffset>,
    pub duration_minutes: u32,
}

impl CandidateSlot {
    pub fn new(start_time: DateTime<FixedOffset>) -> Self {
        Self {
            start_time,
            duration_minutes: DEFAULT_DURATION_MINUTES,
        }
    }

    pub fn with_duration(start_time: DateTime<FixedOffset>, duration_minutes: u32) -> Self {
        Self {
            start_time,
            duration_minutes,
        }
    }

    /// Parse a candidate from its ISO-8601 start time.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimestamp`] naming `field` when the
    /// value has no offset or is not a valid timestamp.
    pub fn parse(field: &str, value: &str, duration_minutes: u32) -> Result<Self, ValidationError> {
        Ok(Self::with_duration(parse_timestamp(field, value)?, duration_minutes))
    }

    /// Weekday index, Monday=0.
    pub fn weekday(&self) -> u8 {
        self.start_time.weekday().num_days_from_monday() as u8
    }

    /// Hour of day (0-23) in the slot's own offset.
    pub fn hour(&self) -> u8 {
        self.start_time.hour() as u8
    }

    pub fn period(&self) -> TimePeriod {
        TimePeriod::of_hour(self.hour())
    }

    pub fn end_time(&self) -> DateTime<FixedOffset> {
        self.start_time + Duration::minutes(i64::from(self.duration_minutes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_hour_has_exactly_one_period() {
        for hour in 0..24u8 {
            let matching = TimePeriod::ALL.iter().filter(|p| p.contains(hour)).count();
            assert_eq!(matching, 1, "hour {hour}");
        }
    }

    #[test]
    fn night_wraps_midnight() {
        assert!(TimePeriod::Night.contains(21));
        assert!(TimePeriod::Night.contains(23));
        assert!(TimePeriod::Night.contains(0));
        assert!(TimePeriod::Night.contains(5));
        assert!(!TimePeriod::Night.contains(6));
        assert!(!TimePeriod::Night.contains(20));
    }

    #[test]
    fn period_boundaries_are_half_open() {
        assert_eq!(TimePeriod::of_hour(6), TimePeriod::Morning);
        assert_eq!(TimePeriod::of_hour(11), TimePeriod::Morning);
        assert_eq!(TimePeriod::of_hour(12), TimePeriod::Afternoon);
        assert_eq!(TimePeriod::of_hour(16), TimePeriod::Afternoon);
        assert_eq!(TimePeriod::of_hour(17), TimePeriod::Evening);
        assert_eq!(TimePeriod::of_hour(21), TimePeriod::Night);
    }

    #[test]
    fn slot_reads_weekday_and_hour_in_own_offset() {
        // 2024-01-16 is a Tuesday.
        let slot = CandidateSlot::parse("slot", "2024-01-16T09:00:00-05:00", 50).unwrap();
        assert_eq!(slot.weekday(), 1);
        assert_eq!(slot.hour(), 9);
        assert_eq!(slot.period(), TimePeriod::Morning);
        assert_eq!(slot.end_time().to_rfc3339(), "2024-01-16T09:50:00-05:00");
    }

    #[test]
    fn slot_without_offset_is_rejected() {
        let err = CandidateSlot::parse("candidate_slots[0]", "2024-01-16T09:00:00", 50).unwrap_err();
        assert_eq!(err.field(), "candidate_slots[0]");
    }

    #[test]
    fn hour_labels() {
        assert_eq!(hour_label(0), "12:00 AM");
        assert_eq!(hour_label(9), "9:00 AM");
        assert_eq!(hour_label(12), "12:00 PM");
        assert_eq!(hour_label(14), "2:00 PM");
    }

    #[test]
    fn day_names() {
        assert_eq!(day_name(0), "Monday");
        assert_eq!(day_name(6), "Sunday");
        assert_eq!(day_name(9), "Unknown");
    }
}
