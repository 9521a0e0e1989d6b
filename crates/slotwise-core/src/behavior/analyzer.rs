//! Booking-history analyzer.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Timelike, Utc};

use super::BehavioralProfile;
use crate::error::ValidationError;
use crate::preference::PreferencePredicate;
use crate::time::{day_name, hour_label, TimePeriod};

/// Weeks of history considered when no override is given.
pub const DEFAULT_WINDOW_WEEKS: u32 = 6;

/// Longest window accepted; larger requests are clamped.
pub const MAX_WINDOW_WEEKS: u32 = 520;

/// Check a caller-supplied window length against `1..=MAX_WINDOW_WEEKS`.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidValue`] for `window_weeks` outside the range.
pub fn validate_window_weeks(window_weeks: u32) -> Result<u32, ValidationError> {
    if (1..=MAX_WINDOW_WEEKS).contains(&window_weeks) {
        Ok(window_weeks)
    } else {
        Err(ValidationError::InvalidValue {
            field: "window_weeks".to_string(),
            message: format!("must be between 1 and {MAX_WINDOW_WEEKS}, got {window_weeks}"),
        })
    }
}

/// Tabulates a trailing window of appointment start times.
#[derive(Debug, Clone, Copy)]
pub struct BehavioralAnalyzer {
    window_weeks: u32,
}

impl Default for BehavioralAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_WEEKS)
    }
}

impl BehavioralAnalyzer {
    pub fn new(window_weeks: u32) -> Self {
        Self {
            window_weeks: window_weeks.min(MAX_WINDOW_WEEKS),
        }
    }

    pub fn window_weeks(&self) -> u32 {
        self.window_weeks
    }

    /// Earliest instant still inside the window ending at `now`.
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::weeks(i64::from(self.window_weeks))
    }

    /// Whether `start` lies within `[now - window, now]`.
    pub fn in_window(&self, start: &DateTime<FixedOffset>, now: DateTime<Utc>) -> bool {
        let instant = start.with_timezone(&Utc);
        instant >= self.window_start(now) && instant <= now
    }

    /// Build a profile from appointments within `[now - window, now]`.
    ///
    /// Weekday and hour come from each timestamp's own offset. Appointments
    /// after `now` are not past behavior and are left out.
    pub fn analyze(&self, history: &[DateTime<FixedOffset>], now: DateTime<Utc>) -> BehavioralProfile {
        let window_start = self.window_start(now);
        let mut profile = BehavioralProfile::empty(self.window_weeks, window_start);

        for start in history.iter().filter(|s| self.in_window(s, now)) {
            let day = start.weekday().num_days_from_monday() as usize;
            let hour = start.hour() as u8;
            profile.day_counts[day] += 1;
            profile.hour_counts[hour as usize] += 1;
            profile.period_counts[TimePeriod::of_hour(hour).index()] += 1;
            profile.total_appointments += 1;
        }

        if profile.has_history() {
            profile.dominant_day = argmax(&profile.day_counts).map(|i| i as u8);
            profile.dominant_hour = argmax(&profile.hour_counts).map(|i| i as u8);
            profile.dominant_period = argmax(&profile.period_counts).map(|i| TimePeriod::ALL[i]);
        }

        tracing::debug!(
            total = profile.total_appointments,
            considered = history.len(),
            window_weeks = self.window_weeks,
            dominant_day = ?profile.dominant_day,
            dominant_hour = ?profile.dominant_hour,
            "analyzed booking history"
        );
        profile
    }

    /// Human-readable summary of stated and observed preferences.
    pub fn summarize(predicate: &PreferencePredicate, profile: &BehavioralProfile) -> String {
        let mut parts = predicate.describe();

        if profile.has_history() {
            parts.push(format!(
                "Recent appointment pattern: {} appointments in last {} weeks",
                profile.total_appointments, profile.window_weeks
            ));
            if let Some(day) = profile.dominant_day {
                parts.push(format!("Most common day: {}", day_name(day)));
            }
            if let Some(hour) = profile.dominant_hour {
                parts.push(format!("Most common time: {}", hour_label(hour)));
            }
            if let Some(period) = profile.dominant_period {
                parts.push(format!("Shows preference for {period} appointments"));
            }
        }

        if parts.is_empty() {
            "No clear preference patterns identified".to_string()
        } else {
            parts.join("; ")
        }
    }
}

/// Index of the largest nonzero count; ties go to the lowest index.
fn argmax(counts: &[u32]) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (i, &count) in counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        match best {
            Some((_, top)) if count <= top => {}
            _ => best = Some((i, count)),
        }
    }
    best.map(|(i, _)| i)
}
