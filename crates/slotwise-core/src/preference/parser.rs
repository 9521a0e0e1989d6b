//! Memo text parser.
//!
//! Three independent token scans run over the same normalized text:
//! day names, period words and clock times. One phrase can feed several
//! categories ("Fridays at 2PM" yields a day and an exact hour).

use super::PreferencePredicate;
use crate::time::TimePeriod;

const WEEKDAYS: &[u8] = &[0, 1, 2, 3, 4];
const WEEKEND: &[u8] = &[5, 6];

/// Parser turning free-text memos into a [`PreferencePredicate`].
///
/// Parsing never fails: text with nothing recognizable yields the empty predicate.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreferenceParser;

impl PreferenceParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, text: &str) -> PreferencePredicate {
        let tokens = tokenize(text);
        let mut predicate = PreferencePredicate::default();

        for token in &tokens {
            if let Some(days) = day_indices(token) {
                predicate.days_of_week.extend(days.iter().copied());
            }
            if let Some(period) = period_word(token) {
                predicate.time_periods.insert(period);
            }
        }

        let mut i = 0;
        while i < tokens.len() {
            let next = tokens.get(i + 1).map(String::as_str);
            if let Some((hour, consumed_next)) = clock_hour(&tokens[i], next) {
                predicate.exact_hours.insert(hour);
                if consumed_next {
                    i += 1;
                }
            }
            i += 1;
        }

        tracing::trace!(?predicate, "parsed memo preferences");
        predicate
    }
}

/// Lower-case, drop periods and apostrophes, turn other punctuation into spaces.
///
/// Dropping periods keeps "p.m." together as "pm".
fn tokenize(text: &str) -> Vec<String> {
    let mut normalized = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '.' | '\'' | '\u{2019}' => {}
            c if c.is_alphanumeric() || c == ':' => normalized.extend(c.to_lowercase()),
            _ => normalized.push(' '),
        }
    }
    normalized.split_whitespace().map(str::to_string).collect()
}

fn day_indices(token: &str) -> Option<&'static [u8]> {
    let days: &'static [u8] = match token {
        "monday" | "mondays" | "mon" => &[0],
        "tuesday" | "tuesdays" | "tue" | "tues" => &[1],
        "wednesday" | "wednesdays" | "wed" | "weds" => &[2],
        "thursday" | "thursdays" | "thu" | "thur" | "thurs" => &[3],
        "friday" | "fridays" | "fri" => &[4],
        "saturday" | "saturdays" | "sat" => &[5],
        "sunday" | "sundays" | "sun" => &[6],
        "weekday" | "weekdays" => WEEKDAYS,
        "weekend" | "weekends" => WEEKEND,
        _ => return None,
    };
    Some(days)
}

fn period_word(token: &str) -> Option<TimePeriod> {
    match token {
        "morning" | "mornings" => Some(TimePeriod::Morning),
        "afternoon" | "afternoons" => Some(TimePeriod::Afternoon),
        "evening" | "evenings" => Some(TimePeriod::Evening),
        "night" | "nights" => Some(TimePeriod::Night),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Meridiem {
    Am,
    Pm,
}

fn meridiem(suffix: &str) -> Option<Meridiem> {
    match suffix {
        "a" | "am" => Some(Meridiem::Am),
        "p" | "pm" => Some(Meridiem::Pm),
        _ => None,
    }
}

/// Read a 24-hour hour out of a clock token.
///
/// Returns the hour and whether the following token (a detached "am"/"pm")
/// was consumed.
fn clock_hour(token: &str, next: Option<&str>) -> Option<(u8, bool)> {
    match token {
        "noon" => return Some((12, false)),
        "midnight" => return Some((0, false)),
        _ => {}
    }

    let digits_end = token.find(|c: char| !c.is_ascii_digit()).unwrap_or(token.len());
    if digits_end == 0 || digits_end > 2 {
        return None;
    }
    let hour: u8 = token[..digits_end].parse().ok()?;
    let mut rest = &token[digits_end..];

    let mut has_minutes = false;
    if let Some(after_colon) = rest.strip_prefix(':') {
        let minutes = after_colon.get(..2)?;
        if !minutes.bytes().all(|b| b.is_ascii_digit()) || minutes.parse::<u8>().ok()? > 59 {
            return None;
        }
        has_minutes = true;
        rest = &after_colon[2..];
    }

    let (marker, consumed_next) = if rest.is_empty() {
        // A detached suffix must be spelled out; a lone "a" is usually an article.
        match next {
            Some(n @ ("am" | "pm")) => (meridiem(n), true),
            _ => (None, false),
        }
    } else {
        (Some(meridiem(rest)?), false)
    };

    let hour = match marker {
        Some(m) => to_24_hour(hour, m)?,
        None if has_minutes && hour <= 23 => hour,
        None => return None,
    };
    Some((hour, consumed_next))
}

fn to_24_hour(hour: u8, marker: Meridiem) -> Option<u8> {
    if !(1..=12).contains(&hour) {
        return None;
    }
    Some(match (marker, hour) {
        (Meridiem::Am, 12) => 0,
        (Meridiem::Am, h) => h,
        (Meridiem::Pm, 12) => 12,
        (Meridiem::Pm, h) => h + 12,
    })
}
