//! Slot acceptance scoring.
//!
//! Deterministic additive model over six signals:
//!
//! | Signal | Condition | Bonus |
//! |---|---|---|
//! | Stated day | slot weekday in stated days | +0.20 |
//! | Stated period | slot hour in a stated period | +0.15 |
//! | Stated exact time | slot hour in stated hours | +0.25 |
//! | Behavioral day | slot weekday is the dominant day | +0.15 |
//! | Behavioral near hour | within one hour of the dominant hour | +0.10 |
//! | Behavioral period | slot hour in the dominant period | +0.10 |
//!
//! Base is 0.50 and the total is capped at 1.0. Arithmetic is done in integer
//! hundredths so equal inputs always produce bit-identical confidences.

mod enricher;

pub use enricher::{Enrichment, NoopEnricher, SignalEnricher, MAX_ENRICHMENT_POINTS};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::behavior::BehavioralProfile;
use crate::preference::PreferencePredicate;
use crate::time::{day_name, hour_label, CandidateSlot};

/// Score every slot starts from, in hundredths.
pub const BASE_POINTS: u32 = 50;
/// Cap on the total, in hundredths.
pub const MAX_POINTS: u32 = 100;

/// Reason used when no bonus fired.
pub const NO_SIGNAL_REASON: &str = "No specific preference signal; default probability.";

/// A scoring bonus. Declaration order is reason priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    StatedDay,
    StatedPeriod,
    StatedExactTime,
    BehavioralDay,
    BehavioralNearHour,
    BehavioralPeriod,
}

impl Signal {
    pub const ALL: [Signal; 6] = [
        Signal::StatedDay,
        Signal::StatedPeriod,
        Signal::StatedExactTime,
        Signal::BehavioralDay,
        Signal::BehavioralNearHour,
        Signal::BehavioralPeriod,
    ];

    /// Bonus in hundredths.
    pub fn points(self) -> u32 {
        match self {
            Signal::StatedDay => 20,
            Signal::StatedPeriod => 15,
            Signal::StatedExactTime => 25,
            Signal::BehavioralDay => 15,
            Signal::BehavioralNearHour => 10,
            Signal::BehavioralPeriod => 10,
        }
    }

    pub fn bonus(self) -> f64 {
        f64::from(self.points()) / 100.0
    }

    fn fires(self, slot: &CandidateSlot, predicate: &PreferencePredicate, profile: &BehavioralProfile) -> bool {
        let (weekday, hour) = (slot.weekday(), slot.hour());
        match self {
            Signal::StatedDay => predicate.matches_day(weekday),
            Signal::StatedPeriod => predicate.matching_period(hour).is_some(),
            Signal::StatedExactTime => predicate.matches_exact_hour(hour),
            Signal::BehavioralDay => profile.matches_day(weekday),
            Signal::BehavioralNearHour => profile.near_dominant_hour(hour),
            Signal::BehavioralPeriod => profile.matches_period(hour),
        }
    }

    fn clause(self, slot: &CandidateSlot, predicate: &PreferencePredicate, profile: &BehavioralProfile) -> String {
        let day = day_name(slot.weekday());
        match self {
            Signal::StatedDay => format!("matches stated preference for {day}"),
            Signal::StatedPeriod => {
                let period = predicate.matching_period(slot.hour()).unwrap_or(slot.period());
                format!("falls in stated {period} preference")
            }
            Signal::StatedExactTime => {
                format!("matches stated time of {}", hour_label(slot.hour()))
            }
            Signal::BehavioralDay => format!("matches usual {day} pattern"),
            Signal::BehavioralNearHour => {
                let usual = profile.dominant_hour.unwrap_or(slot.hour());
                format!("close to usual {} start", hour_label(usual))
            }
            Signal::BehavioralPeriod => format!("fits usual {} pattern", slot.period()),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Signal::StatedDay => "stated_day",
            Signal::StatedPeriod => "stated_period",
            Signal::StatedExactTime => "stated_exact_time",
            Signal::BehavioralDay => "behavioral_day",
            Signal::BehavioralNearHour => "behavioral_near_hour",
            Signal::BehavioralPeriod => "behavioral_period",
        };
        f.write_str(name)
    }
}

/// Result of scoring one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSlot {
    pub slot: CandidateSlot,
    /// Capped total in hundredths.
    pub points: u32,
    /// `points / 100`, always in `[0.0, 1.0]`.
    pub confidence: f64,
    pub reason: String,
    /// Built-in signals that fired, in priority order.
    pub signals: Vec<Signal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<Enrichment>,
}

/// Scores candidate slots against stated and behavioral signals.
#[derive(Clone)]
pub struct ScoringEngine {
    enricher: Arc<dyn SignalEnricher>,
}

impl fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoringEngine")
            .field("enricher", &self.enricher.name())
            .finish()
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringEngine {
    /// Engine using only the built-in signals.
    pub fn new() -> Self {
        Self::with_enricher(Arc::new(NoopEnricher))
    }

    pub fn with_enricher(enricher: Arc<dyn SignalEnricher>) -> Self {
        Self { enricher }
    }

    pub fn enricher_name(&self) -> &str {
        self.enricher.name()
    }

    /// Score a single slot. Pure: same inputs, same output.
    pub fn score(
        &self,
        slot: &CandidateSlot,
        predicate: &PreferencePredicate,
        profile: &BehavioralProfile,
    ) -> ScoredSlot {
        let signals: Vec<Signal> = Signal::ALL
            .into_iter()
            .filter(|s| s.fires(slot, predicate, profile))
            .collect();

        let mut raw = BASE_POINTS + signals.iter().map(|s| s.points()).sum::<u32>();
        let mut clauses: Vec<String> = signals
            .iter()
            .map(|s| s.clause(slot, predicate, profile))
            .collect();

        let enrichment = self
            .enricher
            .enrich(slot, predicate, profile)
            .map(|e| e.clamped())
            .filter(|e| e.points() > 0);
        if let Some(extra) = &enrichment {
            raw += extra.points();
            if !extra.clause.is_empty() {
                clauses.push(extra.clause.clone());
            }
        }

        let points = raw.min(MAX_POINTS);
        let reason = if clauses.is_empty() {
            NO_SIGNAL_REASON.to_string()
        } else {
            capitalize(&clauses.join("; "))
        };

        tracing::trace!(
            start = %slot.start_time,
            points,
            signals = ?signals,
            "scored slot"
        );

        ScoredSlot {
            slot: slot.clone(),
            points,
            confidence: f64::from(points) / 100.0,
            reason,
            signals,
            enrichment,
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
