//! Pluggable extra signal for the scorer.
//!
//! An enricher may contribute one additional bonus per slot, e.g. from a
//! language-model reading of the memo. The default does nothing, which keeps
//! the built-in model exact and offline.

use serde::{Deserialize, Serialize};

use crate::behavior::BehavioralProfile;
use crate::preference::PreferencePredicate;
use crate::time::CandidateSlot;

/// Largest bonus an enricher may add, in hundredths.
pub const MAX_ENRICHMENT_POINTS: u32 = 20;

/// Extra bonus and the clause explaining it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    /// Requested bonus in `[0.0, 0.20]`; values outside are clamped.
    pub bonus: f64,
    pub clause: String,
}

impl Enrichment {
    pub fn new(bonus: f64, clause: impl Into<String>) -> Self {
        Self {
            bonus,
            clause: clause.into(),
        }
    }

    /// Bonus in hundredths after clamping and rounding.
    pub fn points(&self) -> u32 {
        if !self.bonus.is_finite() || self.bonus <= 0.0 {
            return 0;
        }
        let max = f64::from(MAX_ENRICHMENT_POINTS);
        (self.bonus * 100.0).round().min(max) as u32
    }

    /// Copy with `bonus` set to the value actually applied and a trimmed clause.
    pub fn clamped(&self) -> Self {
        Self {
            bonus: f64::from(self.points()) / 100.0,
            clause: self.clause.trim().to_string(),
        }
    }
}

/// Source of an optional additional scoring signal.
pub trait SignalEnricher: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &str;

    /// Extra bonus for `slot`, or `None` when the enricher has nothing to add.
    fn enrich(
        &self,
        _slot: &CandidateSlot,
        _predicate: &PreferencePredicate,
        _profile: &BehavioralProfile,
    ) -> Option<Enrichment> {
        None // default no-op
    }
}

/// Enricher that never contributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEnricher;

impl SignalEnricher for NoopEnricher {
    fn name(&self) -> &str {
        "noop"
    }
}
