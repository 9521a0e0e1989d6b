//! # Slotwise Core Library
//!
//! Ranks open appointment slots by how likely a client is to accept them.
//! Two signal sources are combined: the preference statement in the client's
//! memo ("tuesday mornings or Fridays at 2PM") and the client's recent booking
//! history. The CLI binary is a thin shell over this library.
//!
//! ## Architecture
//!
//! - **Preference**: memo text parser producing a day/period/hour predicate
//! - **Behavior**: trailing-window booking statistics (dominant day, hour, period)
//! - **Scoring**: deterministic additive model with a pluggable extra signal
//! - **Ranking**: orchestration, top-N selection and an optional signal cache
//! - **Storage**: TOML configuration of ranking defaults
//!
//! Every component is a pure function of its inputs; "now" is passed in
//! explicitly so results are reproducible.
//!
//! ## Key Components
//!
//! - [`PreferenceParser`]: memo text to [`PreferencePredicate`]
//! - [`BehavioralAnalyzer`]: history to [`BehavioralProfile`]
//! - [`ScoringEngine`]: one slot to a confidence and reason
//! - [`RankingEngine`]: candidates to top suggestions

pub mod behavior;
pub mod error;
pub mod preference;
pub mod ranking;
pub mod scoring;
pub mod storage;
pub mod time;

pub use behavior::{BehavioralAnalyzer, BehavioralProfile};
pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use preference::{PreferenceParser, PreferencePredicate};
pub use ranking::{
    ClientAnalysis, ClientSignals, RankRequest, RankResponse, RankingEngine, RejectedInput,
    SignalCache, SlotSuggestion,
};
pub use scoring::{Enrichment, NoopEnricher, ScoredSlot, ScoringEngine, Signal, SignalEnricher};
pub use storage::EngineConfig;
pub use time::{CandidateSlot, TimePeriod};
