//! Slot ranking.
//!
//! Orchestrates the pipeline for one client: the memo is parsed once, the
//! history is analyzed once, every candidate is scored, and the best `top_n`
//! are returned. Ties on confidence go to the earliest start time.

mod cache;

pub use cache::{CacheKey, SignalCache};

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use crate::behavior::{
    validate_window_weeks, BehavioralAnalyzer, BehavioralProfile, DEFAULT_WINDOW_WEEKS,
};
use crate::error::{Result, ValidationError};
use crate::preference::{PreferenceParser, PreferencePredicate};
use crate::scoring::{ScoredSlot, ScoringEngine};
use crate::storage::EngineConfig;
use crate::time::{parse_timestamp, CandidateSlot, DEFAULT_DURATION_MINUTES};

/// Number of suggestions returned by default.
pub const DEFAULT_TOP_N: usize = 3;

/// Derived per-client signals, shareable through [`SignalCache`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSignals {
    pub predicate: PreferencePredicate,
    pub profile: BehavioralProfile,
}

/// One ranked slot as surfaced to end users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSuggestion {
    pub start_time: DateTime<FixedOffset>,
    /// Acceptance probability rounded to two decimals.
    pub confidence: f64,
    pub reason: String,
    pub duration_minutes: u32,
}

impl From<ScoredSlot> for SlotSuggestion {
    fn from(scored: ScoredSlot) -> Self {
        Self {
            start_time: scored.slot.start_time,
            confidence: round_to_hundredths(scored.confidence),
            reason: scored.reason,
            duration_minutes: scored.slot.duration_minutes,
        }
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Ranking request as handed over by a calling layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankRequest {
    #[serde(deserialize_with = "client_id_from_string_or_number")]
    pub client_id: String,
    #[serde(default)]
    pub memo: Option<String>,
    /// Past appointment start times, ISO-8601 with offset.
    #[serde(default, alias = "history")]
    pub appointment_history: Vec<String>,
    /// Open slot start times, ISO-8601 with offset.
    #[serde(default, alias = "candidates")]
    pub candidate_slots: Vec<String>,
    #[serde(default)]
    pub window_weeks: Option<u32>,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
}

impl RankRequest {
    /// Read a JSON request.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Json`](crate::CoreError::Json) when the input is not a valid request.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Read a JSON request from a file.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`](crate::CoreError::Io) when the file cannot be opened and
    /// [`CoreError::Json`](crate::CoreError::Json) when its content is not a valid request.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

fn client_id_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

/// An input entry that was skipped because it could not be read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedInput {
    /// Offending field, e.g. `candidate_slots[2]`.
    pub field: String,
    pub value: String,
    pub error: String,
}

impl From<ValidationError> for RejectedInput {
    fn from(err: ValidationError) -> Self {
        let value = match &err {
            ValidationError::InvalidTimestamp { value, .. } => value.clone(),
            ValidationError::InvalidValue { .. } => String::new(),
        };
        Self {
            field: err.field().to_string(),
            value,
            error: err.to_string(),
        }
    }
}

/// Ranking response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankResponse {
    pub client_id: String,
    pub suggestions: Vec<SlotSuggestion>,
    pub explanation: String,
    pub requires_confirmation: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<RejectedInput>,
}

/// Fixed explanation line shown alongside the suggestions.
pub fn explanation(count: usize) -> String {
    format!("Top {count} time slots ranked by client preference analysis")
}

/// Stated and observed preferences for a client, without ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientAnalysis {
    pub client_id: String,
    pub predicate: PreferencePredicate,
    pub profile: BehavioralProfile,
    pub summary: String,
}

/// Ranks candidate slots for a client.
#[derive(Debug, Clone)]
pub struct RankingEngine {
    parser: PreferenceParser,
    scorer: ScoringEngine,
    window_weeks: u32,
    duration_minutes: u32,
    top_n: usize,
    cache: Option<Arc<SignalCache>>,
}

impl Default for RankingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RankingEngine {
    pub fn new() -> Self {
        Self {
            parser: PreferenceParser::new(),
            scorer: ScoringEngine::new(),
            window_weeks: DEFAULT_WINDOW_WEEKS,
            duration_minutes: DEFAULT_DURATION_MINUTES,
            top_n: DEFAULT_TOP_N,
            cache: None,
        }
    }

    /// Engine with defaults taken from configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        let engine = Self::new()
            .with_window_weeks(config.history.window_weeks)
            .with_duration_minutes(config.ranking.duration_minutes)
            .with_top_n(config.ranking.top_n);
        if config.cache.enabled {
            engine.with_cache(Arc::new(SignalCache::new()))
        } else {
            engine
        }
    }

    pub fn with_scorer(mut self, scorer: ScoringEngine) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_cache(mut self, cache: Arc<SignalCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_window_weeks(mut self, window_weeks: u32) -> Self {
        self.window_weeks = window_weeks;
        self
    }

    pub fn with_duration_minutes(mut self, duration_minutes: u32) -> Self {
        self.duration_minutes = duration_minutes;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn cache(&self) -> Option<&Arc<SignalCache>> {
        self.cache.as_ref()
    }

    /// Parse the memo and analyze the history, through the cache when enabled.
    pub fn signals(
        &self,
        client_id: &str,
        memo: &str,
        history: &[DateTime<FixedOffset>],
        window_weeks: u32,
        now: DateTime<Utc>,
    ) -> Arc<ClientSignals> {
        let analyzer = BehavioralAnalyzer::new(window_weeks);
        let compute = || ClientSignals {
            predicate: self.parser.parse(memo),
            profile: analyzer.analyze(history, now),
        };
        let Some(cache) = &self.cache else {
            return Arc::new(compute());
        };

        // Only in-window appointments shape the profile, so they alone form the key.
        let in_window: Vec<_> = history
            .iter()
            .filter(|start| analyzer.in_window(start, now))
            .copied()
            .collect();
        let key = CacheKey::new(client_id, memo, &in_window, analyzer.window_weeks());
        let cached = cache.get_or_compute(key, compute);

        let window_start = analyzer.window_start(now);
        if cached.profile.window_start == window_start {
            cached
        } else {
            let mut signals = (*cached).clone();
            signals.profile.window_start = window_start;
            Arc::new(signals)
        }
    }

    /// Score every candidate and return them best first.
    ///
    /// Order: confidence descending, then start instant ascending, then input
    /// position for identical instants.
    pub fn score_all(&self, signals: &ClientSignals, candidates: &[CandidateSlot]) -> Vec<ScoredSlot> {
        let mut scored: Vec<ScoredSlot> = candidates
            .iter()
            .map(|slot| self.scorer.score(slot, &signals.predicate, &signals.profile))
            .collect();
        scored.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then_with(|| a.slot.start_time.cmp(&b.slot.start_time))
        });
        scored
    }

    /// Top suggestions for already-parsed inputs, using the engine's window.
    pub fn rank(
        &self,
        client_id: &str,
        memo: &str,
        history: &[DateTime<FixedOffset>],
        candidates: &[CandidateSlot],
        now: DateTime<Utc>,
    ) -> Vec<SlotSuggestion> {
        self.rank_with_window(client_id, memo, history, candidates, self.window_weeks, now)
    }

    fn rank_with_window(
        &self,
        client_id: &str,
        memo: &str,
        history: &[DateTime<FixedOffset>],
        candidates: &[CandidateSlot],
        window_weeks: u32,
        now: DateTime<Utc>,
    ) -> Vec<SlotSuggestion> {
        if candidates.is_empty() {
            return Vec::new();
        }
        let signals = self.signals(client_id, memo, history, window_weeks, now);
        self.score_all(&signals, candidates)
            .into_iter()
            .take(self.top_n)
            .map(SlotSuggestion::from)
            .collect()
    }

    /// Rank a raw request.
    ///
    /// Unreadable history or candidate timestamps are skipped and listed in
    /// [`RankResponse::rejected`]; the remaining candidates are still ranked.
    ///
    /// # Errors
    ///
    /// Returns a validation error when `duration_minutes` is zero, negative or
    /// does not fit in 32 bits, or when `window_weeks` is outside `1..=520`.
    pub fn rank_request(&self, request: &RankRequest, now: DateTime<Utc>) -> Result<RankResponse> {
        let duration_minutes = match request.duration_minutes {
            None => self.duration_minutes,
            Some(minutes) => validate_duration(minutes)?,
        };
        let window_weeks = match request.window_weeks {
            None => self.window_weeks,
            Some(weeks) => validate_window_weeks(weeks)?,
        };
        let memo = request.memo.as_deref().unwrap_or("");

        let mut rejected = Vec::new();
        let history = collect_valid(
            "appointment_history",
            &request.appointment_history,
            &mut rejected,
            |field, value| parse_timestamp(field, value),
        );
        let candidates = collect_valid(
            "candidate_slots",
            &request.candidate_slots,
            &mut rejected,
            |field, value| CandidateSlot::parse(field, value, duration_minutes),
        );

        for skipped in &rejected {
            tracing::warn!(
                client_id = %request.client_id,
                field = %skipped.field,
                value = %skipped.value,
                "skipping unreadable timestamp"
            );
        }

        let suggestions = self.rank_with_window(
            &request.client_id,
            memo,
            &history,
            &candidates,
            window_weeks,
            now,
        );
        tracing::debug!(
            client_id = %request.client_id,
            candidates = candidates.len(),
            history = history.len(),
            rejected = rejected.len(),
            returned = suggestions.len(),
            "ranked candidate slots"
        );

        Ok(RankResponse {
            client_id: request.client_id.clone(),
            explanation: explanation(suggestions.len()),
            suggestions,
            requires_confirmation: true,
            rejected,
        })
    }

    /// [`rank_request`](Self::rank_request) evaluated at the current time.
    pub fn rank_request_now(&self, request: &RankRequest) -> Result<RankResponse> {
        self.rank_request(request, Utc::now())
    }

    /// Stated and behavioral preferences for a client, with a readable summary.
    pub fn analyze_client(
        &self,
        client_id: &str,
        memo: &str,
        history: &[DateTime<FixedOffset>],
        now: DateTime<Utc>,
    ) -> ClientAnalysis {
        let signals = self.signals(client_id, memo, history, self.window_weeks, now);
        ClientAnalysis {
            client_id: client_id.to_string(),
            summary: BehavioralAnalyzer::summarize(&signals.predicate, &signals.profile),
            predicate: signals.predicate.clone(),
            profile: signals.profile.clone(),
        }
    }
}

fn validate_duration(minutes: i64) -> Result<u32, ValidationError> {
    if minutes <= 0 {
        return Err(ValidationError::InvalidValue {
            field: "duration_minutes".to_string(),
            message: format!("must be positive, got {minutes}"),
        });
    }
    u32::try_from(minutes).map_err(|_| ValidationError::InvalidValue {
        field: "duration_minutes".to_string(),
        message: format!("too large: {minutes}"),
    })
}

fn collect_valid<T, F>(
    field: &str,
    values: &[String],
    rejected: &mut Vec<RejectedInput>,
    parse: F,
) -> Vec<T>
where
    F: Fn(&str, &str) -> Result<T, ValidationError>,
{
    values
        .iter()
        .enumerate()
        .filter_map(|(i, value)| match parse(&format!("{field}[{i}]"), value) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                rejected.push(err.into());
                None
            }
        })
        .collect()
}
