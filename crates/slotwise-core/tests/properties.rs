//! Property tests for parser, analyzer, scorer and ranking invariants.

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use proptest::prelude::*;
use slotwise_core::{
    BehavioralAnalyzer, CandidateSlot, PreferenceParser, RankingEngine, ScoringEngine,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

fn at_offset_hours(hours_from_now: i64) -> DateTime<FixedOffset> {
    (now() + Duration::hours(hours_from_now)).with_timezone(&FixedOffset::east_opt(0).unwrap())
}

/// Words with no day, period or clock meaning.
fn filler_word() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "please", "call", "first", "prefers", "the", "clinic", "parking", "is", "hard",
        "no", "video", "sessions", "room", "blue", "ok", "thanks",
    ])
    .prop_map(str::to_string)
}

fn memo_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "monday", "tue", "Fridays", "weekend", "mornings", "evening", "night", "2PM",
            "9a", "14:00", "noon", "or", "and", "at", "please", "12am",
        ]),
        0..8,
    )
    .prop_map(|words| words.join(" "))
}

proptest! {
    #[test]
    fn tokenless_text_parses_to_empty(words in prop::collection::vec(filler_word(), 0..12)) {
        let text = words.join(" ");
        prop_assert!(PreferenceParser::new().parse(&text).is_empty());
    }

    #[test]
    fn parser_never_panics(text in ".{0,80}") {
        let predicate = PreferenceParser::new().parse(&text);
        prop_assert!(predicate.days_of_week.iter().all(|d| *d < 7));
        prop_assert!(predicate.exact_hours.iter().all(|h| *h < 24));
    }

    #[test]
    fn profile_counts_only_in_window(offsets in prop::collection::vec(-24 * 7 * 12i64..24 * 7 * 2, 0..40)) {
        let history: Vec<_> = offsets.iter().map(|h| at_offset_hours(*h)).collect();
        let analyzer = BehavioralAnalyzer::new(4);
        let profile = analyzer.analyze(&history, now());

        let expected = offsets
            .iter()
            .filter(|h| **h <= 0 && **h >= -24 * 7 * 4)
            .count() as u32;
        prop_assert_eq!(profile.total_appointments, expected);
        prop_assert_eq!(profile.day_counts.iter().sum::<u32>(), expected);
        prop_assert_eq!(profile.hour_counts.iter().sum::<u32>(), expected);
        prop_assert_eq!(profile.period_counts.iter().sum::<u32>(), expected);
        prop_assert_eq!(profile.dominant_day.is_some(), expected > 0);
    }

    #[test]
    fn confidence_is_bounded_and_idempotent(
        memo in memo_text(),
        history_offsets in prop::collection::vec(-24 * 7 * 6i64..0, 0..20),
        slot_offset in 0i64..24 * 14,
    ) {
        let history: Vec<_> = history_offsets.iter().map(|h| at_offset_hours(*h)).collect();
        let predicate = PreferenceParser::new().parse(&memo);
        let profile = BehavioralAnalyzer::default().analyze(&history, now());
        let slot = CandidateSlot::new(at_offset_hours(slot_offset));

        let engine = ScoringEngine::new();
        let first = engine.score(&slot, &predicate, &profile);
        let second = engine.score(&slot, &predicate, &profile);
        prop_assert!((0.0..=1.0).contains(&first.confidence));
        prop_assert!(first.confidence >= 0.5);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn ranking_is_bounded_and_sorted(
        memo in memo_text(),
        slot_offsets in prop::collection::vec(0i64..24 * 14, 0..12),
    ) {
        let candidates: Vec<_> = slot_offsets
            .iter()
            .map(|h| CandidateSlot::new(at_offset_hours(*h)))
            .collect();
        let suggestions = RankingEngine::new().rank("p", &memo, &[], &candidates, now());

        prop_assert_eq!(suggestions.len(), candidates.len().min(3));
        for pair in suggestions.windows(2) {
            prop_assert!(pair[0].confidence >= pair[1].confidence);
            if pair[0].confidence == pair[1].confidence {
                prop_assert!(pair[0].start_time <= pair[1].start_time);
            }
        }
    }
}
