//! Integration tests for the full ranking pipeline.

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use slotwise_core::scoring::NO_SIGNAL_REASON;
use slotwise_core::{
    BehavioralAnalyzer, CandidateSlot, PreferenceParser, RankRequest, RankingEngine,
    ScoringEngine, Signal, TimePeriod,
};

/// Sunday 2024-01-14 12:00 UTC. The week after starts Monday 2024-01-15.
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 14, 12, 0, 0).unwrap()
}

fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(y, m, d, h, 0, 0)
        .unwrap()
}

fn slot(y: i32, m: u32, d: u32, h: u32) -> CandidateSlot {
    CandidateSlot::new(utc(y, m, d, h))
}

const MEMO: &str = "tuesday mornings or Fridays at 2PM";

#[test]
fn scenario_a_tuesday_morning() {
    let predicate = PreferenceParser::new().parse(MEMO);
    assert!(predicate.days_of_week.contains(&1));
    assert!(predicate.time_periods.contains(&TimePeriod::Morning));

    let suggestions = RankingEngine::new().rank("alice", MEMO, &[], &[slot(2024, 1, 16, 9)], now());
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].confidence, 0.85);
    assert!(suggestions[0].reason.contains("Tuesday"));
    assert!(suggestions[0].reason.contains("morning"));
}

#[test]
fn scenario_b_friday_two_pm() {
    let suggestions = RankingEngine::new().rank("alice", MEMO, &[], &[slot(2024, 1, 19, 14)], now());
    assert_eq!(suggestions[0].confidence, 0.95);
    assert!(suggestions[0].reason.contains("Friday"));
    assert!(suggestions[0].reason.contains("2:00 PM"));
}

#[test]
fn scenario_c_monday_ten_am_history() {
    let history: Vec<_> = (1..=5)
        .map(|weeks| utc(2024, 1, 15, 10) - Duration::weeks(weeks))
        .collect();
    let profile = BehavioralAnalyzer::default().analyze(&history, now());
    assert_eq!(profile.total_appointments, 5);
    assert_eq!(profile.dominant_day, Some(0));
    assert_eq!(profile.dominant_hour, Some(10));

    let predicate = PreferenceParser::new().parse("");
    let scored = ScoringEngine::new().score(&slot(2024, 1, 15, 10), &predicate, &profile);
    assert!(scored.signals.contains(&Signal::BehavioralDay));
    assert!(scored.signals.contains(&Signal::BehavioralNearHour));
    // Ten o'clock is also in the dominant (morning) period.
    assert!(scored.signals.contains(&Signal::BehavioralPeriod));
    assert_eq!(scored.confidence, 0.85);
}

#[test]
fn behavioral_day_and_near_hour_outside_dominant_period() {
    let history: Vec<_> = (1..=5)
        .map(|weeks| utc(2024, 1, 15, 11) - Duration::weeks(weeks))
        .collect();
    let suggestions = RankingEngine::new().rank("carol", "", &history, &[slot(2024, 1, 15, 12)], now());
    assert_eq!(suggestions[0].confidence, 0.75);
}

#[test]
fn scenario_d_no_signals() {
    let suggestions = RankingEngine::new().rank("dave", "", &[], &[slot(2024, 1, 17, 15)], now());
    assert_eq!(suggestions[0].confidence, 0.5);
    assert_eq!(suggestions[0].reason, NO_SIGNAL_REASON);
}

#[test]
fn scenario_e_five_candidates_top_three() {
    let candidates = vec![
        slot(2024, 1, 15, 16), // Monday afternoon: 0.50
        slot(2024, 1, 19, 14), // Friday 2PM: 0.95
        slot(2024, 1, 17, 10), // Wednesday morning: 0.65
        slot(2024, 1, 16, 9),  // Tuesday morning: 0.85
        slot(2024, 1, 19, 9),  // Friday morning: 0.85
    ];
    let suggestions = RankingEngine::new().rank("alice", MEMO, &[], &candidates, now());
    assert_eq!(suggestions.len(), 3);
    let confidences: Vec<f64> = suggestions.iter().map(|s| s.confidence).collect();
    assert_eq!(confidences, vec![0.95, 0.85, 0.85]);
    // Tied 0.85 slots come out earliest first.
    assert_eq!(suggestions[1].start_time, utc(2024, 1, 16, 9));
    assert_eq!(suggestions[2].start_time, utc(2024, 1, 19, 9));
}

#[test]
fn never_returns_more_than_candidates() {
    let engine = RankingEngine::new();
    assert!(engine.rank("x", MEMO, &[], &[], now()).is_empty());
    let two = [slot(2024, 1, 16, 9), slot(2024, 1, 17, 9)];
    assert_eq!(engine.rank("x", MEMO, &[], &two, now()).len(), 2);
}

#[test]
fn output_order_does_not_depend_on_input_order() {
    let mut candidates = vec![
        slot(2024, 1, 18, 9),
        slot(2024, 1, 16, 15),
        slot(2024, 1, 17, 9),
        slot(2024, 1, 15, 9),
    ];
    let engine = RankingEngine::new();
    let forward = engine.rank("x", "mornings", &[], &candidates, now());
    candidates.reverse();
    let backward = engine.rank("x", "mornings", &[], &candidates, now());
    assert_eq!(forward, backward);
    assert_eq!(forward[0].start_time, utc(2024, 1, 15, 9));
}

#[test]
fn stated_and_behavioral_signals_combine() {
    let history: Vec<_> = (1..=4)
        .map(|weeks| utc(2024, 1, 16, 9) - Duration::weeks(weeks))
        .collect();
    let suggestions = RankingEngine::new().rank(
        "alice",
        "Tuesday mornings at 9am",
        &history,
        &[slot(2024, 1, 16, 9)],
        now(),
    );
    assert_eq!(suggestions[0].confidence, 1.0);
    assert!(suggestions[0]
        .reason
        .starts_with("Matches stated preference for Tuesday; falls in stated morning preference"));
}

#[test]
fn json_request_end_to_end() {
    let json = r#"{
        "client_id": 12,
        "memo": "wednesday at 9A or saturday mornings",
        "appointment_history": [
            "2024-01-10T09:00:00-05:00",
            "2024-01-03T09:00:00-05:00",
            "2024-01-06T10:00:00-05:00"
        ],
        "candidate_slots": [
            "2024-01-17T09:00:00-05:00",
            "2024-01-20T10:00:00-05:00",
            "2024-01-18T16:00:00-05:00",
            "next tuesday"
        ]
    }"#;
    let request: RankRequest = serde_json::from_str(json).unwrap();
    let response = RankingEngine::new().rank_request(&request, now()).unwrap();

    assert_eq!(response.client_id, "12");
    assert_eq!(response.suggestions.len(), 3);
    assert_eq!(response.explanation, "Top 3 time slots ranked by client preference analysis");
    assert!(response.requires_confirmation);
    assert_eq!(response.rejected.len(), 1);
    assert_eq!(response.rejected[0].field, "candidate_slots[3]");

    // Wednesday 9A collects all six bonuses. Saturday 10A also caps at 1.0 and
    // loses the tie on start time.
    let first = &response.suggestions[0];
    assert_eq!(first.start_time.to_rfc3339(), "2024-01-17T09:00:00-05:00");
    assert_eq!(first.confidence, 1.0);

    let output = serde_json::to_value(&response).unwrap();
    assert_eq!(output["suggestions"][0]["duration_minutes"], 50);
}
