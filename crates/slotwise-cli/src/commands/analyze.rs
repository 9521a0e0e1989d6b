use chrono::Utc;
use clap::Args;
use slotwise_core::behavior::validate_window_weeks;
use slotwise_core::time::day_name;
use slotwise_core::{EngineConfig, RankingEngine};

use super::parse_history;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Client identifier
    #[arg(long)]
    client: String,
    /// Preference memo text
    #[arg(long, default_value = "")]
    memo: String,
    /// Past appointment start time (ISO-8601 with offset); repeatable
    #[arg(long = "history")]
    history: Vec<String>,
    /// Weeks of history to consider
    #[arg(long)]
    window_weeks: Option<u32>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: AnalyzeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig::load_or_default();
    let mut engine = RankingEngine::from_config(&config);
    if let Some(weeks) = args.window_weeks {
        engine = engine.with_window_weeks(validate_window_weeks(weeks)?);
    }

    let history = parse_history(&args.history);
    let analysis = engine.analyze_client(&args.client, &args.memo, &history, Utc::now());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("=== Preference Analysis: client {} ===\n", analysis.client_id);
    println!("Memo: {}", if args.memo.is_empty() { "(none)" } else { args.memo.as_str() });
    println!("Summary: {}", analysis.summary);

    let profile = &analysis.profile;
    if profile.has_history() {
        println!("\nLast {} weeks ({} appointments):", profile.window_weeks, profile.total_appointments);
        for (day, count) in profile.day_counts.iter().enumerate() {
            if *count > 0 {
                println!("  {:<9} {}", day_name(day as u8), "#".repeat(*count as usize));
            }
        }
    }
    Ok(())
}
