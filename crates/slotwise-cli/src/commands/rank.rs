use clap::Args;
use std::path::{Path, PathBuf};

use slotwise_core::{EngineConfig, RankRequest, RankResponse, RankingEngine};

#[derive(Args)]
pub struct RankArgs {
    /// Client identifier
    #[arg(long, required_unless_present = "input")]
    client: Option<String>,
    /// Preference memo text
    #[arg(long)]
    memo: Option<String>,
    /// Past appointment start time (ISO-8601 with offset); repeatable
    #[arg(long = "history")]
    history: Vec<String>,
    /// Candidate slot start time (ISO-8601 with offset); repeatable
    #[arg(long = "slot")]
    slots: Vec<String>,
    /// Read the whole request from a JSON file ("-" for stdin)
    #[arg(long, conflicts_with_all = ["client", "memo", "history", "slots"])]
    input: Option<PathBuf>,
    /// Weeks of history to consider
    #[arg(long)]
    window_weeks: Option<u32>,
    /// Appointment length in minutes
    #[arg(long, allow_hyphen_values = true)]
    duration: Option<i64>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: RankArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig::load_or_default();
    let engine = RankingEngine::from_config(&config);

    let mut request = match &args.input {
        Some(path) => read_request(path)?,
        None => RankRequest {
            client_id: args.client.clone().unwrap_or_default(),
            memo: args.memo.clone(),
            appointment_history: args.history.clone(),
            candidate_slots: args.slots.clone(),
            ..RankRequest::default()
        },
    };
    if args.window_weeks.is_some() {
        request.window_weeks = args.window_weeks;
    }
    if args.duration.is_some() {
        request.duration_minutes = args.duration;
    }

    let response = engine.rank_request_now(&request)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_response(&response);
    }
    Ok(())
}

fn read_request(path: &Path) -> Result<RankRequest, Box<dyn std::error::Error>> {
    tracing::debug!(path = %path.display(), "reading rank request");
    let request = if path.as_os_str() == "-" {
        RankRequest::from_reader(std::io::stdin().lock())?
    } else {
        RankRequest::from_path(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?
    };
    Ok(request)
}

fn print_response(response: &RankResponse) {
    if response.suggestions.is_empty() {
        println!("No slots to rank.");
        println!("  Pass candidate times with --slot.");
    } else {
        println!("=== Suggested Slots: client {} ===\n", response.client_id);
        for (i, suggestion) in response.suggestions.iter().enumerate() {
            println!(
                "{}. {} ({} min, confidence {:.2})",
                i + 1,
                suggestion.start_time.format("%a %Y-%m-%d %H:%M %:z"),
                suggestion.duration_minutes,
                suggestion.confidence
            );
            println!("   Reason: {}", suggestion.reason);
        }
        println!();
        println!("{}", response.explanation);
        if response.requires_confirmation {
            println!("Confirm with the client before booking.");
        }
    }

    for skipped in &response.rejected {
        eprintln!("skipped {} ({:?})", skipped.field, skipped.value);
    }
}
