use clap::Args;
use slotwise_core::time::{day_name, hour_label};
use slotwise_core::PreferenceParser;

#[derive(Args)]
pub struct ParseArgs {
    /// Preference memo text, e.g. "tuesday mornings or Fridays at 2PM"
    text: String,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: ParseArgs) -> Result<(), Box<dyn std::error::Error>> {
    let predicate = PreferenceParser::new().parse(&args.text);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&predicate)?);
        return Ok(());
    }

    if predicate.is_empty() {
        println!("No stated preference recognized.");
        return Ok(());
    }

    let days: Vec<&str> = predicate.days_of_week.iter().map(|d| day_name(*d)).collect();
    let periods: Vec<&str> = predicate.time_periods.iter().map(|p| p.name()).collect();
    let hours: Vec<String> = predicate.exact_hours.iter().map(|h| hour_label(*h)).collect();

    println!("Days:    {}", if days.is_empty() { "-".to_string() } else { days.join(", ") });
    println!("Periods: {}", if periods.is_empty() { "-".to_string() } else { periods.join(", ") });
    println!("Times:   {}", if hours.is_empty() { "-".to_string() } else { hours.join(", ") });
    Ok(())
}
