use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "slotwise", version, about = "Rank appointment slots by client preference")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank candidate slots for a client
    Rank(commands::rank::RankArgs),
    /// Show what a preference memo is understood as
    Parse(commands::parse::ParseArgs),
    /// Summarize a client's stated and observed preferences
    Analyze(commands::analyze::AnalyzeArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Rank(args) => commands::rank::run(args),
        Commands::Parse(args) => commands::parse::run(args),
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
