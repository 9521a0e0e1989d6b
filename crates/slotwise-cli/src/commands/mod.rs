pub mod analyze;
pub mod config;
pub mod parse;
pub mod rank;

use chrono::{DateTime, FixedOffset};
use slotwise_core::time::parse_timestamp;

/// Parse `--history` values, logging and skipping unreadable ones.
pub fn parse_history(values: &[String]) -> Vec<DateTime<FixedOffset>> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, value)| {
            match parse_timestamp(&format!("appointment_history[{i}]"), value) {
                Ok(ts) => Some(ts),
                Err(e) => {
                    tracing::warn!(field = %e.field(), error = %e, "skipping unreadable history entry");
                    None
                }
            }
        })
        .collect()
}
