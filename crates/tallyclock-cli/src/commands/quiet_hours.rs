use std::path::Path;

use clap::Subcommand;
use tallyclock_core::DoNotDisturbPolicy;

use super::common::{load_config, parse_datetime, CliResult};

#[derive(Subcommand)]
pub enum QuietHoursAction {
    /// Check whether a notification may fire at the given time
    Check {
        /// RFC 3339 date-time
        at: String,
    },
    /// List the forbidden hours
    List,
}

pub fn run(action: QuietHoursAction, path: Option<&Path>) -> CliResult {
    let config = load_config(path)?;
    let policy = config.quiet_hours_policy()?;

    match action {
        QuietHoursAction::Check { at } => {
            let date = parse_datetime(&at)?;
            let report = serde_json::json!({
                "date": date,
                "local_hour": policy.local_hour(date),
                "allowed": policy.is_satisfied(date),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        QuietHoursAction::List => {
            let hours: Vec<u32> = policy.forbidden_hours().collect();
            println!("{}", serde_json::to_string(&hours)?);
        }
    }
    Ok(())
}
