use std::path::Path;

use clap::Subcommand;
use tallyclock_core::Config;

use super::common::{config_path, load_config, save_config, CliResult};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the whole configuration as JSON
    Show,
    /// Get a config value
    Get {
        /// Dotted key (e.g. "project_anchor.hour", "reminders.timerPassedItsDeadline.after_secs")
        key: String,
    },
    /// Set a config value ("null" turns an optional value off)
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },
    /// Print the config file location
    Path,
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(action: ConfigAction, path: Option<&Path>) -> CliResult {
    match action {
        ConfigAction::Show => {
            let config = load_config(path)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Get { key } => {
            let config = load_config(path)?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = load_config(path)?;
            config.set(&key, &value)?;
            save_config(&config, path)?;
            println!("ok");
        }
        ConfigAction::Path => {
            println!("{}", config_path(path)?.display());
        }
        ConfigAction::Init { force } => {
            let target = config_path(path)?;
            if target.exists() && !force {
                return Err(format!("{} already exists (use --force)", target.display()).into());
            }
            Config::default().save_to(&target)?;
            println!("wrote {}", target.display());
        }
    }
    Ok(())
}
