use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "tallyclock", version, about = "Tallyclock reminder scheduler")]
struct Cli {
    /// Config file to use instead of ~/.config/tallyclock/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Quiet hours inspection
    QuietHours {
        #[command(subcommand)]
        action: commands::quiet_hours::QuietHoursAction,
    },
    /// Show when a project reminder on the given day would fire
    Anchor {
        /// RFC 3339 date-time, e.g. 2024-05-06T18:00:00+02:00
        at: String,
    },
    /// Timer reminders
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Project deadline reminders
    Project {
        #[command(subcommand)]
        action: commands::project::ProjectAction,
    },
    /// Fire a reminder in a moment, regardless of settings
    Trigger {
        /// Reminder key, e.g. timerPassedItsDeadline
        key: String,
    },
    /// Feed a reminder event as JSON
    Dispatch {
        /// e.g. '{"type":"TimerStopped"}'
        event: String,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TALLYCLOCK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Config { action } => commands::config::run(action, config),
        Commands::QuietHours { action } => commands::quiet_hours::run(action, config),
        Commands::Anchor { at } => commands::anchor::run(&at, config),
        Commands::Timer { action } => commands::timer::run(action, config).await,
        Commands::Project { action } => commands::project::run(action, config).await,
        Commands::Trigger { key } => commands::trigger::run(&key, config).await,
        Commands::Dispatch { event } => commands::dispatch::run(&event, config).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
