use std::path::Path;
use std::time::Duration;

use clap::Subcommand;
use tallyclock_core::TimerSnapshot;

use super::common::{CliResult, Session};

#[derive(Subcommand)]
pub enum TimerAction {
    /// A timer started (or resumed)
    Start {
        /// Seconds already elapsed
        #[arg(long, default_value_t = 0)]
        elapsed: u64,
        /// Deadline in seconds from the timer's start
        #[arg(long)]
        deadline: Option<u64>,
        /// Planned duration in seconds
        #[arg(long)]
        duration: Option<u64>,
    },
    /// The timer stopped
    Stop,
}

pub async fn run(action: TimerAction, path: Option<&Path>) -> CliResult {
    let session = Session::open(path).await?;

    match action {
        TimerAction::Start {
            elapsed,
            deadline,
            duration,
        } => {
            let snapshot = TimerSnapshot {
                elapsed: Duration::from_secs(elapsed),
                deadline: deadline.map(Duration::from_secs),
                target_duration: duration.map(Duration::from_secs),
            };
            session.engine.on_timer_start(snapshot).await;
        }
        TimerAction::Stop => session.engine.on_timer_stop().await,
    }

    session.finish().await
}
