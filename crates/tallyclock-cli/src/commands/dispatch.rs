use std::path::Path;

use tallyclock_core::ReminderEvent;

use super::common::{CliResult, Session};

pub async fn run(event: &str, path: Option<&Path>) -> CliResult {
    let event: ReminderEvent = serde_json::from_str(event)?;
    let session = Session::open(path).await?;

    session.engine.dispatch(event).await?;
    session.finish().await
}
