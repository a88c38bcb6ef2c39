use std::path::Path;

use tallyclock_core::ReminderKey;

use super::common::{CliResult, Session};

pub async fn run(key: &str, path: Option<&Path>) -> CliResult {
    let key: ReminderKey = key.parse()?;
    let session = Session::open(path).await?;

    session.engine.on_instant_trigger(key).await;
    session.finish().await
}
