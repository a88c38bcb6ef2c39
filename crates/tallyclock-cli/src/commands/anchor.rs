use std::path::Path;

use tallyclock_core::TimeSetter;

use super::common::{load_config, parse_datetime, CliResult};

pub fn run(at: &str, path: Option<&Path>) -> CliResult {
    let config = load_config(path)?;
    let anchor = config.project_anchor()?;
    let date = parse_datetime(at)?;

    let anchored = anchor.set_time(date)?;
    println!("{}", anchored.to_rfc3339());
    Ok(())
}
