use chrono::NaiveDate;
use zorg_core::error::CoreError;
use zorg_core::scan::{MissedTaskScanner, ScanScope};
use zorg_core::store::SqliteStore;

use crate::cli::MissedCommand;
use crate::config::Config;
use crate::views::table;

pub async fn missed_tasks(
    store: &SqliteStore,
    command: MissedCommand,
    config: &Config,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let scope = match (command.caregiver, command.client) {
        (Some(caregiver), None) => ScanScope::Caregiver(caregiver),
        (None, Some(client)) => ScanScope::Client(client),
        _ => return Err(CoreError::MissingClient.into()),
    };
    let days = command.days.unwrap_or(config.lookback_days);

    let report = MissedTaskScanner::new(store).scan(scope, days, today).await?;

    if command.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        table::display_missed(&report);
    }
    Ok(())
}
