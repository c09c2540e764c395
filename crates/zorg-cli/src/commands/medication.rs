use chrono::NaiveDate;
use zorg_core::scan::MissedTaskScanner;
use zorg_core::store::SqliteStore;

use crate::cli::MedicationCommand;
use crate::config::Config;
use crate::views::table;

pub async fn missing_medication(
    store: &SqliteStore,
    command: MedicationCommand,
    config: &Config,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let days = command.days.unwrap_or(config.lookback_days);
    // JSON consumers always get the breakdown; the table view keeps it
    // behind --details.
    let include_details = command.details || command.json;

    let report = MissedTaskScanner::new(store)
        .missing_medication(command.client, days, today, include_details)
        .await?;

    if command.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        table::display_medication(&report, today);
    }
    Ok(())
}
