use chrono::NaiveDate;
use zorg_core::daily::DailyTaskAggregator;
use zorg_core::store::SqliteStore;

use crate::cli::TodayCommand;
use crate::views::table;

pub async fn today_tasks(
    store: &SqliteStore,
    command: TodayCommand,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let date = command.date.unwrap_or(today);
    let overview = DailyTaskAggregator::new(store)
        .aggregate(command.caregiver, date, today)
        .await?;

    if command.json {
        println!("{}", serde_json::to_string_pretty(&overview)?);
    } else {
        table::display_overview(&overview);
    }
    Ok(())
}
