use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Care-schedule reconciliation for coordinators and caregivers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show a caregiver's tasks for one date
    Today(TodayCommand),
    /// Scan past days for unmet or unreported care
    Missed(MissedCommand),
    /// Reconcile a client's medication over the lookback window
    Medication(MedicationCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct TodayCommand {
    /// The caregiver's ID
    pub caregiver: Uuid,
    /// The date to evaluate (defaults to today, e.g. '2024-06-10')
    #[clap(short, long)]
    pub date: Option<NaiveDate>,
    /// Emit JSON instead of tables
    #[clap(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct MissedCommand {
    /// Scan the shifts of this caregiver
    #[clap(long, conflicts_with = "client")]
    pub caregiver: Option<Uuid>,
    /// Scan the shifts of this client
    #[clap(long)]
    pub client: Option<Uuid>,
    /// Lookback window in days (defaults to the configured window)
    #[clap(long)]
    pub days: Option<u32>,
    /// Emit JSON instead of tables
    #[clap(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct MedicationCommand {
    /// The client's ID
    pub client: Uuid,
    /// Lookback window in days (defaults to the configured window)
    #[clap(long)]
    pub days: Option<u32>,
    /// Include the per-dose breakdown
    #[clap(long)]
    pub details: bool,
    /// Emit JSON instead of tables
    #[clap(long)]
    pub json: bool,
}
