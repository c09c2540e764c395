use clap::Parser;
use owo_colors::{OwoColorize, Style};
use tracing_subscriber::EnvFilter;
use zorg_core::db;
use zorg_core::error::CoreError;
use zorg_core::store::SqliteStore;

mod cli;
mod commands;
mod config;
mod util;
mod views;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = config::Config::new().unwrap_or_else(|_| config::Config::default());
    let timezone = match config::validate_timezone(&config.timezone) {
        Ok(tz) => tz,
        Err(message) => {
            eprintln!("{} {}", "Error:".red().bold(), message);
            std::process::exit(1);
        }
    };
    let today = util::local_today(&timezone);

    let db_pool = match db::establish_connection(&config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };
    let store = SqliteStore::new(db_pool);

    let cli = cli::Cli::parse();

    let result = match cli.command {
        cli::Commands::Today(command) => commands::today::today_tasks(&store, command, today).await,
        cli::Commands::Missed(command) => {
            commands::missed::missed_tasks(&store, command, &config, today).await
        }
        cli::Commands::Medication(command) => {
            commands::medication::missing_medication(&store, command, &config, today).await
        }
    };

    if let Err(e) = result {
        handle_error(e);
        std::process::exit(1);
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::NotFound(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
            }
            CoreError::InvalidInput(s) => {
                eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
            }
            CoreError::MissingClient => {
                eprintln!(
                    "{} Pass {} or {} to choose whose window to scan.",
                    "Error:".style(error_style),
                    "--caregiver".yellow(),
                    "--client".yellow()
                );
            }
            _ => eprintln!("{} {}", "Error:".style(error_style), err),
        }
    } else {
        eprintln!("{} {}", "Error:".style(error_style), err);
    }
}
