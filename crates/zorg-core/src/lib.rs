//! # Zorg Core Library
//!
//! The care-schedule reconciliation engine behind the zorg coordination
//! tools: given recurring or dated care obligations, recorded
//! administration events and caregiver shift assignments, it determines
//! per client and per calendar day which obligations were due, whether
//! each was satisfied, and classifies the day or period as complete,
//! pending or overdue.
//!
//! ## Features
//!
//! - **Shared recurrence evaluation**: one evaluator for the five
//!   recurrence grammars, used by every call site
//! - **Midnight-crossing shifts**: overnight shifts are split into an
//!   evening and a next-date morning pass, applied identically everywhere
//! - **Exact and tolerance matching**: medication and tube feeding match
//!   to the minute, fluid intake within a ±60 minute window, meals by
//!   type per date
//! - **Windowed lookback scans**: 60–90 day scans run off bulk fetches
//!   and in-memory indices, never per-day queries
//! - **Deterministic**: "today" is an explicit input to every entry
//!   point; identical snapshots produce identical output
//!
//! ## Core Modules
//!
//! - [`models`]: obligations, events, shifts and the engine's output types
//! - [`recurrence`]: does an obligation apply on a date
//! - [`window`]: shift windows and the overnight day-part split
//! - [`matching`]: pairing scheduled occurrences with recorded events
//! - [`daily`]: per-caregiver, per-date task aggregation
//! - [`scan`]: multi-day missed-task and missing-medication scans
//! - [`store`]: the read-only `CareStore` trait with SQLite and in-memory
//!   implementations
//! - [`db`]: database connection and migration management
//! - [`error`]: error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use uuid::Uuid;
//! use zorg_core::{daily::DailyTaskAggregator, db, store::SqliteStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = db::establish_connection("zorg.db").await?;
//!     let store = SqliteStore::new(pool);
//!
//!     let caregiver = Uuid::parse_str("0190f7a0-5bfa-7000-8000-000000000001")?;
//!     let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
//!
//!     let overview = DailyTaskAggregator::new(&store)
//!         .aggregate(caregiver, today, today)
//!         .await?;
//!     println!("{} clients, {:?}", overview.clients.len(), overview.global_summary.status);
//!
//!     Ok(())
//! }
//! ```

pub mod daily;
pub mod db;
pub mod error;
pub mod matching;
pub mod models;
pub mod recurrence;
pub mod scan;
pub mod store;
pub mod window;
