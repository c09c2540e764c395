//! Connection management for the care database.

use sqlx::sqlite::SqlitePoolOptions;
use std::path::Path;

use crate::error::CoreError;

pub use sqlx::SqlitePool as DbPool;

/// Opens a pool on the SQLite care database and applies any pending
/// migrations.
///
/// The file and its parent directory are created when absent, so a
/// fresh deployment starts from an empty schema; the reconciliation
/// queries themselves never write.
pub async fn establish_connection(db_path: &str) -> Result<DbPool, CoreError> {
    let path = Path::new(db_path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    if !path.exists() {
        tokio::fs::File::create(path).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(db_path)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
