//! SQLite connection pool bootstrap.

use crate::config::DatabaseConfig;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Couldn't connect to database: {0}")]
    Connection(#[source] sqlx::Error),
}

/// Snapshot of pool usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatistics {
    /// Connections currently open (idle + in use)
    pub pool_size: u32,
    /// Idle connections sitting in the pool
    pub checked_in: u32,
    /// Connections handed out to callers
    pub checked_out: u32,
    /// Upper bound configured for the pool
    pub max_connections: u32,
}

/// Open a pool for the configured database.
///
/// File databases are created if missing, including their parent directory.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
    ensure_parent_dir(&config.url).map_err(|e| DatabaseError::Connection(sqlx::Error::Io(e)))?;

    let mut options = SqliteConnectOptions::from_str(&config.url)
        .map_err(DatabaseError::Connection)?
        .create_if_missing(true);
    if !config.echo {
        options = options.disable_statement_logging();
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections())
        .test_before_acquire(config.pool_pre_ping)
        .max_lifetime(config.recycle_after())
        .connect_with(options)
        .await
        .map_err(DatabaseError::Connection)?;

    info!(
        url = %config.url,
        max_connections = config.max_connections(),
        "database pool ready"
    );
    Ok(pool)
}

/// Current pool statistics.
pub fn pool_statistics(pool: &SqlitePool) -> PoolStatistics {
    let pool_size = pool.size();
    let checked_in = u32::try_from(pool.num_idle()).unwrap_or(u32::MAX);
    PoolStatistics {
        pool_size,
        checked_in,
        checked_out: pool_size.saturating_sub(checked_in),
        max_connections: pool.options().get_max_connections(),
    }
}

// sqlite://path/to/file.db needs its directory to exist before the file can be created
fn ensure_parent_dir(url: &str) -> std::io::Result<()> {
    let Some(rest) = url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let file = rest.split('?').next().unwrap_or_default();
    if file.is_empty() || file.starts_with(':') {
        return Ok(());
    }
    match Path::new(file).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).inspect_err(|e| {
                warn!(dir = %parent.display(), "cannot create database directory: {e}");
            })
        }
        _ => Ok(()),
    }
}
