mod migrations;
mod models;
mod queries;

pub use models::*;
pub use queries::*;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use tracing::{debug, info};

/// Pooled handle to the quick post store.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

fn connect_options(path: &Path) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        // Two creates in one topic race for the next post number; the loser waits.
        .busy_timeout(Duration::from_secs(10))
}

impl Database {
    /// Open (creating if needed) the store at `path` and bring its schema up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, a migration fails, or the
    /// store turns out to be read-only.
    pub async fn new(path: &Path) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options(path))
            .await
            .with_context(|| format!("Failed to open quick post database {}", path.display()))?;

        let db = Self { pool };
        migrations::run(&db.pool).await?;
        info!(path = %path.display(), "Quick post database ready");
        db.ensure_writable(path).await?;

        Ok(db)
    }

    /// Fail at startup rather than on the first created post.
    ///
    /// A deferred `BEGIN` succeeds on a read-only file; `BEGIN IMMEDIATE` has to
    /// take the write lock.
    async fn ensure_writable(&self, path: &Path) -> Result<()> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire a connection for the write check")?;

        sqlx::query("BEGIN IMMEDIATE")
            .execute(&mut *conn)
            .await
            .with_context(|| {
                format!(
                    "Quick post database {} is read-only; new quick posts could not be stored",
                    path.display()
                )
            })?;
        sqlx::query("ROLLBACK")
            .execute(&mut *conn)
            .await
            .context("Failed to release the write check lock")?;

        debug!("Quick post database accepts writes");
        Ok(())
    }

    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
