use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

pub type DbPool = sqlx::SqlitePool;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the CRM pool.
///
/// Foreign keys are enforced on every connection; the representative to
/// customer reference depends on it. File databases switch to WAL so
/// readers do not block the single writer.
pub async fn connect_with_settings(
    database_url: &str,
    max_connections: u32,
    timeout_secs: u64,
) -> Result<DbPool, sqlx::Error> {
    let mut options =
        SqliteConnectOptions::from_str(database_url)?.foreign_keys(true).busy_timeout(BUSY_TIMEOUT);
    if !is_in_memory(database_url) {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(Duration::from_secs(timeout_secs.max(1)))
        .connect_with(options)
        .await
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::{connect_with_settings, is_in_memory};

    #[tokio::test]
    async fn connections_enforce_foreign_keys() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("connect");

        let enabled: i64 =
            sqlx::query_scalar("PRAGMA foreign_keys").fetch_one(&pool).await.expect("pragma");

        assert_eq!(enabled, 1);
        pool.close().await;
    }

    #[tokio::test]
    async fn file_databases_use_wal() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("ronja.db").display());
        let pool = connect_with_settings(&url, 1, 5).await.expect("connect");

        let mode: String =
            sqlx::query_scalar("PRAGMA journal_mode").fetch_one(&pool).await.expect("pragma");

        assert_eq!(mode, "wal");
        pool.close().await;
    }

    #[test]
    fn memory_urls_are_recognized() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://ronja?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://ronja.db?mode=rwc"));
    }
}
