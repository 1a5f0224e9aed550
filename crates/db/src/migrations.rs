use sqlx::migrate::{MigrateError, Migrator};

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

/// Migrations recorded as applied; zero before the first run.
pub async fn applied_count(pool: &DbPool) -> Result<i64, sqlx::Error> {
    let has_history: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;
    if has_history == 0 {
        return Ok(0);
    }

    sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
        .fetch_one(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::{applied_count, run_pending};
    use crate::{connect_with_settings, migrations::MIGRATOR};

    const MANAGED_SCHEMA_OBJECTS: &[&str] = &[
        "customer",
        "representative",
        "idx_customer_company_name",
        "idx_representative_customer_id",
        "idx_representative_last_name",
    ];

    #[tokio::test]
    async fn migrations_create_crm_tables() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        for object in MANAGED_SCHEMA_OBJECTS {
            let count: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE name = ?")
                    .bind(object)
                    .fetch_one(&pool)
                    .await
                    .expect("query sqlite_master");
            assert_eq!(count, 1, "expected schema object `{object}` after migrations");
        }

        pool.close().await;
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("first run");
        run_pending(&pool).await.expect("second run");

        let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
            .fetch_one(&pool)
            .await
            .expect("count applied migrations");
        assert_eq!(applied as usize, MIGRATOR.iter().count());

        pool.close().await;
    }

    #[tokio::test]
    async fn applied_count_is_zero_before_first_run() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");

        assert_eq!(applied_count(&pool).await.expect("count"), 0);
        run_pending(&pool).await.expect("run migrations");
        assert_eq!(applied_count(&pool).await.expect("count") as usize, MIGRATOR.iter().count());

        pool.close().await;
    }

    #[tokio::test]
    async fn search_columns_exist_after_migrations() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        for (table, column) in [
            ("customer", "company_name_search"),
            ("representative", "first_name_search"),
            ("representative", "last_name_search"),
        ] {
            let count: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM pragma_table_info(?) WHERE name = ?",
            )
            .bind(table)
            .bind(column)
            .fetch_one(&pool)
            .await
            .expect("query table info");
            assert_eq!(count, 1, "expected column `{table}.{column}`");
        }

        pool.close().await;
    }

    #[tokio::test]
    async fn representative_requires_existing_customer() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        let result = sqlx::query(
            "INSERT INTO representative (first_name, last_name, customer_id) VALUES ('A', 'B', 404)",
        )
        .execute(&pool)
        .await;

        assert!(result.is_err(), "foreign key should reject unknown customer");
        pool.close().await;
    }
}
