use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use ronja_core::domain::customer::{
    Customer, CustomerCategory, CustomerDraft, CustomerFocus, Status,
};
use ronja_core::domain::EntityId;

use super::{decode_error, like_pattern, search_key, EntityRepository, RepositoryError};
use crate::DbPool;

const CUSTOMER_COLUMNS: &str =
    "id, company_name, category, focus, status, email, phone, website, notice";

pub struct SqlCustomerRepository {
    pool: DbPool,
}

impl SqlCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn row_to_customer(row: &SqliteRow, prefix: &str) -> Result<Customer, RepositoryError> {
    let column = |name: &str| format!("{prefix}{name}");

    let id: i64 = row.try_get(column("id").as_str()).map_err(decode_error)?;
    let category_raw: String = row.try_get(column("category").as_str()).map_err(decode_error)?;
    let focus_raw: String = row.try_get(column("focus").as_str()).map_err(decode_error)?;
    let status_raw: String = row.try_get(column("status").as_str()).map_err(decode_error)?;

    Ok(Customer {
        id: EntityId(id),
        company_name: row.try_get(column("company_name").as_str()).map_err(decode_error)?,
        category: CustomerCategory::parse(&category_raw).ok_or_else(|| {
            RepositoryError::Decode(format!("customer {id} has unknown category `{category_raw}`"))
        })?,
        focus: CustomerFocus::parse(&focus_raw).ok_or_else(|| {
            RepositoryError::Decode(format!("customer {id} has unknown focus `{focus_raw}`"))
        })?,
        status: Status::parse(&status_raw).ok_or_else(|| {
            RepositoryError::Decode(format!("customer {id} has unknown status `{status_raw}`"))
        })?,
        email: row.try_get(column("email").as_str()).map_err(decode_error)?,
        phone: row.try_get(column("phone").as_str()).map_err(decode_error)?,
        website: row.try_get(column("website").as_str()).map_err(decode_error)?,
        notice: row.try_get(column("notice").as_str()).map_err(decode_error)?,
    })
}

#[async_trait]
impl EntityRepository for SqlCustomerRepository {
    type Entity = Customer;
    type Draft = CustomerDraft;

    async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query(&format!("SELECT {CUSTOMER_COLUMNS} FROM customer ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(|row| row_to_customer(row, "")).collect()
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {CUSTOMER_COLUMNS} FROM customer WHERE id = ?"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_customer(r, "")?)),
            None => Ok(None),
        }
    }

    async fn search_by_name(&self, query: &str) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer
             WHERE company_name_search LIKE ? ESCAPE '\\'
             ORDER BY id"
        ))
        .bind(like_pattern(query))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(|row| row_to_customer(row, "")).collect()
    }

    async fn insert(&self, draft: CustomerDraft) -> Result<Customer, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO customer (
                company_name, company_name_search, category, focus, status,
                email, phone, website, notice
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&draft.company_name)
        .bind(search_key(&draft.company_name))
        .bind(draft.category.as_str())
        .bind(draft.focus.as_str())
        .bind(draft.status.as_str())
        .bind(&draft.email)
        .bind(&draft.phone)
        .bind(&draft.website)
        .bind(&draft.notice)
        .execute(&self.pool)
        .await?;

        Ok(draft.into_customer(EntityId(result.last_insert_rowid())))
    }

    async fn update(
        &self,
        id: EntityId,
        draft: CustomerDraft,
    ) -> Result<Option<Customer>, RepositoryError> {
        let result = sqlx::query(
            "UPDATE customer
             SET company_name = ?, company_name_search = ?, category = ?, focus = ?,
                 status = ?, email = ?, phone = ?, website = ?, notice = ?,
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = ?",
        )
        .bind(&draft.company_name)
        .bind(search_key(&draft.company_name))
        .bind(draft.category.as_str())
        .bind(draft.focus.as_str())
        .bind(draft.status.as_str())
        .bind(&draft.email)
        .bind(&draft.phone)
        .bind(&draft.website)
        .bind(&draft.notice)
        .bind(id.0)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(draft.into_customer(id)))
    }

    async fn delete_by_id(&self, id: EntityId) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let references: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM representative WHERE customer_id = ?")
                .bind(id.0)
                .fetch_one(&mut *tx)
                .await?;
        if references > 0 {
            return Err(RepositoryError::Conflict(format!(
                "customer `{id}` is still referenced by {references} representative(s)"
            )));
        }

        let result = sqlx::query("DELETE FROM customer WHERE id = ?")
            .bind(id.0)
            .execute(&mut *tx)
            .await
            .map_err(|error| match error {
                sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                    RepositoryError::Conflict(format!("customer `{id}` is still referenced"))
                }
                other => RepositoryError::Database(other),
            })?;
        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists_by_id(&self, id: EntityId) -> Result<bool, RepositoryError> {
        let exists: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM customer WHERE id = ?)")
            .bind(id.0)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists != 0)
    }
}
