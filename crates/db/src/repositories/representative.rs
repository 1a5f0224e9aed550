use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use ronja_core::domain::customer::Status;
use ronja_core::domain::representative::{Representative, RepresentativeDraft};
use ronja_core::domain::EntityId;

use super::customer::row_to_customer;
use super::{decode_error, like_pattern, search_key, EntityRepository, RepositoryError};
use crate::DbPool;

const DATE_FORMAT: &str = "%Y-%m-%d";

const REPRESENTATIVE_SELECT: &str = "SELECT
        r.id, r.first_name, r.last_name, r.position, r.region, r.notice, r.status,
        r.last_visit, r.scheduled_visit, r.emails_json, r.phone_numbers_json,
        c.id AS c_id, c.company_name AS c_company_name, c.category AS c_category,
        c.focus AS c_focus, c.status AS c_status, c.email AS c_email, c.phone AS c_phone,
        c.website AS c_website, c.notice AS c_notice
     FROM representative r
     JOIN customer c ON c.id = r.customer_id";

pub struct SqlRepresentativeRepository {
    pool: DbPool,
}

impl SqlRepresentativeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn parse_date(id: i64, field: &str, raw: Option<String>) -> Result<Option<NaiveDate>, RepositoryError> {
    raw.map(|value| {
        NaiveDate::parse_from_str(&value, DATE_FORMAT).map_err(|error| {
            RepositoryError::Decode(format!("representative {id} has invalid {field} `{value}`: {error}"))
        })
    })
    .transpose()
}

fn parse_list(id: i64, field: &str, raw: &str) -> Result<Vec<String>, RepositoryError> {
    serde_json::from_str(raw).map_err(|error| {
        RepositoryError::Decode(format!("representative {id} has invalid {field}: {error}"))
    })
}

fn encode_list(values: &[String]) -> Result<String, RepositoryError> {
    serde_json::to_string(values).map_err(|error| RepositoryError::Decode(error.to_string()))
}

fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|value| value.format(DATE_FORMAT).to_string())
}

fn row_to_representative(row: &SqliteRow) -> Result<Representative, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(decode_error)?;
    let status_raw: String = row.try_get("status").map_err(decode_error)?;
    let emails_raw: String = row.try_get("emails_json").map_err(decode_error)?;
    let phones_raw: String = row.try_get("phone_numbers_json").map_err(decode_error)?;

    Ok(Representative {
        id: EntityId(id),
        first_name: row.try_get("first_name").map_err(decode_error)?,
        last_name: row.try_get("last_name").map_err(decode_error)?,
        position: row.try_get("position").map_err(decode_error)?,
        region: row.try_get("region").map_err(decode_error)?,
        notice: row.try_get("notice").map_err(decode_error)?,
        status: Status::parse(&status_raw).ok_or_else(|| {
            RepositoryError::Decode(format!("representative {id} has unknown status `{status_raw}`"))
        })?,
        last_visit: parse_date(id, "lastVisit", row.try_get("last_visit").map_err(decode_error)?)?,
        scheduled_visit: parse_date(
            id,
            "scheduledVisit",
            row.try_get("scheduled_visit").map_err(decode_error)?,
        )?,
        emails: parse_list(id, "emails", &emails_raw)?,
        phone_numbers: parse_list(id, "phoneNumbers", &phones_raw)?,
        customer: row_to_customer(row, "c_")?,
    })
}

impl SqlRepresentativeRepository {
    async fn fetch_one(&self, id: EntityId) -> Result<Option<Representative>, RepositoryError> {
        let row = sqlx::query(&format!("{REPRESENTATIVE_SELECT} WHERE r.id = ?"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_representative).transpose()
    }
}

#[async_trait]
impl EntityRepository for SqlRepresentativeRepository {
    type Entity = Representative;
    type Draft = RepresentativeDraft;

    async fn find_all(&self) -> Result<Vec<Representative>, RepositoryError> {
        let rows = sqlx::query(&format!("{REPRESENTATIVE_SELECT} ORDER BY r.id"))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_representative).collect()
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<Representative>, RepositoryError> {
        self.fetch_one(id).await
    }

    async fn search_by_name(&self, query: &str) -> Result<Vec<Representative>, RepositoryError> {
        let pattern = like_pattern(query);
        let rows = sqlx::query(&format!(
            "{REPRESENTATIVE_SELECT}
             WHERE r.first_name_search LIKE ?1 ESCAPE '\\'
                OR r.last_name_search LIKE ?1 ESCAPE '\\'
             ORDER BY r.id"
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_representative).collect()
    }

    async fn insert(&self, draft: RepresentativeDraft) -> Result<Representative, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO representative (
                first_name, last_name, first_name_search, last_name_search, position,
                region, notice, status, last_visit, scheduled_visit, emails_json,
                phone_numbers_json, customer_id
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(search_key(&draft.first_name))
        .bind(search_key(&draft.last_name))
        .bind(&draft.position)
        .bind(&draft.region)
        .bind(&draft.notice)
        .bind(draft.status.as_str())
        .bind(format_date(draft.last_visit))
        .bind(format_date(draft.scheduled_visit))
        .bind(encode_list(&draft.emails)?)
        .bind(encode_list(&draft.phone_numbers)?)
        .bind(draft.customer.id.0)
        .execute(&self.pool)
        .await?;

        Ok(draft.into_representative(EntityId(result.last_insert_rowid())))
    }

    async fn update(
        &self,
        id: EntityId,
        draft: RepresentativeDraft,
    ) -> Result<Option<Representative>, RepositoryError> {
        let result = sqlx::query(
            "UPDATE representative
             SET first_name = ?, last_name = ?, first_name_search = ?, last_name_search = ?,
                 position = ?, region = ?, notice = ?, status = ?, last_visit = ?,
                 scheduled_visit = ?, emails_json = ?, phone_numbers_json = ?, customer_id = ?,
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = ?",
        )
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(search_key(&draft.first_name))
        .bind(search_key(&draft.last_name))
        .bind(&draft.position)
        .bind(&draft.region)
        .bind(&draft.notice)
        .bind(draft.status.as_str())
        .bind(format_date(draft.last_visit))
        .bind(format_date(draft.scheduled_visit))
        .bind(encode_list(&draft.emails)?)
        .bind(encode_list(&draft.phone_numbers)?)
        .bind(draft.customer.id.0)
        .bind(id.0)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.fetch_one(id).await
    }

    async fn delete_by_id(&self, id: EntityId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM representative WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn exists_by_id(&self, id: EntityId) -> Result<bool, RepositoryError> {
        let exists: i64 =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM representative WHERE id = ?)")
                .bind(id.0)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists != 0)
    }
}
