use async_trait::async_trait;
use thiserror::Error;

use ronja_core::domain::customer::{Customer, CustomerDraft};
use ronja_core::domain::representative::{Representative, RepresentativeDraft};
use ronja_core::domain::EntityId;
use ronja_core::errors::{ApplicationError, DomainError};

pub mod customer;
pub mod memory;
pub mod representative;

pub use customer::SqlCustomerRepository;
pub use memory::{InMemoryRecord, InMemoryRepository};
pub use representative::SqlRepresentativeRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<RepositoryError> for ApplicationError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Conflict(message) => Self::Domain(DomainError::Conflict(message)),
            other => Self::Persistence(other.to_string()),
        }
    }
}

/// Storage capabilities every CRM entity kind provides.
///
/// `Draft` is the entity without its id; the store assigns ids on insert.
#[async_trait]
pub trait EntityRepository: Send + Sync {
    type Entity: Clone + Send + Sync + 'static;
    type Draft: Send + Sync + 'static;

    async fn find_all(&self) -> Result<Vec<Self::Entity>, RepositoryError>;

    async fn find_by_id(&self, id: EntityId) -> Result<Option<Self::Entity>, RepositoryError>;

    /// Case-insensitive substring match on the entity's name fields, ordered by id.
    async fn search_by_name(&self, query: &str) -> Result<Vec<Self::Entity>, RepositoryError>;

    async fn insert(&self, draft: Self::Draft) -> Result<Self::Entity, RepositoryError>;

    /// Returns `None` when no row with `id` exists.
    async fn update(
        &self,
        id: EntityId,
        draft: Self::Draft,
    ) -> Result<Option<Self::Entity>, RepositoryError>;

    /// Returns whether a row was removed.
    async fn delete_by_id(&self, id: EntityId) -> Result<bool, RepositoryError>;

    async fn exists_by_id(&self, id: EntityId) -> Result<bool, RepositoryError>;
}

pub type CustomerRepository = dyn EntityRepository<Entity = Customer, Draft = CustomerDraft>;
pub type RepresentativeRepository =
    dyn EntityRepository<Entity = Representative, Draft = RepresentativeDraft>;

/// Case fold shared by stored search columns, LIKE patterns and the
/// in-memory store. Full Unicode, unlike SQLite's `lower()`.
pub(crate) fn search_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Escapes LIKE wildcards so user input only matches literally.
pub(crate) fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for ch in search_key(query).chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

pub(crate) fn decode_error(error: sqlx::Error) -> RepositoryError {
    RepositoryError::Decode(error.to_string())
}

#[cfg(test)]
mod tests {
    use ronja_core::errors::{ApplicationError, DomainError};

    use super::{like_pattern, search_key, RepositoryError};

    #[test]
    fn like_pattern_escapes_wildcards_and_lowercases() {
        assert_eq!(like_pattern(" Ocel "), "%ocel%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn search_key_folds_non_ascii_letters() {
        assert_eq!(search_key("  Železárny ČERMÁK "), "železárny čermák");
    }

    #[test]
    fn conflict_becomes_domain_conflict() {
        let error = ApplicationError::from(RepositoryError::Conflict("still referenced".into()));
        assert_eq!(error, ApplicationError::Domain(DomainError::Conflict("still referenced".into())));
    }

    #[test]
    fn decode_failure_becomes_persistence_failure() {
        let error = ApplicationError::from(RepositoryError::Decode("bad status".into()));
        assert!(matches!(error, ApplicationError::Persistence(message) if message.contains("bad status")));
    }
}
