use std::collections::BTreeMap;

use tokio::sync::RwLock;

use ronja_core::domain::customer::{Customer, CustomerDraft};
use ronja_core::domain::representative::{Representative, RepresentativeDraft};
use ronja_core::domain::EntityId;

use super::{search_key, EntityRepository, RepositoryError};

/// Entities the in-memory store knows how to build and search.
pub trait InMemoryRecord: Clone + Send + Sync + 'static {
    type Draft: Send + Sync + 'static;

    fn from_draft(id: EntityId, draft: Self::Draft) -> Self;

    fn id(&self) -> EntityId;

    /// `needle` is already folded with `search_key`.
    fn matches_name(&self, needle: &str) -> bool;
}

impl InMemoryRecord for Customer {
    type Draft = CustomerDraft;

    fn from_draft(id: EntityId, draft: CustomerDraft) -> Self {
        draft.into_customer(id)
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn matches_name(&self, needle: &str) -> bool {
        search_key(&self.company_name).contains(needle)
    }
}

impl InMemoryRecord for Representative {
    type Draft = RepresentativeDraft;

    fn from_draft(id: EntityId, draft: RepresentativeDraft) -> Self {
        draft.into_representative(id)
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn matches_name(&self, needle: &str) -> bool {
        search_key(&self.first_name).contains(needle)
            || search_key(&self.last_name).contains(needle)
    }
}

struct Table<E> {
    rows: BTreeMap<EntityId, E>,
    next_id: i64,
}

pub struct InMemoryRepository<E> {
    table: RwLock<Table<E>>,
}

impl<E> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self { table: RwLock::new(Table { rows: BTreeMap::new(), next_id: 1 }) }
    }
}

#[async_trait::async_trait]
impl<E: InMemoryRecord> EntityRepository for InMemoryRepository<E> {
    type Entity = E;
    type Draft = E::Draft;

    async fn find_all(&self) -> Result<Vec<E>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<E>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn search_by_name(&self, query: &str) -> Result<Vec<E>, RepositoryError> {
        let needle = search_key(query);
        let table = self.table.read().await;
        Ok(table.rows.values().filter(|row| row.matches_name(&needle)).cloned().collect())
    }

    async fn insert(&self, draft: E::Draft) -> Result<E, RepositoryError> {
        let mut table = self.table.write().await;
        let id = EntityId(table.next_id);
        table.next_id += 1;
        let entity = E::from_draft(id, draft);
        table.rows.insert(id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, id: EntityId, draft: E::Draft) -> Result<Option<E>, RepositoryError> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&id) {
            Some(slot) => {
                *slot = E::from_draft(id, draft);
                Ok(Some(slot.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: EntityId) -> Result<bool, RepositoryError> {
        let mut table = self.table.write().await;
        Ok(table.rows.remove(&id).is_some())
    }

    async fn exists_by_id(&self, id: EntityId) -> Result<bool, RepositoryError> {
        let table = self.table.read().await;
        Ok(table.rows.contains_key(&id))
    }
}

#[cfg(test)]
mod tests {
    use ronja_core::domain::customer::{
        Customer, CustomerCategory, CustomerDraft, CustomerFocus, Status,
    };
    use ronja_core::domain::EntityId;

    use crate::repositories::{EntityRepository, InMemoryRepository};

    fn draft(company_name: &str) -> CustomerDraft {
        CustomerDraft {
            company_name: company_name.to_string(),
            category: CustomerCategory::Level3,
            focus: CustomerFocus::Mixed,
            status: Status::Active,
            email: None,
            phone: None,
            website: None,
            notice: None,
        }
    }

    #[tokio::test]
    async fn in_memory_repo_assigns_sequential_ids() {
        let repo = InMemoryRepository::<Customer>::default();

        let first = repo.insert(draft("Ferona")).await.expect("insert");
        let second = repo.insert(draft("Ocel Brno")).await.expect("insert");

        assert_eq!(first.id, EntityId(1));
        assert_eq!(second.id, EntityId(2));
        assert_eq!(repo.find_by_id(second.id).await.expect("find"), Some(second));
    }

    #[tokio::test]
    async fn in_memory_repo_ids_are_not_reused_after_delete() {
        let repo = InMemoryRepository::<Customer>::default();
        let first = repo.insert(draft("Ferona")).await.expect("insert");

        assert!(repo.delete_by_id(first.id).await.expect("delete"));
        let next = repo.insert(draft("Ocel Brno")).await.expect("insert");

        assert_eq!(next.id, EntityId(2));
        assert!(!repo.exists_by_id(first.id).await.expect("exists"));
    }

    #[tokio::test]
    async fn in_memory_search_ignores_case() {
        let repo = InMemoryRepository::<Customer>::default();
        repo.insert(draft("Ferona a.s.")).await.expect("insert");
        repo.insert(draft("Ocel Brno")).await.expect("insert");

        let found = repo.search_by_name(" brno ").await.expect("search");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].company_name, "Ocel Brno");
    }

    #[tokio::test]
    async fn in_memory_update_of_missing_row_is_none() {
        let repo = InMemoryRepository::<Customer>::default();
        assert_eq!(repo.update(EntityId(7), draft("Ghost")).await.expect("update"), None);
        assert!(repo.find_all().await.expect("list").is_empty());
    }
}
