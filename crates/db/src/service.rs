//! Generic CRUD service shared by every CRM entity kind.
//!
//! The service owns the rules that sit between the HTTP boundary and the
//! store: ids on `save` are always store-assigned, `update` and
//! `delete_by_id` fail with `NotFound` when the target is absent, and a blank
//! search never reaches the store.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use ronja_core::domain::customer::CustomerDraft;
use ronja_core::domain::representative::RepresentativeDraft;
use ronja_core::domain::EntityId;
use ronja_core::dto::{CustomerDto, RepresentativeDto};
use ronja_core::errors::{ApplicationError, DomainError};
use ronja_core::mapper::{CustomerMapper, RepresentativeMapper};

use crate::repositories::{CustomerRepository, EntityRepository, RepresentativeRepository};

/// Turns an inbound DTO into a store draft, validating it and resolving
/// references on the way.
#[async_trait]
pub trait DtoResolver: Send + Sync {
    type Dto: Send + 'static;
    type Draft: Send + Sync + 'static;

    async fn resolve(&self, dto: Self::Dto) -> Result<Self::Draft, ApplicationError>;

    fn dto_id(dto: &Self::Dto) -> Option<EntityId>;
}

pub struct CustomerResolver;

#[async_trait]
impl DtoResolver for CustomerResolver {
    type Dto = CustomerDto;
    type Draft = CustomerDraft;

    async fn resolve(&self, dto: CustomerDto) -> Result<CustomerDraft, ApplicationError> {
        dto.validate()?;
        Ok(CustomerMapper::to_draft(dto))
    }

    fn dto_id(dto: &CustomerDto) -> Option<EntityId> {
        dto.id.map(EntityId)
    }
}

pub struct RepresentativeResolver {
    customers: Arc<CustomerRepository>,
}

impl RepresentativeResolver {
    pub fn new(customers: Arc<CustomerRepository>) -> Self {
        Self { customers }
    }
}

#[async_trait]
impl DtoResolver for RepresentativeResolver {
    type Dto = RepresentativeDto;
    type Draft = RepresentativeDraft;

    async fn resolve(
        &self,
        dto: RepresentativeDto,
    ) -> Result<RepresentativeDraft, ApplicationError> {
        dto.validate()?;
        let customer_id = EntityId(dto.customer_id);
        let customer = self
            .customers
            .find_by_id(customer_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("customer", customer_id))?;
        Ok(RepresentativeMapper::to_draft(dto, customer)?)
    }

    fn dto_id(dto: &RepresentativeDto) -> Option<EntityId> {
        dto.id.map(EntityId)
    }
}

pub struct EntityService<R: ?Sized, M> {
    entity: &'static str,
    repository: Arc<R>,
    resolver: M,
}

pub type CustomerService = EntityService<CustomerRepository, CustomerResolver>;
pub type RepresentativeService = EntityService<RepresentativeRepository, RepresentativeResolver>;

impl CustomerService {
    pub fn for_customers(repository: Arc<CustomerRepository>) -> Self {
        EntityService::new("customer", repository, CustomerResolver)
    }
}

impl RepresentativeService {
    pub fn for_representatives(
        repository: Arc<RepresentativeRepository>,
        customers: Arc<CustomerRepository>,
    ) -> Self {
        EntityService::new("representative", repository, RepresentativeResolver::new(customers))
    }
}

impl<R, M> EntityService<R, M>
where
    R: EntityRepository + ?Sized,
    M: DtoResolver<Draft = R::Draft>,
{
    pub fn new(entity: &'static str, repository: Arc<R>, resolver: M) -> Self {
        Self { entity, repository, resolver }
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub async fn find_all(&self) -> Result<Vec<R::Entity>, ApplicationError> {
        Ok(self.repository.find_all().await?)
    }

    pub async fn find_by_id(&self, id: EntityId) -> Result<R::Entity, ApplicationError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(self.entity, id))
    }

    pub async fn search_by(&self, name: &str) -> Result<Vec<R::Entity>, ApplicationError> {
        if name.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.repository.search_by_name(name).await?)
    }

    pub async fn save(&self, dto: M::Dto) -> Result<R::Entity, ApplicationError> {
        let draft = self.resolver.resolve(dto).await?;
        let saved = self.repository.insert(draft).await?;
        info!(event_name = %format!("crm.{}.saved", self.entity), "{} saved", self.entity);
        Ok(saved)
    }

    pub async fn update(&self, dto: M::Dto) -> Result<R::Entity, ApplicationError> {
        let id = M::dto_id(&dto).ok_or_else(|| {
            DomainError::Validation(format!("{} update requires an id", self.entity))
        })?;
        let draft = self.resolver.resolve(dto).await?;
        let updated = self
            .repository
            .update(id, draft)
            .await?
            .ok_or_else(|| ApplicationError::not_found(self.entity, id))?;
        info!(
            event_name = %format!("crm.{}.updated", self.entity),
            id = %id,
            "{} updated",
            self.entity
        );
        Ok(updated)
    }

    pub async fn delete_by_id(&self, id: EntityId) -> Result<(), ApplicationError> {
        if !self.repository.exists_by_id(id).await? {
            return Err(ApplicationError::not_found(self.entity, id));
        }
        if !self.repository.delete_by_id(id).await? {
            // Removed concurrently between the check and the delete.
            return Err(ApplicationError::not_found(self.entity, id));
        }
        info!(
            event_name = %format!("crm.{}.deleted", self.entity),
            id = %id,
            "{} deleted",
            self.entity
        );
        Ok(())
    }

    pub async fn exists_by_id(&self, id: EntityId) -> Result<bool, ApplicationError> {
        Ok(self.repository.exists_by_id(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ronja_core::domain::customer::{Customer, CustomerCategory, CustomerFocus, Status};
    use ronja_core::domain::representative::Representative;
    use ronja_core::domain::EntityId;
    use ronja_core::dto::{CustomerDto, RepresentativeDto};
    use ronja_core::errors::{ApplicationError, DomainError};

    use super::{CustomerService, RepresentativeService};
    use crate::repositories::{
        CustomerRepository, EntityRepository, InMemoryRepository, RepresentativeRepository,
    };

    struct Fixture {
        customers: CustomerService,
        representatives: RepresentativeService,
        representative_store: Arc<RepresentativeRepository>,
    }

    fn fixture() -> Fixture {
        let customer_store: Arc<CustomerRepository> =
            Arc::new(InMemoryRepository::<Customer>::default());
        let representative_store: Arc<RepresentativeRepository> =
            Arc::new(InMemoryRepository::<Representative>::default());
        Fixture {
            customers: CustomerService::for_customers(customer_store.clone()),
            representatives: RepresentativeService::for_representatives(
                representative_store.clone(),
                customer_store,
            ),
            representative_store,
        }
    }

    fn customer_dto(company_name: &str) -> CustomerDto {
        CustomerDto {
            id: None,
            company_name: company_name.to_string(),
            category: CustomerCategory::Level1,
            focus: CustomerFocus::Manufacture,
            status: Status::Active,
            email: None,
            phone: None,
            website: None,
            notice: None,
        }
    }

    fn representative_dto(customer_id: i64) -> RepresentativeDto {
        RepresentativeDto {
            id: None,
            first_name: "Jana".to_string(),
            last_name: "Novakova".to_string(),
            position: None,
            region: None,
            notice: None,
            status: Status::Active,
            last_visit: None,
            scheduled_visit: None,
            emails: vec!["jana@ferona.cz".to_string()],
            phone_numbers: Vec::new(),
            customer_id,
        }
    }

    #[tokio::test]
    async fn save_ignores_client_supplied_id() {
        let fx = fixture();
        let mut dto = customer_dto("Ferona");
        dto.id = Some(77);

        let saved = fx.customers.save(dto).await.expect("save");

        assert_eq!(saved.id, EntityId(1));
        assert_eq!(fx.customers.find_by_id(saved.id).await.expect("find"), saved);
    }

    #[tokio::test]
    async fn save_rejects_blank_company_name() {
        let fx = fixture();
        let error = fx.customers.save(customer_dto("  ")).await.expect_err("validation");
        assert!(matches!(error, ApplicationError::Domain(DomainError::Validation(_))));
        assert!(fx.customers.find_all().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn update_without_id_is_validation_error() {
        let fx = fixture();
        let error = fx.customers.update(customer_dto("Ferona")).await.expect_err("missing id");
        assert!(matches!(error, ApplicationError::Domain(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn update_of_missing_representative_is_not_found_and_mutates_nothing() {
        let fx = fixture();
        let customer = fx.customers.save(customer_dto("Ferona")).await.expect("save");
        let mut dto = representative_dto(customer.id.0);
        dto.id = Some(42);

        let error = fx.representatives.update(dto).await.expect_err("not found");

        assert_eq!(error, ApplicationError::not_found("representative", EntityId(42)));
        assert!(fx.representative_store.find_all().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn add_representative_with_unknown_customer_is_not_found() {
        let fx = fixture();
        let error = fx.representatives.save(representative_dto(5)).await.expect_err("not found");

        assert_eq!(error, ApplicationError::not_found("customer", EntityId(5)));
        assert!(fx.representative_store.find_all().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn representative_embeds_resolved_customer() {
        let fx = fixture();
        let customer = fx.customers.save(customer_dto("Ferona")).await.expect("save");

        let saved =
            fx.representatives.save(representative_dto(customer.id.0)).await.expect("save rep");

        assert_eq!(saved.customer, customer);
        assert!(fx.representatives.exists_by_id(saved.id).await.expect("exists"));
    }

    #[tokio::test]
    async fn second_delete_is_not_found() {
        let fx = fixture();
        let customer = fx.customers.save(customer_dto("Ferona")).await.expect("save");

        fx.customers.delete_by_id(customer.id).await.expect("first delete");
        let error = fx.customers.delete_by_id(customer.id).await.expect_err("second delete");

        assert_eq!(error, ApplicationError::not_found("customer", customer.id));
    }

    #[tokio::test]
    async fn blank_search_returns_empty_list() {
        let fx = fixture();
        fx.customers.save(customer_dto("Ferona")).await.expect("save");

        assert!(fx.customers.search_by("   ").await.expect("search").is_empty());
        assert!(fx.customers.search_by("zinc").await.expect("search").is_empty());
        assert_eq!(fx.customers.search_by("fer").await.expect("search").len(), 1);
    }
}
